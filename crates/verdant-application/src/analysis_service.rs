//! Analysis orchestration service.
//!
//! Drives the pure pipeline machine through one run: detection, the
//! conditional remedy call, display smoothing, the history append, and
//! state publication. Only one run's effects are ever applied; a newer
//! acquisition supersedes an in-flight run, whose late results are
//! discarded by the machine's run-token check.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use verdant_core::diagnosis::{DetectionResult, DiagnosisModel, RemedyResult};
use verdant_core::error::Result;
use verdant_core::history::{AnalysisRecord, HistoryRepository};
use verdant_core::image::ImagePayload;
use verdant_core::pipeline::{
    Command, PipelineFailure, PipelineMachine, PipelineState, RunToken, smooth_confidence,
};

/// Orchestrates analysis runs and owns the shared history log.
///
/// The presentation surface subscribes to the state channel; every state it
/// observes is the newest one, so a stale result can never be displayed.
pub struct AnalysisService {
    model: Arc<dyn DiagnosisModel>,
    repository: Arc<dyn HistoryRepository>,
    machine: Mutex<PipelineMachine>,
    /// In-memory history, most-recent-first. Append-only across runs.
    records: RwLock<Vec<AnalysisRecord>>,
    state_tx: watch::Sender<PipelineState>,
}

impl AnalysisService {
    /// Creates the service and loads the persisted history once.
    pub async fn new(
        model: Arc<dyn DiagnosisModel>,
        repository: Arc<dyn HistoryRepository>,
    ) -> Result<Self> {
        let records = repository.load().await?;
        tracing::debug!(entries = records.len(), "history loaded");

        let (state_tx, _) = watch::channel(PipelineState::Idle);

        Ok(Self {
            model,
            repository,
            machine: Mutex::new(PipelineMachine::new()),
            records: RwLock::new(records),
            state_tx,
        })
    }

    /// Subscribes to pipeline state changes.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state_tx.subscribe()
    }

    /// The currently published pipeline state.
    pub fn current_state(&self) -> PipelineState {
        self.state_tx.borrow().clone()
    }

    /// A snapshot of the history log, most-recent-first.
    pub async fn history(&self) -> Vec<AnalysisRecord> {
        self.records.read().await.clone()
    }

    /// Runs one full analysis for an acquired image.
    ///
    /// Returns the published state once this run reached a terminal state or
    /// was superseded by a newer acquisition.
    pub async fn analyze(&self, image: ImagePayload) -> PipelineState {
        let run = self.begin_run().await;
        tracing::info!(run = run.value(), "analysis started");

        let mut detection = match self.model.detect(&image).await {
            Ok(detection) => detection,
            Err(e) => return self.fail(run, PipelineFailure::Detection(e)).await,
        };

        // Display smoothing, sampled once per run; the smoothed value is
        // what both the surface and the history record see.
        detection.confidence = smooth_confidence(detection.confidence, &mut rand::thread_rng());

        let command = {
            let mut machine = self.machine.lock().await;
            let command = machine.on_detection(run, detection);
            if machine.is_current(run) {
                self.state_tx.send_replace(machine.state().clone());
            }
            command
        };

        let Some(Command::SuggestRemedies {
            disease,
            plant_description,
        }) = command
        else {
            // Unknown plant reached its terminal state, or this run was
            // superseded; either way there is nothing further to do.
            return self.current_state();
        };

        let remedy = match self.model.suggest_remedies(&disease, &plant_description).await {
            Ok(remedy) => remedy,
            Err(e) => return self.fail(run, PipelineFailure::Remedy(e)).await,
        };

        let append = {
            let mut machine = self.machine.lock().await;
            let command = machine.on_remedy(run, remedy);
            if command.is_some() {
                self.state_tx.send_replace(machine.state().clone());
            }
            command
        };

        if let Some(Command::AppendHistory { detection, remedy }) = append {
            tracing::info!(run = run.value(), plant = %detection.plant_name, "analysis completed");
            self.append_history(&image, &detection, &remedy).await;
        }

        self.current_state()
    }

    async fn begin_run(&self) -> RunToken {
        let mut machine = self.machine.lock().await;
        let run = machine.begin_run();
        self.state_tx.send_replace(machine.state().clone());
        run
    }

    async fn fail(&self, run: RunToken, failure: PipelineFailure) -> PipelineState {
        tracing::warn!(run = run.value(), %failure, "pipeline run failed");
        let mut machine = self.machine.lock().await;
        if machine.on_failure(run, failure) {
            self.state_tx.send_replace(machine.state().clone());
        }
        machine.state().clone()
    }

    async fn append_history(
        &self,
        image: &ImagePayload,
        detection: &DetectionResult,
        remedy: &RemedyResult,
    ) {
        let record = AnalysisRecord::from_run(image, detection, remedy);

        let snapshot = {
            let mut records = self.records.write().await;
            records.insert(0, record);
            records.clone()
        };

        // The in-memory log keeps the record even if persistence fails; the
        // next successful completion writes the full list again.
        if let Err(e) = self.repository.save(&snapshot).await {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }
}
