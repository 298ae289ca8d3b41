//! Pure transition functions for the pipeline state machine.

use super::state::{PipelineFailure, PipelineState, RunToken};
use crate::diagnosis::{DetectionResult, RemedyResult};

/// A side effect requested by a transition.
///
/// The machine never performs I/O; the caller executes these commands and
/// feeds the outcomes back in as events.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Invoke the remedy stage with the (normalized) disease label and the
    /// synthesized plant description.
    SuggestRemedies {
        disease: String,
        plant_description: String,
    },
    /// Append one record for the completed run at the head of the history.
    AppendHistory {
        detection: DetectionResult,
        remedy: RemedyResult,
    },
}

/// Sequences detection and remedy for one run at a time.
///
/// State transitions:
///
/// ```text
/// idle -> analyzing -> { unknown-plant | completed | failed }
/// ```
///
/// with every terminal state returning to `analyzing` on the next
/// [`begin_run`](Self::begin_run). Events from superseded runs are
/// discarded: they change no state and emit no command.
#[derive(Debug, Default)]
pub struct PipelineMachine {
    state: PipelineState,
    next_run: u64,
}

impl PipelineMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Whether `run` is the live run (stale events must be discarded).
    pub fn is_current(&self, run: RunToken) -> bool {
        self.state.run() == Some(run)
    }

    /// Starts a new run, clearing any previous result or error state.
    ///
    /// Implicitly supersedes an in-flight run: its later events will no
    /// longer match the live token.
    pub fn begin_run(&mut self) -> RunToken {
        let run = RunToken(self.next_run);
        self.next_run += 1;
        self.state = PipelineState::Analyzing {
            run,
            detection: None,
        };
        run
    }

    /// Applies a successful detection result.
    ///
    /// An unknown plant ends the run in `UnknownPlant` with no command; a
    /// known plant keeps the run in `Analyzing` and requests the remedy
    /// stage. The caller is expected to have applied display smoothing to
    /// the confidence beforehand.
    pub fn on_detection(
        &mut self,
        run: RunToken,
        detection: DetectionResult,
    ) -> Option<Command> {
        if !self.is_current(run) {
            return None;
        }

        if detection.is_unknown_plant() {
            self.state = PipelineState::UnknownPlant { run, detection };
            return None;
        }

        // Normalize the disease label once so the remedy call, the displayed
        // state, and the eventual history record all agree.
        let detection = DetectionResult {
            disease: detection.disease_label().to_string(),
            ..detection
        };

        let command = Command::SuggestRemedies {
            disease: detection.disease.clone(),
            plant_description: detection.plant_description(),
        };

        self.state = PipelineState::Analyzing {
            run,
            detection: Some(detection),
        };

        Some(command)
    }

    /// Applies a successful remedy result, completing the run.
    ///
    /// Emits the history append for exactly this run's detection and remedy.
    pub fn on_remedy(&mut self, run: RunToken, remedy: RemedyResult) -> Option<Command> {
        if !self.is_current(run) {
            return None;
        }

        let detection = match &self.state {
            PipelineState::Analyzing {
                detection: Some(detection),
                ..
            } => detection.clone(),
            // A remedy result without a preceding known-plant detection is a
            // protocol violation by the caller; drop it.
            _ => return None,
        };

        let command = Command::AppendHistory {
            detection: detection.clone(),
            remedy: remedy.clone(),
        };

        self.state = PipelineState::Completed {
            run,
            detection,
            remedy,
        };

        Some(command)
    }

    /// Applies a stage failure, ending the run in `Failed`.
    ///
    /// Returns whether the event was applied (false for stale runs).
    pub fn on_failure(&mut self, run: RunToken, failure: PipelineFailure) -> bool {
        if !self.is_current(run) {
            return false;
        }

        self.state = PipelineState::Failed { run, failure };
        true
    }
}
