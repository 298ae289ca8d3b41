//! Pipeline state types.

use crate::diagnosis::{DetectionResult, ModelError, RemedyResult};

/// Identifies one pipeline run.
///
/// Tokens are handed out monotonically by the machine; any event carrying a
/// token older than the live run's is discarded, which is how a newer
/// acquisition supersedes an in-flight run without cancelling its remote
/// calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(pub(crate) u64);

impl RunToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Why a run ended in the failed state.
///
/// Unknown plant is deliberately not here: it is a distinct terminal branch,
/// not a failure.
#[derive(Debug, Clone)]
pub enum PipelineFailure {
    /// The remote detection call errored or returned unusable data.
    Detection(ModelError),
    /// The remote remedy call errored.
    Remedy(ModelError),
}

impl PipelineFailure {
    /// The underlying model error, whichever stage raised it.
    pub fn model_error(&self) -> &ModelError {
        match self {
            Self::Detection(e) | Self::Remedy(e) => e,
        }
    }
}

impl std::fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detection(e) => write!(f, "disease detection failed: {e}"),
            Self::Remedy(e) => write!(f, "remedy suggestion failed: {e}"),
        }
    }
}

/// The orchestration's working state. Exactly one is live at a time.
///
/// Every terminal state (`UnknownPlant`, `Completed`, `Failed`) returns to
/// `Analyzing` when a new image is acquired; `Idle` exists only before the
/// first acquisition.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    /// No analysis has been requested yet.
    #[default]
    Idle,
    /// A run is in flight. `detection` is populated once the detection stage
    /// has succeeded with a known plant and the remedy stage is pending.
    Analyzing {
        run: RunToken,
        detection: Option<DetectionResult>,
    },
    /// Terminal: the model could not identify the subject. No remedy call is
    /// made and no history entry is written.
    UnknownPlant {
        run: RunToken,
        detection: DetectionResult,
    },
    /// Terminal: both stages succeeded and one record was appended.
    Completed {
        run: RunToken,
        detection: DetectionResult,
        remedy: RemedyResult,
    },
    /// Terminal: a remote call failed. Nothing was written.
    Failed {
        run: RunToken,
        failure: PipelineFailure,
    },
}

impl PipelineState {
    /// The run this state belongs to, if any.
    pub fn run(&self) -> Option<RunToken> {
        match self {
            Self::Idle => None,
            Self::Analyzing { run, .. }
            | Self::UnknownPlant { run, .. }
            | Self::Completed { run, .. }
            | Self::Failed { run, .. } => Some(*run),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlant { .. } | Self::Completed { .. } | Self::Failed { .. }
        )
    }
}
