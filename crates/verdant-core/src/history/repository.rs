//! History persistence interface.

use super::model::AnalysisRecord;
use crate::error::Result;

/// Persistent storage backend for the analysis history.
///
/// The log is read once at startup and written in full after every
/// successful completion; implementations must make the write atomic so a
/// reader never observes a partially-written log.
#[async_trait::async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the full history, most-recent-first.
    ///
    /// A missing or empty store loads as an empty list.
    async fn load(&self) -> Result<Vec<AnalysisRecord>>;

    /// Replaces the persisted history with the given ordered list.
    async fn save(&self, records: &[AnalysisRecord]) -> Result<()>;
}
