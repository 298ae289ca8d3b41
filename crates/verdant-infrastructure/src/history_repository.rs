//! File-backed history repository.
//!
//! Persists the analysis history as a single JSON array in `history.json`
//! under the verdant config directory, most-recent-first.

use crate::paths::VerdantPaths;
use crate::storage::AtomicJsonFile;
use std::path::PathBuf;
use std::sync::Arc;
use verdant_core::error::{Result, VerdantError};
use verdant_core::history::{AnalysisRecord, HistoryRepository};

/// Repository storing the history log in one well-known JSON file.
#[derive(Clone)]
pub struct JsonHistoryRepository {
    file: Arc<AtomicJsonFile<Vec<AnalysisRecord>>>,
}

impl JsonHistoryRepository {
    /// Creates a repository backed by the default history file.
    pub fn new() -> Result<Self> {
        let path = VerdantPaths::history_file()
            .map_err(|e| VerdantError::config(format!("Failed to resolve history path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    /// Creates a repository backed by a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }
}

#[async_trait::async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Vec<AnalysisRecord>> {
        let file = self.file.clone();
        let records = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| VerdantError::internal(format!("Failed to join task: {}", e)))?
            .map_err(|e| VerdantError::data_access(format!("Failed to load history: {}", e)))?;

        Ok(records.unwrap_or_default())
    }

    async fn save(&self, records: &[AnalysisRecord]) -> Result<()> {
        let file = self.file.clone();
        let records = records.to_vec();
        // The transactional update holds the file lock, so two verdant
        // processes never interleave their writes.
        tokio::task::spawn_blocking(move || {
            file.update(Vec::new(), move |stored| {
                *stored = records;
                Ok(())
            })
        })
        .await
        .map_err(|e| VerdantError::internal(format!("Failed to join task: {}", e)))?
        .map_err(|e| VerdantError::data_access(format!("Failed to save history: {}", e)))?;

        tracing::debug!("history persisted");
        Ok(())
    }
}
