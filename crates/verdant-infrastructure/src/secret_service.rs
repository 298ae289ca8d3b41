//! Secret service implementation.
//!
//! This module provides a service for managing secret configuration (API
//! keys) stored in secret.json.

use crate::storage::SecretStorage;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use verdant_core::config::SecretConfig;
use verdant_core::secret::SecretService;

/// Service for managing secret configuration.
///
/// This implementation reads secret configuration through [`SecretStorage`]
/// and caches it to avoid repeated file I/O operations.
#[derive(Clone)]
pub struct SecretServiceImpl {
    /// Cached secret config loaded from storage.
    /// Uses RwLock for thread-safe lazy loading.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    storage: Arc<SecretStorage>,
}

impl SecretServiceImpl {
    /// Creates a new SecretServiceImpl with the default secret path.
    pub fn new() -> Result<Self, String> {
        let storage =
            SecretStorage::new().map_err(|e| format!("Failed to resolve secret path: {}", e))?;
        Ok(Self {
            secrets: Arc::new(RwLock::new(None)),
            storage: Arc::new(storage),
        })
    }

    /// Creates a new SecretServiceImpl with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            storage: Arc::new(SecretStorage::with_path(path)),
        }
    }

    /// Loads the secrets from storage if not already cached.
    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        // Check if already cached
        {
            let read_lock = self.secrets.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        // The error from SecretStorage never contains key material.
        let loaded = self
            .storage
            .load()
            .map_err(|e| format!("Failed to load secret.json: {}", e))?;

        // Cache it
        {
            let mut write_lock = self.secrets.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn load_secrets_reads_and_caches() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"gemini": {{"api_key": "k"}}}}"#).unwrap();

        let service = SecretServiceImpl::with_path(file.path().to_path_buf());
        let first = service.load_secrets().await.unwrap();
        assert_eq!(first.gemini.unwrap().api_key, "k");

        // Delete the backing file; the cached value must still be served.
        drop(file);
        let second = service.load_secrets().await.unwrap();
        assert_eq!(second.gemini.unwrap().api_key, "k");
    }

    #[tokio::test]
    async fn secret_file_exists_reflects_disk() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        let service = SecretServiceImpl::with_path(path);
        assert!(service.secret_file_exists().await);

        let missing = SecretServiceImpl::with_path(PathBuf::from("/nonexistent/secret.json"));
        assert!(!missing.secret_file_exists().await);
    }
}
