//! Unified path management for verdant configuration files.
//!
//! All verdant configuration, secrets, and history data live under the
//! platform config directory (e.g. `~/.config/verdant/` on Linux).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/verdant/
//! ├── config.toml     # Optional application configuration
//! ├── secret.json     # API keys
//! ├── history.json    # Persisted analysis history
//! └── logs/           # Application logs
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for verdant.
pub struct VerdantPaths;

impl VerdantPaths {
    /// Returns the verdant configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/verdant/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("verdant"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the persisted history file.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template contains an empty Gemini API key placeholder so the user
    /// only has to fill in the value.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on
    /// Unix systems.
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        // If file already exists, return the path
        if secret_path.exists() {
            return Ok(secret_path);
        }

        // Ensure parent directory exists
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use verdant_core::config::{GeminiConfig, SecretConfig};

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some("gemini-2.5-flash".to_string()),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
