//! Application configuration loading.
//!
//! Reads the optional `config.toml` from the verdant config directory. A
//! missing or empty file yields the defaults.

use crate::paths::VerdantPaths;
use std::fs;
use std::path::Path;
use verdant_core::config::AppConfig;
use verdant_core::error::{Result, VerdantError};

/// Loads the application configuration from the default config file path.
pub fn load_app_config() -> Result<AppConfig> {
    let path = VerdantPaths::config_file()
        .map_err(|e| VerdantError::config(format!("Failed to resolve config path: {}", e)))?;
    load_app_config_from(&path)
}

/// Loads the application configuration from a specific path.
pub fn load_app_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_app_config_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.model_name.is_none());
    }

    #[test]
    fn model_name_is_read_from_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model_name = \"gemini-2.5-pro\"\n").unwrap();

        let config = load_app_config_from(&path).unwrap();
        assert_eq!(config.model_name.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "\n").unwrap();

        assert!(load_app_config_from(&path).unwrap().model_name.is_none());
    }
}
