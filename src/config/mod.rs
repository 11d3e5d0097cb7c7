//! Settings Store
//!
//! Small TOML settings file colocated with the plugin. Everything has a
//! default; a missing file is not an error. The binding file itself is a
//! separate format handled by [`crate::bindings::parser`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logging configuration
    pub logging: LoggingSettings,
    /// Binding-file resolution configuration
    pub bindings: BindingSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn or error
    pub level: String,
    /// Optional directory for a rolling log file; stderr only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Binding-file resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
    /// Fixed-name fallback file probed in the plugin directory
    pub fallback_file: String,
    /// Extension substituted onto the vehicle data file for tier-1 lookup
    pub extension: String,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            fallback_file: "mouse.prf".to_string(),
            extension: "prf".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings =
            toml::from_str(&content).context("Failed to parse settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, treating a missing file as defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate settings values.
    pub fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }
        if self.bindings.extension.is_empty() {
            anyhow::bail!("Binding file extension must not be empty");
        }
        if self.bindings.fallback_file.is_empty() {
            anyhow::bail!("Fallback binding file name must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.bindings.fallback_file, "mouse.prf");
        assert_eq!(settings.bindings.extension, "prf");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("mousebind.toml")).unwrap();
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mousebind.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let settings = Settings::load_or_default(&path).unwrap();
        assert_eq!(settings.logging.level, "debug");
        // Unspecified sections keep their defaults.
        assert_eq!(settings.bindings.extension, "prf");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mousebind.toml");
        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(Settings::load_or_default(&path).is_err());
    }
}
