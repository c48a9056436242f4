//! Settings loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Settings;

/// Default project-local settings file.
pub const SETTINGS_PATH: &str = ".confcarrier/settings.yaml";

/// Settings validation errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A default resource path is empty.
    #[error("Default resource path at index {0} cannot be empty")]
    EmptyResourcePath(usize),

    /// The log level is not recognised.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .confcarrier/settings.yaml (optional)
    pub fn load() -> Result<Settings> {
        Self::load_from_file(SETTINGS_PATH)
    }

    /// Load settings from a specific file merged over the defaults
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load settings from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&settings)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            resources = settings.default_resources.len(),
            "settings loaded"
        );
        Ok(settings)
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
        if let Some(index) = settings
            .default_resources
            .iter()
            .position(|path| path.as_os_str().is_empty())
        {
            return Err(SettingsError::EmptyResourcePath(index));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::InvalidLogLevel(
                settings.logging.level.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::{LogFormat, RotationPolicy};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.builtin_defaults);
        assert_eq!(settings.default_resources.len(), 2);
        assert_eq!(settings.logging.level, "info");
        SettingsLoader::validate(&settings).expect("Default settings should be valid");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = SettingsLoader::load_from_file("/nonexistent/settings.yaml")
            .expect("Missing settings file should fall back to defaults");
        assert_eq!(
            settings.default_resources,
            Settings::default().default_resources
        );
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br"
default_resources:
  - /etc/confcarrier/site.yaml
builtin_defaults: false
logging:
  level: debug
  format: pretty
",
        )
        .unwrap();

        let settings = SettingsLoader::load_from_file(&path).expect("Settings should load");
        assert_eq!(
            settings.default_resources,
            vec![PathBuf::from("/etc/confcarrier/site.yaml")]
        );
        assert!(!settings.builtin_defaults);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert!(settings.logging.enable_stdout);
    }

    #[test]
    fn test_unknown_logging_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "logging:\n  level: warn\n  retention_days: 0\n").unwrap();

        let settings = SettingsLoader::load_from_file(&path).expect("Settings should load");
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.rotation, RotationPolicy::Daily);
    }

    #[test]
    fn test_validate_rejects_empty_resource_path() {
        let mut settings = Settings::default();
        settings.default_resources.push(PathBuf::new());
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::EmptyResourcePath(2))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::InvalidLogLevel(_))
        ));
    }
}
