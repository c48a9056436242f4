//! Settings for the crate itself: where default resources live and how to log.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::logging::LogConfig;

/// Top-level settings, loaded by [`SettingsLoader`](crate::infrastructure::config::SettingsLoader).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default resource files applied by `Configuration::new`, in order.
    pub default_resources: Vec<PathBuf>,

    /// Apply the builtin defaults underneath the resource files.
    pub builtin_defaults: bool,

    /// Logging setup.
    pub logging: LogConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_resources: vec![
                PathBuf::from("confcarrier-default.yaml"),
                PathBuf::from("confcarrier-site.yaml"),
            ],
            builtin_defaults: true,
            logging: LogConfig::default(),
        }
    }
}
