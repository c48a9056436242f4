//! Configuration management infrastructure
//!
//! - Settings for the crate, loaded with figment (defaults + YAML file)
//! - Default configuration resources applied by `Configuration::new`

pub mod loader;
pub mod resources;

pub use loader::{SettingsError, SettingsLoader, SETTINGS_PATH};
pub use resources::{DefaultResources, BUILTIN_DEFAULTS, BUILTIN_SOURCE};
