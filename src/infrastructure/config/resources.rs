//! Default configuration resources.
//!
//! A default resource is a YAML mapping whose (possibly nested) keys become
//! configuration keys joined with dots:
//!
//! ```yaml
//! io:
//!   file.buffer.size: 8192
//! fs.defaultFS: hdfs://namenode:8020
//! ```
//!
//! Resources are applied in order, later ones overriding earlier ones, on top
//! of the builtin defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};

use serde_yaml::Value;

use crate::domain::errors::ConfigurationError;
use crate::domain::models::Settings;

/// Source label recorded for builtin default values.
pub const BUILTIN_SOURCE: &str = "builtin-defaults";

/// Values every default configuration starts from.
pub const BUILTIN_DEFAULTS: &[(&str, &str)] = &[
    ("fs.defaultFS", "file:///"),
    ("io.file.buffer.size", "4096"),
    ("tmp.dir", "/tmp/confcarrier"),
];

static GLOBAL: OnceLock<RwLock<DefaultResources>> = OnceLock::new();

/// Ordered list of default resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultResources {
    builtin: bool,
    paths: Vec<PathBuf>,
}

impl Default for DefaultResources {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl DefaultResources {
    /// No builtin defaults and no files.
    pub fn none() -> Self {
        Self {
            builtin: false,
            paths: Vec::new(),
        }
    }

    /// Resources named by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            builtin: settings.builtin_defaults,
            paths: settings.default_resources.clone(),
        }
    }

    /// Toggle the builtin defaults.
    #[must_use]
    pub fn with_builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }

    /// Append a resource file; later resources override earlier ones.
    #[must_use]
    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Resource files, in application order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Snapshot of the process-wide default resources.
    pub fn global() -> Self {
        global_lock()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the process-wide default resources.
    ///
    /// Call this on the coordinating thread before any default configuration is built.
    pub fn install(resources: Self) {
        tracing::debug!(
            builtin = resources.builtin,
            resources = ?resources.paths,
            "installing default configuration resources"
        );
        *global_lock()
            .write()
            .unwrap_or_else(PoisonError::into_inner) = resources;
    }

    /// Append one resource to the process-wide list.
    pub fn add_global_resource(path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(path = %path.display(), "adding default configuration resource");
        global_lock()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .paths
            .push(path);
    }

    /// Load every resource, failing on the first unreadable or malformed one.
    ///
    /// Missing files are skipped.
    pub fn load(&self) -> Result<Vec<(String, BTreeMap<String, String>)>, ConfigurationError> {
        let mut loaded = Vec::with_capacity(self.paths.len() + 1);
        if self.builtin {
            loaded.push((BUILTIN_SOURCE.to_string(), builtin_entries()));
        }
        for path in &self.paths {
            if let Some(entries) = load_resource(path)? {
                loaded.push((path.display().to_string(), entries));
            }
        }
        Ok(loaded)
    }

    /// Like [`DefaultResources::load`] but logs and skips broken resources.
    pub fn load_lenient(&self) -> Vec<(String, BTreeMap<String, String>)> {
        let mut loaded = Vec::with_capacity(self.paths.len() + 1);
        if self.builtin {
            loaded.push((BUILTIN_SOURCE.to_string(), builtin_entries()));
        }
        for path in &self.paths {
            match load_resource(path) {
                Ok(Some(entries)) => loaded.push((path.display().to_string(), entries)),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping default resource");
                }
            }
        }
        loaded
    }
}

fn global_lock() -> &'static RwLock<DefaultResources> {
    GLOBAL.get_or_init(|| RwLock::new(DefaultResources::default()))
}

fn builtin_entries() -> BTreeMap<String, String> {
    BUILTIN_DEFAULTS
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

fn load_resource(path: &Path) -> Result<Option<BTreeMap<String, String>>, ConfigurationError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "default resource not found, skipping");
        return Ok(None);
    }

    let contents =
        std::fs::read_to_string(path).map_err(|source| ConfigurationError::ResourceRead {
            path: path.to_path_buf(),
            source,
        })?;
    let document: Value =
        serde_yaml::from_str(&contents).map_err(|source| ConfigurationError::ResourceParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = BTreeMap::new();
    match document {
        Value::Null => {}
        Value::Mapping(_) => flatten(None, &document, &mut entries),
        _ => {
            return Err(ConfigurationError::ResourceShape {
                path: path.to_path_buf(),
            })
        }
    }

    tracing::debug!(path = %path.display(), count = entries.len(), "loaded default resource");
    Ok(Some(entries))
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = scalar_to_string(key) else {
                    tracing::warn!(?key, "ignoring non-scalar key in default resource");
                    continue;
                };
                let full = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key,
                };
                flatten(Some(&full), child, out);
            }
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        Value::Sequence(items) => {
            if let Some(prefix) = prefix {
                let joined = items
                    .iter()
                    .filter_map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                out.insert(prefix.to_string(), joined);
            }
        }
        scalar => {
            if let (Some(prefix), Some(text)) = (prefix, scalar_to_string(scalar)) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
