//! Common test utilities for integration tests
//!
//! Provides shared fixtures and a counting configuration double used across
//! multiple integration test files.

use std::any::Any;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use confcarrier::{Configuration, ConfigurationStore};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `yaml` to `dir/name` and return the path
#[allow(dead_code)]
pub fn write_yaml(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, yaml).expect("Failed to write YAML fixture");
    path
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Configuration double counting how often its body is written
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct CountingConfiguration {
    pub inner: Configuration,
    pub writes: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingConfiguration {
    pub const TYPE_NAME: &'static str = "tests.CountingConfiguration";

    pub fn with_entries(entries: &[(&str, &str)]) -> (Self, Arc<AtomicUsize>) {
        let writes = Arc::new(AtomicUsize::new(0));
        let config = Self {
            inner: entries.iter().copied().collect(),
            writes: Arc::clone(&writes),
        };
        (config, writes)
    }

    pub fn write_count(writes: &AtomicUsize) -> usize {
        writes.load(Ordering::SeqCst)
    }
}

impl ConfigurationStore for CountingConfiguration {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.inner.set(key, value);
    }

    fn unset(&mut self, key: &str) -> bool {
        self.inner.unset(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.inner.iter())
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        ConfigurationStore::write_to(&self.inner, sink)
    }

    fn read_fields(&mut self, source: &mut dyn Read) -> io::Result<()> {
        self.inner.read_fields(source)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
