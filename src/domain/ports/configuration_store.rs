//! The configuration store port.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read, Write};

/// A mutable string key/value store that owns its binary form.
///
/// The carrier never interprets the bytes produced by [`write_to`]: whatever a
/// store writes, the same store type must consume again in [`read_fields`].
/// Implementations are registered by [`type_name`] so a decoder can rebuild the
/// right concrete type.
///
/// [`write_to`]: ConfigurationStore::write_to
/// [`read_fields`]: ConfigurationStore::read_fields
/// [`type_name`]: ConfigurationStore::type_name
pub trait ConfigurationStore: fmt::Debug + Send + Sync + 'static {
    /// Identifier this store is registered under.
    fn type_name(&self) -> &str;

    /// Resolved value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Remove `key`. Returns whether it was present.
    fn unset(&mut self, key: &str) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the store has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw (unexpanded) entries.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    /// Snapshot of the raw entries.
    fn to_map(&self) -> BTreeMap<String, String> {
        self.entries()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Write the full self-describing body of this store.
    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()>;

    /// Replace the contents of this store with a body read from `source`.
    fn read_fields(&mut self, source: &mut dyn Read) -> io::Result<()>;

    /// Upcast for downcasting to the concrete store type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`as_any`](ConfigurationStore::as_any).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
