//! The default `ConfigurationStore`: string properties with provenance,
//! default resources and `${name}` variable expansion.

use std::any::Any;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use crate::domain::errors::ConfigurationError;
use crate::domain::ports::ConfigurationStore;
use crate::infrastructure::config::DefaultResources;
use crate::infrastructure::wire;

/// Source recorded for values set through the API.
pub const PROGRAMMATIC_SOURCE: &str = "programmatically";

/// Upper bound on `${name}` substitutions performed by a single [`Configuration::get`].
pub const MAX_SUBSTITUTIONS: usize = 20;

/// A single property value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Raw value, before `${name}` expansion.
    pub value: String,
    /// Every source that set this key, oldest first.
    pub sources: Vec<String>,
}

/// Mutable string key/value configuration.
///
/// [`Configuration::new`] layers the installed default resources underneath
/// anything set later; [`Configuration::empty`] starts with nothing and never
/// touches resources, which is what worker-side code should use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    properties: BTreeMap<String, Property>,
}

impl Configuration {
    /// Identifier this type is registered and encoded under.
    pub const TYPE_NAME: &'static str = "confcarrier.Configuration";

    /// Configuration pre-populated from the process-wide default resources.
    ///
    /// Unreadable resources are logged and skipped; use [`Configuration::try_new`]
    /// to fail on them instead.
    pub fn new() -> Self {
        let resources = DefaultResources::global();
        let mut conf = Self::empty();
        for (source, entries) in resources.load_lenient() {
            conf.apply_resource(&source, entries);
        }
        conf
    }

    /// Strict variant of [`Configuration::new`].
    pub fn try_new() -> Result<Self, ConfigurationError> {
        Self::with_defaults_from(&DefaultResources::global())
    }

    /// Configuration pre-populated from an explicit set of default resources.
    pub fn with_defaults_from(resources: &DefaultResources) -> Result<Self, ConfigurationError> {
        let mut conf = Self::empty();
        for (source, entries) in resources.load()? {
            conf.apply_resource(&source, entries);
        }
        Ok(conf)
    }

    /// Configuration with no properties and no default resources.
    pub fn empty() -> Self {
        Self::default()
    }

    fn apply_resource(&mut self, source: &str, entries: BTreeMap<String, String>) {
        tracing::trace!(source, count = entries.len(), "applying configuration resource");
        for (key, value) in entries {
            self.set_with_source(key, value, source);
        }
    }

    /// Set `key` to `value`, recording the programmatic source.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set_with_source(key, value, PROGRAMMATIC_SOURCE);
    }

    /// Set `key` to `value`, recording `source` as where the value came from.
    pub fn set_with_source(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<String>,
    ) {
        let value = value.into();
        let source = source.into();
        self.properties
            .entry(key.into())
            .and_modify(|property| {
                property.value.clone_from(&value);
                if property.sources.last() != Some(&source) {
                    property.sources.push(source.clone());
                }
            })
            .or_insert_with(|| Property {
                value: value.clone(),
                sources: vec![source.clone()],
            });
    }

    /// Set `key` only if it has no value yet.
    pub fn set_if_unset(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.properties.contains_key(&key) {
            self.set(key, value);
        }
    }

    /// Remove `key`. Returns whether it was present.
    pub fn unset(&mut self, key: &str) -> bool {
        self.properties.remove(key).is_some()
    }

    /// Remove every property.
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value for `key` without variable expansion.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|property| property.value.as_str())
    }

    /// Value for `key` with `${name}` references expanded from this configuration.
    ///
    /// Unresolvable references and references to `key` itself are left as
    /// written. Expansion stops after [`MAX_SUBSTITUTIONS`] replacements.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_raw(key).map(|raw| self.expand(key, raw))
    }

    /// Expanded value for `key`, or `default` when unset.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Integer value for `key`, or `default` when unset.
    pub fn get_i64(&self, key: &str, default: i64) -> Result<i64, ConfigurationError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        value
            .trim()
            .parse()
            .map_err(|err: std::num::ParseIntError| ConfigurationError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: err.to_string(),
            })
    }

    /// Boolean value for `key` (`true`/`false`, case-insensitive), or `default` when unset.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigurationError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigurationError::InvalidValue {
                key: key.to_string(),
                value,
                reason: "expected true or false".to_string(),
            }),
        }
    }

    /// Sources that set `key`, oldest first.
    pub fn property_sources(&self, key: &str) -> Option<&[String]> {
        self.properties
            .get(key)
            .map(|property| property.sources.as_slice())
    }

    /// Raw entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.properties
            .iter()
            .map(|(key, property)| (key.as_str(), property.value.as_str()))
    }

    fn expand(&self, key: &str, raw: &str) -> String {
        let (eval, exhausted) = self.substitute(key, raw);
        if exhausted {
            tracing::warn!(
                key,
                max = MAX_SUBSTITUTIONS,
                "variable substitution depth exceeded; returning partially expanded value"
            );
        }
        eval
    }

    /// Expanded value, and whether a reference was still left to expand when
    /// the substitution limit was reached.
    fn substitute(&self, key: &str, raw: &str) -> (String, bool) {
        let mut eval = raw.to_string();
        for _ in 0..MAX_SUBSTITUTIONS {
            let Some((start, end)) = find_variable(&eval) else {
                return (eval, false);
            };
            let name = &eval[start + 2..end - 1];
            if name == key {
                return (eval, false);
            }
            let Some(replacement) = self.get_raw(name) else {
                return (eval, false);
            };
            let replacement = replacement.to_string();
            eval.replace_range(start..end, &replacement);
        }
        let exhausted = find_variable(&eval).is_some();
        (eval, exhausted)
    }
}

/// Byte range of the first `${name}` reference whose name has no `$`, `}` or space.
fn find_variable(value: &str) -> Option<(usize, usize)> {
    let bytes = value.as_bytes();
    let mut from = 0;
    while let Some(offset) = value[from..].find("${") {
        let start = from + offset;
        if let Some(close) = value[start + 2..].find('}') {
            let name = &bytes[start + 2..start + 2 + close];
            if !name.is_empty() && !name.iter().any(|b| *b == b'$' || *b == b' ') {
                return Some((start, start + 2 + close + 1));
            }
        }
        from = start + 1;
    }
    None
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conf = Self::empty();
        for (key, value) in iter {
            conf.set(key, value);
        }
        conf
    }
}

impl ConfigurationStore for Configuration {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get(&self, key: &str) -> Option<String> {
        Self::get(self, key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.set_with_source(key, value, PROGRAMMATIC_SOURCE);
    }

    fn unset(&mut self, key: &str) -> bool {
        Self::unset(self, key)
    }

    fn len(&self) -> usize {
        self.properties.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.iter())
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        wire::write_len(sink, self.properties.len())?;
        for (key, property) in &self.properties {
            wire::write_string(sink, key)?;
            wire::write_string(sink, &property.value)?;
            wire::write_len(sink, property.sources.len())?;
            for source in &property.sources {
                wire::write_string(sink, source)?;
            }
        }
        Ok(())
    }

    fn read_fields(&mut self, source: &mut dyn Read) -> io::Result<()> {
        self.clear();
        let count = wire::read_u32(source)?;
        for _ in 0..count {
            let key = wire::read_string(source)?;
            let value = wire::read_string(source)?;
            let source_count = wire::read_u32(source)?;
            let mut sources = Vec::new();
            for _ in 0..source_count {
                sources.push(wire::read_string(source)?);
            }
            self.properties.insert(key, Property { value, sources });
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
