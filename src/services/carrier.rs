//! Serializable carrier for a configuration store.
//!
//! A [`ConfigurationCarrier`] encodes as:
//!
//! 1. the store's type name (`u16` big-endian length + UTF-8)
//! 2. the store's own body, exactly as its `write_to` produced it
//!
//! The body is cached after the first encode and reused until the store is
//! lent out mutably or replaced by a decode. There is no way to observe
//! mutation through a lent `&mut`, so lending always drops the cache.
//!
//! # Threading
//!
//! Resolve configuration on the coordinating thread and ship the carrier (or
//! its resolved entries) to workers. Workers must not build default
//! configurations themselves: [`ConfigurationCarrier::build_job`] and the
//! decode path both start from empty stores for that reason.

use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use crate::domain::errors::{CarrierError, CarrierResult, DecodeCause};
use crate::domain::ports::ConfigurationStore;
use crate::infrastructure::wire;
use crate::services::type_registry::ConfigurationRegistry;

/// Initial capacity of the buffer a body is encoded into.
pub const INITIAL_ENCODE_CAPACITY: usize = 512;

/// Owns one configuration store and encodes/decodes it with a cached body.
pub struct ConfigurationCarrier {
    config: Option<Box<dyn ConfigurationStore>>,
    encoded_cache: Option<Bytes>,
    registry: Arc<ConfigurationRegistry>,
}

impl ConfigurationCarrier {
    /// Carrier around `config`, decoding with the shared registry.
    pub fn new(config: impl ConfigurationStore) -> Self {
        Self::from_store(Box::new(config))
    }

    /// Carrier around an optional boxed store.
    ///
    /// `None` is rejected with [`CarrierError::InvalidArgument`].
    pub fn from_boxed(config: Option<Box<dyn ConfigurationStore>>) -> CarrierResult<Self> {
        config.map(Self::from_store).ok_or_else(|| {
            CarrierError::InvalidArgument("Configuration must not be null.".to_string())
        })
    }

    fn from_store(config: Box<dyn ConfigurationStore>) -> Self {
        Self {
            config: Some(config),
            encoded_cache: None,
            registry: ConfigurationRegistry::shared(),
        }
    }

    /// Placeholder carrier to decode into, using the shared registry.
    pub fn empty() -> Self {
        Self::empty_with_registry(ConfigurationRegistry::shared())
    }

    /// Placeholder carrier to decode into, resolving types with `registry`.
    pub fn empty_with_registry(registry: Arc<ConfigurationRegistry>) -> Self {
        Self {
            config: None,
            encoded_cache: None,
            registry,
        }
    }

    /// Replace the registry used by later decodes.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ConfigurationRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Whether the carrier holds a store.
    pub const fn is_set(&self) -> bool {
        self.config.is_some()
    }

    /// Whether an encoded body is currently cached.
    pub const fn is_cached(&self) -> bool {
        self.encoded_cache.is_some()
    }

    /// Lend the live store.
    ///
    /// Always drops the cached body: the caller may mutate the store through
    /// the returned reference.
    pub fn get_config(&mut self) -> Option<&mut dyn ConfigurationStore> {
        if self.encoded_cache.take().is_some() {
            tracing::trace!("encoded configuration cache invalidated by get_config");
        }
        self.config.as_deref_mut()
    }

    /// Read-only view of the store. Leaves the cache intact.
    pub fn peek(&self) -> Option<&dyn ConfigurationStore> {
        self.config.as_deref()
    }

    /// Give up the store.
    pub fn into_config(self) -> Option<Box<dyn ConfigurationStore>> {
        self.config
    }

    /// Write the type name and the (possibly cached) body to `out`.
    ///
    /// A body encoded during a call that then fails to write stays cached.
    pub fn encode<W: Write>(&mut self, out: &mut W) -> CarrierResult<()> {
        let config = self
            .config
            .as_deref()
            .ok_or(CarrierError::MissingConfiguration)?;

        let body = if let Some(cached) = &self.encoded_cache {
            tracing::trace!(bytes = cached.len(), "reusing cached configuration encoding");
            cached.clone()
        } else {
            let mut writer = BytesMut::with_capacity(INITIAL_ENCODE_CAPACITY).writer();
            config
                .write_to(&mut writer)
                .map_err(CarrierError::EncodeIo)?;
            let encoded = writer.into_inner().freeze();
            tracing::debug!(
                type_name = config.type_name(),
                entries = config.len(),
                bytes = encoded.len(),
                "encoded configuration"
            );
            self.encoded_cache = Some(encoded.clone());
            encoded
        };

        wire::write_utf(out, config.type_name()).map_err(CarrierError::EncodeIo)?;
        out.write_all(&body).map_err(CarrierError::EncodeIo)?;
        Ok(())
    }

    /// Replace the store with one decoded from `input`.
    ///
    /// The cache is dropped first, whatever the outcome. On failure the
    /// previous store is kept.
    pub fn decode<R: Read>(&mut self, input: &mut R) -> CarrierResult<()> {
        self.encoded_cache = None;

        let type_name = wire::read_utf(input).map_err(DecodeCause::from)?;
        let mut config = self
            .registry
            .instantiate(&type_name)
            .map_err(DecodeCause::from)?;
        config.read_fields(input).map_err(DecodeCause::from)?;

        tracing::debug!(
            type_name = %type_name,
            entries = config.len(),
            "decoded configuration"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&mut self) -> CarrierResult<Vec<u8>> {
        let mut out = Vec::with_capacity(INITIAL_ENCODE_CAPACITY);
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Decode a carrier from `bytes`, resolving types with `registry`.
    pub fn from_bytes(bytes: &[u8], registry: Arc<ConfigurationRegistry>) -> CarrierResult<Self> {
        let mut carrier = Self::empty_with_registry(registry);
        let mut input = bytes;
        carrier.decode(&mut input)?;
        Ok(carrier)
    }
}

impl Default for ConfigurationCarrier {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ConfigurationCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationCarrier")
            .field("config", &self.config)
            .field("cached_bytes", &self.encoded_cache.as_ref().map(Bytes::len))
            .field("registry", &self.registry)
            .finish()
    }
}
