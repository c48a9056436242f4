//! Registry of configuration types that a carrier can decode.
//!
//! An encoded carrier names the concrete store type it holds. Decoding looks
//! that name up here and asks the registered factory for an empty instance,
//! which then reads its own body.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::domain::errors::RegistryError;
use crate::domain::models::Configuration;
use crate::domain::ports::ConfigurationStore;

/// Builds an empty store, or explains why it could not.
pub type ConfigurationFactory =
    Arc<dyn Fn() -> Result<Box<dyn ConfigurationStore>, String> + Send + Sync>;

static SHARED: OnceLock<Arc<ConfigurationRegistry>> = OnceLock::new();

/// Maps type names to store factories.
#[derive(Clone, Default)]
pub struct ConfigurationRegistry {
    factories: HashMap<String, ConfigurationFactory>,
}

impl ConfigurationRegistry {
    /// Registry with no types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry knowing the builtin [`Configuration`] type.
    ///
    /// Decoded `Configuration`s start empty: default resources are never loaded
    /// on the decoding side.
    pub fn with_builtin() -> Self {
        let factory: ConfigurationFactory =
            Arc::new(|| Ok(Box::new(Configuration::empty()) as Box<dyn ConfigurationStore>));
        let mut registry = Self::new();
        registry
            .factories
            .insert(Configuration::TYPE_NAME.to_string(), factory);
        registry
    }

    /// Process-wide registry with the builtin types, used by carriers that were
    /// not given one explicitly.
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::with_builtin())))
    }

    /// Register `C` under `type_name`, built with `C::default()`.
    pub fn register<C>(&mut self, type_name: impl Into<String>) -> Result<(), RegistryError>
    where
        C: ConfigurationStore + Default,
    {
        self.register_factory(type_name, || {
            Ok(Box::new(C::default()) as Box<dyn ConfigurationStore>)
        })
    }

    /// Register an arbitrary factory under `type_name`.
    pub fn register_factory<F>(
        &mut self,
        type_name: impl Into<String>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<Box<dyn ConfigurationStore>, String> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.factories.contains_key(&type_name) {
            return Err(RegistryError::DuplicateType(type_name));
        }
        tracing::debug!(type_name = %type_name, "registering configuration type");
        self.factories.insert(type_name, Arc::new(factory));
        Ok(())
    }

    /// Whether `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build an empty instance of `type_name`.
    ///
    /// A factory that fails, or that produces a store reporting a different
    /// type name, is an instantiation failure.
    pub fn instantiate(&self, type_name: &str) -> Result<Box<dyn ConfigurationStore>, RegistryError> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;

        let store = factory().map_err(|reason| RegistryError::Instantiation {
            type_name: type_name.to_string(),
            reason,
        })?;

        if store.type_name() != type_name {
            return Err(RegistryError::Instantiation {
                type_name: type_name.to_string(),
                reason: format!("factory produced a {} instead", store.type_name()),
            });
        }
        Ok(store)
    }
}

impl fmt::Debug for ConfigurationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
