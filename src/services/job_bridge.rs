//! Helpers connecting carriers to job handles and plain configurations.

use std::ops::{Deref, DerefMut};

use crate::domain::errors::{CarrierError, CarrierResult};
use crate::domain::models::{Configuration, Job};
use crate::domain::ports::ConfigurationStore;
use crate::services::carrier::ConfigurationCarrier;

/// A configuration that is either freshly built or borrowed from a carrier.
#[derive(Debug)]
pub enum ConfigurationHandle<'a> {
    /// Built for the caller.
    Owned(Configuration),
    /// The carrier's live store.
    Borrowed(&'a mut dyn ConfigurationStore),
}

impl ConfigurationHandle<'_> {
    /// Whether the configuration was freshly built.
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl Deref for ConfigurationHandle<'_> {
    type Target = dyn ConfigurationStore;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Owned(config) => config,
            Self::Borrowed(config) => &**config,
        }
    }
}

impl DerefMut for ConfigurationHandle<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Owned(config) => config,
            Self::Borrowed(config) => &mut **config,
        }
    }
}

impl ConfigurationCarrier {
    /// Build a job from an optional carrier.
    ///
    /// Without a (set) carrier the job gets a default configuration. Otherwise
    /// the job starts from an empty configuration and every carrier entry is
    /// copied in one by one, so defaults never leak in on the worker side.
    ///
    /// Reading the entries goes through [`ConfigurationCarrier::get_config`],
    /// which drops the carrier's encoded cache even though nothing is mutated.
    pub fn build_job(carrier: Option<&mut Self>) -> CarrierResult<Job> {
        let Some(config) = carrier.and_then(Self::get_config) else {
            return Job::get_instance().map_err(CarrierError::JobBuildIo);
        };

        let mut job =
            Job::get_instance_with(Configuration::empty()).map_err(CarrierError::JobBuildIo)?;
        for (key, value) in config.entries() {
            job.configuration_mut().set(key, value);
        }
        tracing::debug!(
            job_id = %job.id(),
            entries = job.configuration().len(),
            "built job from carrier configuration"
        );
        Ok(job)
    }

    /// Carrier around a default configuration with `entries` set in order.
    ///
    /// Later duplicates of a key win.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Configuration::new();
        for (key, value) in entries {
            config.set(key, value);
        }
        Self::new(config)
    }

    /// A default configuration, or the carrier's live one.
    ///
    /// Borrowing from a carrier goes through [`ConfigurationCarrier::get_config`]
    /// and drops its cache. An unset carrier counts as absent.
    pub fn new_configuration(carrier: Option<&mut Self>) -> ConfigurationHandle<'_> {
        match carrier.and_then(Self::get_config) {
            Some(config) => ConfigurationHandle::Borrowed(config),
            None => ConfigurationHandle::Owned(Configuration::new()),
        }
    }
}
