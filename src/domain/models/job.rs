//! Job handle: a unit of submitted work carrying its own configuration copy.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::configuration::Configuration;
use crate::domain::errors::JobError;

/// Configuration key holding the job name.
pub const JOB_NAME_KEY: &str = "job.name";

/// A job handle and the configuration it will run with.
#[derive(Debug, Clone)]
pub struct Job {
    id: Uuid,
    created_at: DateTime<Utc>,
    configuration: Configuration,
}

impl Job {
    /// Job running with a default configuration (builtin defaults and default resources).
    pub fn get_instance() -> Result<Self, JobError> {
        let configuration = Configuration::try_new()?;
        Ok(Self::with_configuration(configuration))
    }

    /// Job running with `base` as its configuration. Nothing is added to it.
    pub fn get_instance_with(base: Configuration) -> Result<Self, JobError> {
        Ok(Self::with_configuration(base))
    }

    fn with_configuration(configuration: Configuration) -> Self {
        let job = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            configuration,
        };
        tracing::debug!(job_id = %job.id, entries = job.configuration.len(), "job created");
        job
    }

    /// Unique id assigned at creation.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the handle was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The configuration this job runs with.
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Mutable access to the job configuration.
    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configuration
    }

    /// Job name, stored under [`JOB_NAME_KEY`].
    pub fn name(&self) -> Option<String> {
        self.configuration.get(JOB_NAME_KEY)
    }

    /// Set the job name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.configuration.set(JOB_NAME_KEY, name);
    }

    /// Consume the job, returning its configuration.
    pub fn into_configuration(self) -> Configuration {
        self.configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_instance_with_keeps_base_untouched() {
        let base: Configuration = [("a", "1")].into_iter().collect();
        let job = Job::get_instance_with(base.clone()).unwrap();
        assert_eq!(job.configuration(), &base);
    }

    #[test]
    fn test_job_name_lives_in_configuration() {
        let mut job = Job::get_instance_with(Configuration::empty()).unwrap();
        assert_eq!(job.name(), None);

        job.set_name("wordcount");
        assert_eq!(job.name().as_deref(), Some("wordcount"));
        assert_eq!(job.configuration().get_raw(JOB_NAME_KEY), Some("wordcount"));
    }

    #[test]
    fn test_jobs_get_distinct_ids() {
        let first = Job::get_instance_with(Configuration::empty()).unwrap();
        let second = Job::get_instance_with(Configuration::empty()).unwrap();
        assert_ne!(first.id(), second.id());
    }
}
