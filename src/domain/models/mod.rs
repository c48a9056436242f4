//! Domain models

pub mod configuration;
pub mod job;
pub mod settings;

pub use configuration::{Configuration, Property, MAX_SUBSTITUTIONS, PROGRAMMATIC_SOURCE};
pub use job::{Job, JOB_NAME_KEY};
pub use settings::Settings;
