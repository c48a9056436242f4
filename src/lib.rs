//! Confcarrier - serializable configuration carrier
//!
//! Lets a mutable key/value configuration travel through a binary
//! encode/decode protocol. The encoded body is cached between encodes and
//! dropped whenever the live configuration is lent out or replaced.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): configuration and job models, the
//!   `ConfigurationStore` port, error types
//! - **Service Layer** (`services`): the carrier, the type registry and the
//!   job helpers
//! - **Infrastructure Layer** (`infrastructure`): wire framing, settings,
//!   default resources, logging
//!
//! # Example
//!
//! ```
//! use confcarrier::{Configuration, ConfigurationCarrier, ConfigurationRegistry};
//!
//! let mut conf = Configuration::empty();
//! conf.set("fs.defaultFS", "hdfs://namenode:8020");
//!
//! let bytes = ConfigurationCarrier::new(conf).to_bytes()?;
//! let mut decoded = ConfigurationCarrier::from_bytes(&bytes, ConfigurationRegistry::shared())?;
//! let job = ConfigurationCarrier::build_job(Some(&mut decoded))?;
//! assert_eq!(
//!     job.configuration().get("fs.defaultFS").as_deref(),
//!     Some("hdfs://namenode:8020")
//! );
//! # Ok::<(), confcarrier::CarrierError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Configuration, Job, Settings};
pub use domain::ports::ConfigurationStore;
pub use domain::{CarrierError, ConfigurationError, DecodeCause, JobError, RegistryError};
pub use infrastructure::config::{DefaultResources, SettingsLoader};
pub use infrastructure::logging::{LogConfig, LoggerImpl};
pub use services::{ConfigurationCarrier, ConfigurationHandle, ConfigurationRegistry};
