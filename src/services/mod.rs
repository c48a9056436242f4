//! Services: the carrier, its type registry, and job helpers

pub mod carrier;
pub mod job_bridge;
pub mod type_registry;

pub use carrier::{ConfigurationCarrier, INITIAL_ENCODE_CAPACITY};
pub use job_bridge::ConfigurationHandle;
pub use type_registry::{ConfigurationFactory, ConfigurationRegistry};
