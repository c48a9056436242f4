//! Port trait definitions (Hexagonal Architecture)
//!
//! - `ConfigurationStore`: a key/value configuration that encodes and decodes
//!   its own body
//!
//! The carrier depends only on this port, never on a concrete configuration.

pub mod configuration_store;

pub use configuration_store::ConfigurationStore;
