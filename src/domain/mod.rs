//! Domain layer for the configuration carrier
//!
//! This module contains the configuration and job models, the store port and
//! the error types.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{
    CarrierError, CarrierResult, ConfigurationError, DecodeCause, JobError, RegistryError,
};
