//! Domain errors for the configuration carrier.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`ConfigurationCarrier`](crate::services::ConfigurationCarrier).
#[derive(Debug, Error)]
pub enum CarrierError {
    /// A caller-supplied argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Encode was called on a carrier without a store.
    #[error("Carrier holds no configuration; decode or construct one first")]
    MissingConfiguration,

    /// Writing the type name or body failed.
    #[error("Failed to encode configuration: {0}")]
    EncodeIo(#[source] io::Error),

    /// Reading or instantiating the store failed.
    #[error("Unable to create configuration: {0}")]
    DecodeIo(#[from] DecodeCause),

    /// The default job configuration could not be loaded.
    #[error("Failed to build job: {0}")]
    JobBuildIo(#[source] JobError),
}

/// Underlying reason a decode failed.
///
/// Decoding collapses every failure into [`CarrierError::DecodeIo`]; this keeps
/// the original cause reachable through `source()`.
#[derive(Debug, Error)]
pub enum DecodeCause {
    /// The input could not be read.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// The type name could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors from the configuration type registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No factory is registered under the name.
    #[error("Unknown configuration type: {0}")]
    UnknownType(String),

    /// The registered factory failed.
    #[error("Failed to instantiate configuration type {type_name}: {reason}")]
    Instantiation {
        /// Name the factory is registered under.
        type_name: String,
        /// Message from the factory.
        reason: String,
    },

    /// A factory is already registered under the name.
    #[error("Configuration type already registered: {0}")]
    DuplicateType(String),
}

/// Errors raised by [`Configuration`](crate::domain::models::Configuration) itself.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A resource file could not be read.
    #[error("Failed to read resource {path}: {source}")]
    ResourceRead {
        /// Resource file.
        path: PathBuf,
        /// Read failure.
        #[source]
        source: io::Error,
    },

    /// A resource file is not valid YAML.
    #[error("Failed to parse resource {path}: {source}")]
    ResourceParse {
        /// Resource file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// A resource file is not a mapping.
    #[error("Resource {path} must be a mapping at the top level")]
    ResourceShape {
        /// Resource file.
        path: PathBuf,
    },

    /// A typed getter could not parse the value.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Property key.
        key: String,
        /// Expanded value that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Errors from the job handle factory.
#[derive(Debug, Error)]
pub enum JobError {
    /// The default configuration failed to load.
    #[error("Failed to load job configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result alias for carrier operations.
pub type CarrierResult<T> = Result<T, CarrierError>;
