//! Infrastructure layer module
//!
//! - Wire framing shared by the carrier and the builtin configuration body
//! - Settings loading and default configuration resources
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod wire;
