//! droidstrap core - shared types
//!
//! Configuration and error handling shared by the toolchain crate and the
//! command-line front end.

#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{AppConfig, AndroidConfig, NetworkConfig};
pub use error::{DroidstrapError, Result};

/// droidstrap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "droidstrap";
