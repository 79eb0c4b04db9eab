//! # Error Types
//!
//! Three layers of failure, from most to least transient:
//!
//! - [`ProbeError`]: one liveness attempt failed. The poller logs and swallows these.
//! - [`ConfigurationError`]: startup configuration could not be loaded or is invalid.
//! - [`GateError`]: what crosses the poller boundary. In practice only a deadline
//!   running out for a named target.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single probe attempt against a target
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection URL could not be parsed into an address
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// PostgreSQL connect or query failure
    #[error("Database probe failed: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis connect or command failure
    #[error("Cache probe failed: {0}")]
    Cache(#[from] redis::RedisError),

    /// The attempt did not finish within its own bound
    #[error("Probe did not complete within {0:?}")]
    ProbeTimedOut(Duration),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by the readiness gate to its caller
#[derive(Debug, Error)]
pub enum GateError {
    /// The target never reported ready before its deadline
    #[error("Timed out while waiting for {target}")]
    Timeout { target: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl GateError {
    /// Name of the target that timed out, if this is a timeout
    pub fn timed_out_target(&self) -> Option<&str> {
        match self {
            GateError::Timeout { target } => Some(target),
            GateError::Configuration(_) => None,
        }
    }
}

pub type GateResult<T> = std::result::Result<T, GateError>;
