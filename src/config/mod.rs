//! # Gate Configuration
//!
//! All settings are read once at startup into a [`GateConfig`] which is then passed
//! by value into the gate. Nothing downstream reads the process environment.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use readiness_gate::config::GateConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GateConfig::from_env()?;
//! if config.needs_postgres() {
//!     println!("will wait up to {:?} for the database", config.timeout);
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;

use std::time::Duration;

use crate::constants::{DEFAULT_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_TIMEOUT, MAX_DURATION};
use crate::error::ConfigurationError;

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Readiness gate settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// PostgreSQL connection string; `None` disables the database check
    pub database_url: Option<String>,
    /// Redis URL; `None` disables the cache check
    pub redis_url: Option<String>,
    /// Budget per target
    pub timeout: Duration,
    /// Spacing between probe attempts
    pub interval: Duration,
    /// Bound on one probe attempt
    pub probe_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            redis_url: None,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_url<S: Into<String>>(mut self, url: S) -> Self {
        self.database_url = non_empty(Some(url.into()));
        self
    }

    pub fn with_redis_url<S: Into<String>>(mut self, url: S) -> Self {
        self.redis_url = non_empty(Some(url.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn needs_postgres(&self) -> bool {
        self.database_url.is_some()
    }

    pub fn needs_redis(&self) -> bool {
        self.redis_url.is_some()
    }

    /// Reject settings that would make the poll loop meaningless
    pub fn validate(&self) -> ConfigResult<()> {
        check_duration("interval", self.interval)?;
        check_duration("timeout", self.timeout)?;
        check_duration("probe timeout", self.probe_timeout)
    }
}

/// A gate duration must be non-zero and no longer than [`MAX_DURATION`]
pub(crate) fn check_duration(name: &str, value: Duration) -> ConfigResult<()> {
    if value.is_zero() {
        return Err(ConfigurationError::Invalid(format!(
            "{name} must be greater than zero"
        )));
    }
    if value > MAX_DURATION {
        return Err(ConfigurationError::Invalid(format!(
            "{name} of {value:?} exceeds the {MAX_DURATION:?} limit"
        )));
    }
    Ok(())
}

/// Blank connection strings count as unset
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
