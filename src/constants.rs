//! # Gate Constants
//!
//! Defaults and names shared by configuration, probes and output.

use std::time::Duration;

/// Total time budget for one target before the gate gives up
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Spacing between probe attempts
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on a single probe attempt
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest accepted value for any of the gate durations
pub const MAX_DURATION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Port used when `REDIS_URL` omits one
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Display names printed in progress output and timeout diagnostics
pub mod targets {
    pub const POSTGRES: &str = "PostgreSQL";
    pub const REDIS: &str = "Redis";
}

/// Environment variables the gate reads at startup
pub mod env_vars {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const REDIS_URL: &str = "REDIS_URL";
    pub const TIMEOUT_SECONDS: &str = "GATE_TIMEOUT_SECONDS";
    pub const INTERVAL_MS: &str = "GATE_INTERVAL_MS";
    pub const PROBE_TIMEOUT_MS: &str = "GATE_PROBE_TIMEOUT_MS";
    pub const LOG_FORMAT: &str = "GATE_LOG_FORMAT";
}

/// Process exit codes
pub mod exit_codes {
    pub const READY: i32 = 0;
    pub const TIMED_OUT: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
}
