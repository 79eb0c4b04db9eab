//! Configuration Loader
//!
//! Builds a [`GateConfig`] from environment variables through the `config` crate.
//! Defaults live on the builder so a bare environment yields the stock five-minute,
//! half-second cadence.

use std::collections::HashMap;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use tracing::debug;

use super::{non_empty, ConfigResult, GateConfig};
use crate::constants::{DEFAULT_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_TIMEOUT};

/// Flat view of the environment, keyed by lowercased variable name
#[derive(Debug, Deserialize)]
struct EnvSettings {
    database_url: Option<String>,
    redis_url: Option<String>,
    gate_timeout_seconds: u64,
    gate_interval_ms: u64,
    gate_probe_timeout_ms: u64,
}

impl GateConfig {
    /// Load from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_source(vars: HashMap<String, String>) -> ConfigResult<Self> {
        Self::load(Some(vars.into_iter().collect()))
    }

    fn load(source: Option<config::Map<String, String>>) -> ConfigResult<Self> {
        let settings: EnvSettings = Config::builder()
            .set_default("gate_timeout_seconds", DEFAULT_TIMEOUT.as_secs() as i64)?
            .set_default("gate_interval_ms", DEFAULT_INTERVAL.as_millis() as i64)?
            .set_default("gate_probe_timeout_ms", DEFAULT_PROBE_TIMEOUT.as_millis() as i64)?
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .ignore_empty(true)
                    .source(source),
            )
            .build()?
            .try_deserialize()?;

        let config = GateConfig {
            database_url: non_empty(settings.database_url),
            redis_url: non_empty(settings.redis_url),
            timeout: Duration::from_secs(settings.gate_timeout_seconds),
            interval: Duration::from_millis(settings.gate_interval_ms),
            probe_timeout: Duration::from_millis(settings.gate_probe_timeout_ms),
        };
        config.validate()?;

        debug!(
            needs_postgres = config.needs_postgres(),
            needs_redis = config.needs_redis(),
            timeout = ?config.timeout,
            interval = ?config.interval,
            probe_timeout = ?config.probe_timeout,
            "Gate configuration loaded"
        );

        Ok(config)
    }
}
