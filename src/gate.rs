//! # Readiness Gate
//!
//! Runs one poll session per enabled target, strictly in order: the database is
//! fully resolved before the cache is first probed. The first timeout ends the run.

use std::time::Duration;

use tracing::info;

use crate::config::GateConfig;
use crate::constants::{exit_codes, targets};
use crate::error::{GateError, GateResult};
use crate::poller::{wait_for, PollSummary};
use crate::probe::{PostgresProbe, Probe, RedisProbe};
use crate::reporter::Reporter;

/// A named backing service and the probe that checks it
pub struct Target {
    pub name: String,
    pub probe: Box<dyn Probe>,
}

impl Target {
    pub fn new<S: Into<String>>(name: S, probe: Box<dyn Probe>) -> Self {
        Self {
            name: name.into(),
            probe,
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("probe", &self.probe.kind())
            .finish()
    }
}

/// Per-target results of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    pub ready: Vec<(String, PollSummary)>,
}

impl GateReport {
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}

#[derive(Debug)]
pub struct Gate {
    targets: Vec<Target>,
    timeout: Duration,
    interval: Duration,
}

impl Gate {
    /// Build the ordered target list from configuration
    ///
    /// Targets whose URL is unset or blank are left out entirely. Timing settings
    /// are validated first.
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        config.validate()?;

        let mut targets = Vec::new();

        if let Some(url) = &config.database_url {
            targets.push(Target::new(
                targets::POSTGRES,
                Box::new(PostgresProbe::new(url.as_str(), config.probe_timeout)),
            ));
        }

        if let Some(url) = &config.redis_url {
            targets.push(Target::new(
                targets::REDIS,
                Box::new(RedisProbe::new(url.as_str(), config.probe_timeout)),
            ));
        }

        Ok(Self::new(targets, config.timeout, config.interval))
    }

    pub fn new(targets: Vec<Target>, timeout: Duration, interval: Duration) -> Self {
        Self {
            targets,
            timeout,
            interval,
        }
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    /// Poll every target in order; stop at the first timeout
    pub async fn run(&self, reporter: &mut Reporter) -> GateResult<GateReport> {
        let mut report = GateReport::default();

        for target in &self.targets {
            let summary = wait_for(
                &target.name,
                target.probe.as_ref(),
                self.timeout,
                self.interval,
                reporter,
            )
            .await?;
            report.ready.push((target.name.clone(), summary));
        }

        info!(targets = report.ready.len(), "All targets ready");
        Ok(report)
    }
}

/// Process exit code for the outcome of a gate run
pub fn exit_code(result: &GateResult<GateReport>) -> i32 {
    match result {
        Ok(_) => exit_codes::READY,
        Err(GateError::Timeout { .. }) => exit_codes::TIMED_OUT,
        Err(GateError::Configuration(_)) => exit_codes::CONFIGURATION,
    }
}
