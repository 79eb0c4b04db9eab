#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Readiness Gate
//!
//! Blocks a container or CI job until its backing services answer a liveness probe.
//!
//! ## Overview
//!
//! The gate reads `DATABASE_URL` and `REDIS_URL` once at startup. For each one that is
//! set, it polls the service on a fixed tick until it responds or the per-target
//! budget runs out:
//!
//! ```text
//! Waiting for PostgreSQL to become available... done
//! Waiting for Redis to become available...... done
//! ```
//!
//! Exit code 0 means every enabled service is reachable; 1 means one timed out;
//! 2 means the gate settings were rejected (see [`gate::exit_code`]).
//!
//! ## Module Organization
//!
//! - [`poller`] - Bounded-retry tick loop for one target
//! - [`probe`] - Liveness probes for PostgreSQL and Redis
//! - [`gate`] - Sequential run over the enabled targets
//! - [`config`] - Startup configuration from the environment
//! - [`reporter`] - Fixed-form progress output
//! - [`error`] - Error types
//! - [`logging`] - Diagnostic logging on stderr
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use readiness_gate::{Gate, GateConfig, Reporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GateConfig::new().with_database_url("postgres://app@db/app");
//! let gate = Gate::from_config(&config)?;
//! gate.run(&mut Reporter::stdout()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod logging;
pub mod poller;
pub mod probe;
pub mod reporter;

pub use config::GateConfig;
pub use error::{ConfigurationError, GateError, GateResult, ProbeError};
pub use gate::{exit_code, Gate, GateReport, Target};
pub use poller::{wait_for, PollSummary};
pub use probe::{FnProbe, PostgresProbe, Probe, ProbeOutcome, RedisProbe};
pub use reporter::Reporter;
