//! # Structured Logging Module
//!
//! Diagnostic logging for the gate. Everything goes to stderr so that stdout carries
//! only the fixed-form progress line consumed by entrypoint scripts.

use std::io;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::env_vars;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Initialize logging once per process
///
/// Honors `RUST_LOG` (default `warn`) and `GATE_LOG_FORMAT`. Safe to call more than
/// once; an already-installed global subscriber is left alone.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let format = LogFormat::parse(std::env::var(env_vars::LOG_FORMAT).ok().as_deref());
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let layer = match format {
            LogFormat::Json => fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .json()
                .with_filter(filter)
                .boxed(),
            LogFormat::Text => fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_filter(filter)
                .boxed(),
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }
    });
}
