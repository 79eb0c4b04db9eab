//! # Liveness Probes
//!
//! A probe performs exactly one bounded liveness check against a target and reports
//! a [`ProbeOutcome`]. Probes are called repeatedly by the poller and must be safe to
//! call again after any outcome.
//!
//! - [`PostgresProbe`]: connects and runs `SELECT 1`
//! - [`RedisProbe`]: connects and sends `PING`
//! - [`FnProbe`]: wraps an async closure

pub mod postgres;
pub mod redis;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::ProbeError;

pub use self::postgres::PostgresProbe;
pub use self::redis::{RedisAddress, RedisProbe};

/// Result of one probe attempt
#[derive(Debug)]
pub enum ProbeOutcome {
    /// Target answered and is ready
    Ready,
    /// Target answered but is not ready yet
    NotReady,
    /// Attempt failed; retried the same as `NotReady`
    Errored(ProbeError),
}

impl ProbeOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProbeOutcome::Ready)
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            ProbeOutcome::Errored(e) => Some(e),
            _ => None,
        }
    }
}

/// Maps a client-style "ready flag or error" result
impl From<Result<bool, ProbeError>> for ProbeOutcome {
    fn from(result: Result<bool, ProbeError>) -> Self {
        match result {
            Ok(true) => ProbeOutcome::Ready,
            Ok(false) => ProbeOutcome::NotReady,
            Err(e) => ProbeOutcome::Errored(e),
        }
    }
}

/// A single liveness check against one target
#[async_trait]
pub trait Probe: Send + Sync {
    /// Attempt exactly one check
    async fn probe(&self) -> ProbeOutcome;

    /// Short identifier used in diagnostics
    fn kind(&self) -> &'static str;
}

/// Run a probe future with its own bound
pub(crate) async fn bounded<F>(limit: Duration, check: F) -> ProbeOutcome
where
    F: Future<Output = Result<bool, ProbeError>>,
{
    match tokio::time::timeout(limit, check).await {
        Ok(result) => result.into(),
        Err(_) => ProbeOutcome::Errored(ProbeError::ProbeTimedOut(limit)),
    }
}

/// Mask the password in a connection URL for logging
pub(crate) fn redact_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        let credentials_start = url.find("://").map(|p| p + 3).unwrap_or(0);
        if credentials_start <= at_pos {
            if let Some(colon_pos) = url[credentials_start..at_pos].find(':') {
                let colon_pos = credentials_start + colon_pos;
                return format!("{}***{}", &url[..=colon_pos], &url[at_pos..]);
            }
        }
    }
    url.to_string()
}

/// Probe backed by an async closure
pub struct FnProbe<F> {
    check: F,
}

impl<F> FnProbe<F>
where
    F: Fn() -> BoxFuture<'static, ProbeOutcome> + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> std::fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProbe").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Probe for FnProbe<F>
where
    F: Fn() -> BoxFuture<'static, ProbeOutcome> + Send + Sync,
{
    async fn probe(&self) -> ProbeOutcome {
        (self.check)().await
    }

    fn kind(&self) -> &'static str {
        "fn"
    }
}
