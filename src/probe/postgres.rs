//! PostgreSQL liveness probe
//!
//! Opens a fresh connection per attempt, runs `SELECT 1` and closes it again. No pool
//! is kept between attempts so a server that restarts mid-wait is picked up cleanly.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Connection, PgConnection, Row};
use tracing::debug;

use super::{bounded, redact_url, Probe, ProbeOutcome};
use crate::error::ProbeError;

pub struct PostgresProbe {
    database_url: String,
    probe_timeout: Duration,
}

impl std::fmt::Debug for PostgresProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresProbe")
            .field("database_url", &redact_url(&self.database_url))
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

impl PostgresProbe {
    pub fn new<S: Into<String>>(database_url: S, probe_timeout: Duration) -> Self {
        Self {
            database_url: database_url.into(),
            probe_timeout,
        }
    }

    async fn ping(&self) -> Result<bool, ProbeError> {
        let mut conn = PgConnection::connect(&self.database_url).await?;

        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&mut conn)
            .await;

        // Close regardless of query outcome
        let close = conn.close().await;

        finish_check(row, close)
    }
}

/// Fold the query and close results into one answer
///
/// A failed close is logged even when the query itself already failed.
fn finish_check(
    row: Result<PgRow, sqlx::Error>,
    close: Result<(), sqlx::Error>,
) -> Result<bool, ProbeError> {
    if let Err(e) = close {
        debug!(error = %e, "PostgreSQL probe connection did not close cleanly");
    }

    let health: i32 = row?.try_get("health")?;
    Ok(health == 1)
}

#[async_trait]
impl Probe for PostgresProbe {
    async fn probe(&self) -> ProbeOutcome {
        bounded(self.probe_timeout, self.ping()).await
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
