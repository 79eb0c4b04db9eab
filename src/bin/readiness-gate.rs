//! # Readiness Gate
//!
//! Container entrypoint helper: waits for the services named by `DATABASE_URL` and
//! `REDIS_URL`, then exits 0 so the next command in the entrypoint can start.
//! Exits 1 if a service never came up, 2 if the gate settings are unusable.

use std::process;

use readiness_gate::logging::init_logging;
use readiness_gate::{exit_code, Gate, GateConfig, GateError, GateReport, GateResult, Reporter};
use tracing::error;

async fn run_gate(reporter: &mut Reporter) -> GateResult<GateReport> {
    let config = GateConfig::from_env()?;
    let gate = Gate::from_config(&config)?;
    gate.run(reporter).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let mut reporter = Reporter::stdout();
    let result = run_gate(&mut reporter).await;

    match &result {
        Ok(_) => {}
        Err(e @ GateError::Timeout { .. }) => reporter.timed_out(e),
        Err(e @ GateError::Configuration(_)) => {
            error!(error = %e, "Readiness gate configuration rejected");
            eprintln!("{}", e);
        }
    }

    process::exit(exit_code(&result));
}
