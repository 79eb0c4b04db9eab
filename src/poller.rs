//! # Readiness Poller
//!
//! Bounded-retry loop for one target. The loop is tick-driven: the first probe runs
//! one full interval after the session starts, and then once per interval until the
//! probe reports ready or the deadline passes.
//!
//! ```text
//! POLLING ──ready──▶ READY
//!    │
//!    └──deadline──▶ TIMED_OUT
//! ```
//!
//! Probe errors never end a session. They are logged at `debug` and counted as a
//! "not ready yet" tick. The deadline is raced against in-flight probes, so a hung
//! connection attempt cannot hold the gate past its budget.

use std::time::Duration;

use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::check_duration;
use crate::error::{GateError, GateResult};
use crate::probe::{Probe, ProbeOutcome};
use crate::reporter::Reporter;

/// What a successful poll session looked like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Probe invocations, including the successful one
    pub attempts: u32,
    /// Time from session start to the successful probe
    pub elapsed: Duration,
}

/// Wait until `probe` reports ready or `timeout` elapses
///
/// Prints the waiting notice, one `.` per unsuccessful tick and ` done` on success.
/// On timeout nothing further is printed; the caller reports the returned
/// [`GateError::Timeout`]. A zero or oversized `timeout` or `interval` is refused
/// with [`GateError::Configuration`] before anything is printed.
pub async fn wait_for<P>(
    name: &str,
    probe: &P,
    timeout: Duration,
    interval: Duration,
    reporter: &mut Reporter,
) -> GateResult<PollSummary>
where
    P: Probe + ?Sized,
{
    check_duration("timeout", timeout)?;
    check_duration("interval", interval)?;

    info!(
        target_name = %name,
        probe = probe.kind(),
        timeout = ?timeout,
        interval = ?interval,
        "Waiting for target"
    );
    reporter.waiting(name);

    let started = Instant::now();
    let deadline = sleep_until(started + timeout);
    tokio::pin!(deadline);

    let mut ticker = interval_at(started + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut deadline => break,

            _ = ticker.tick() => {
                attempts += 1;

                let outcome = tokio::select! {
                    biased;
                    _ = &mut deadline => break,
                    outcome = probe.probe() => outcome,
                };

                match outcome {
                    ProbeOutcome::Ready => {
                        reporter.done();
                        let summary = PollSummary {
                            attempts,
                            elapsed: started.elapsed(),
                        };
                        info!(
                            target_name = %name,
                            attempts = summary.attempts,
                            elapsed_ms = summary.elapsed.as_millis() as u64,
                            "Target is ready"
                        );
                        return Ok(summary);
                    }
                    ProbeOutcome::NotReady => {
                        debug!(target_name = %name, attempt = attempts, "Target not ready yet");
                        reporter.tick();
                    }
                    ProbeOutcome::Errored(e) => {
                        debug!(
                            target_name = %name,
                            attempt = attempts,
                            error = %e,
                            "Probe failed, will retry"
                        );
                        reporter.tick();
                    }
                }
            }
        }
    }

    warn!(
        target_name = %name,
        attempts = attempts,
        timeout = ?timeout,
        "Timed out waiting for target"
    );
    Err(GateError::Timeout {
        target: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_DURATION;
    use crate::error::ProbeError;
    use crate::probe::FnProbe;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const INTERVAL: Duration = Duration::from_millis(500);
    const TIMEOUT: Duration = Duration::from_secs(300);

    fn ready_on(k: u32, calls: Arc<AtomicU32>) -> impl Probe {
        FnProbe::new(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n >= k {
                    ProbeOutcome::Ready
                } else {
                    ProbeOutcome::NotReady
                }
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_tick() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = ready_on(1, calls.clone());
        let (mut reporter, buffer) = Reporter::buffered();

        let summary = wait_for("Redis", &probe, TIMEOUT, INTERVAL, &mut reporter)
            .await
            .unwrap();

        assert_eq!(summary.attempts, 1);
        assert_eq!(summary.elapsed, INTERVAL);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            buffer.contents(),
            "Waiting for Redis to become available... done\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_probe_waits_one_interval() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = ready_on(1, calls.clone());
        let (mut reporter, _buffer) = Reporter::buffered();

        let session = wait_for("Redis", &probe, TIMEOUT, INTERVAL, &mut reporter);
        tokio::pin!(session);

        // Nothing may be probed before the first tick
        assert!(tokio::time::timeout(Duration::from_millis(499), &mut session)
            .await
            .is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        session.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_third_tick_prints_two_markers() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = ready_on(3, calls.clone());
        let (mut reporter, buffer) = Reporter::buffered();

        let summary = wait_for("Redis", &probe, TIMEOUT, INTERVAL, &mut reporter)
            .await
            .unwrap();

        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.elapsed, INTERVAL * 3);
        assert_eq!(
            buffer.contents(),
            "Waiting for Redis to become available..... done\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_ready_times_out_at_deadline() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = ready_on(u32::MAX, calls.clone());
        let (mut reporter, buffer) = Reporter::buffered();
        let timeout = Duration::from_millis(2_200);

        let started = Instant::now();
        let err = wait_for("PostgreSQL", &probe, timeout, INTERVAL, &mut reporter)
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, GateError::Timeout { ref target } if target == "PostgreSQL"));
        assert!(elapsed >= timeout);
        assert!(elapsed <= timeout + INTERVAL);

        // Ticks at 0.5s, 1.0s, 1.5s, 2.0s
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            buffer.contents(),
            "Waiting for PostgreSQL to become available......."
        );

        // No probing after the session ended
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_swallowed_and_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let probe = FnProbe::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                match n {
                    1 => ProbeOutcome::Errored(ProbeError::InvalidUrl("bad".into())),
                    2 => ProbeOutcome::Errored(ProbeError::ProbeTimedOut(Duration::from_secs(1))),
                    _ => ProbeOutcome::Ready,
                }
            }
            .boxed()
        });
        let (mut reporter, buffer) = Reporter::buffered();

        let summary = wait_for("Redis", &probe, TIMEOUT, INTERVAL, &mut reporter)
            .await
            .unwrap();

        assert_eq!(summary.attempts, 3);
        assert_eq!(
            buffer.contents(),
            "Waiting for Redis to become available..... done\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_probe_is_abandoned_at_deadline() {
        let probe = FnProbe::new(|| {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                ProbeOutcome::Ready
            }
            .boxed()
        });
        let (mut reporter, _buffer) = Reporter::buffered();
        let timeout = Duration::from_secs(2);

        let started = Instant::now();
        let err = wait_for("PostgreSQL", &probe, timeout, INTERVAL, &mut reporter)
            .await
            .unwrap_err();

        assert_eq!(err.timed_out_target(), Some("PostgreSQL"));
        assert_eq!(started.elapsed(), timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_probe_does_not_burst_missed_ticks() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let probe = FnProbe::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    // Runs from 0.5s to 1.7s, across the 1.0s and 1.5s ticks
                    tokio::time::sleep(Duration::from_millis(1_200)).await;
                }
                ProbeOutcome::NotReady
            }
            .boxed()
        });
        let (mut reporter, buffer) = Reporter::buffered();

        let err = wait_for(
            "Redis",
            &probe,
            Duration::from_millis(1_900),
            INTERVAL,
            &mut reporter,
        )
        .await
        .unwrap_err();

        assert_eq!(err.timed_out_target(), Some("Redis"));
        // One late tick at 1.7s, then the next aligned tick would be 2.0s
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            buffer.contents(),
            "Waiting for Redis to become available....."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_refused_without_output() {
        let calls = Arc::new(AtomicU32::new(0));
        let check = ready_on(1, calls.clone());
        let (mut reporter, buffer) = Reporter::buffered();

        let err = wait_for("Redis", &check, TIMEOUT, Duration::ZERO, &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Configuration(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(buffer.contents(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_timeout_is_refused() {
        let calls = Arc::new(AtomicU32::new(0));
        let check = ready_on(1, calls.clone());
        let (mut reporter, _buffer) = Reporter::buffered();

        let err = wait_for(
            "Redis",
            &check,
            Duration::from_secs(u64::MAX),
            INTERVAL,
            &mut reporter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GateError::Configuration(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_longest_accepted_timeout_still_polls() {
        let calls = Arc::new(AtomicU32::new(0));
        let check = ready_on(1, calls.clone());
        let (mut reporter, _buffer) = Reporter::buffered();

        let summary = wait_for("Redis", &check, MAX_DURATION, INTERVAL, &mut reporter)
            .await
            .unwrap();

        assert_eq!(summary.attempts, 1);
        assert_eq!(summary.elapsed, INTERVAL);
    }
}
