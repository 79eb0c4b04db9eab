//! Shared helpers for integration tests: scripted probes and an event log that
//! records the order in which targets are probed.

#![allow(dead_code)]

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use readiness_gate::{FnProbe, Probe, ProbeError, ProbeOutcome, Target};

/// Ordered record of `(target, attempt)` probe calls across targets
#[derive(Debug, Clone, Default)]
pub struct ProbeLog(Arc<Mutex<Vec<(String, u32)>>>);

impl ProbeLog {
    pub fn entries(&self) -> Vec<(String, u32)> {
        self.0.lock().clone()
    }

    pub fn count_for(&self, name: &str) -> usize {
        self.0.lock().iter().filter(|(n, _)| n == name).count()
    }

    fn record(&self, name: &str) -> u32 {
        let mut entries = self.0.lock();
        let attempt = entries.iter().filter(|(n, _)| n == name).count() as u32 + 1;
        entries.push((name.to_string(), attempt));
        attempt
    }
}

/// Probe that reports ready on its `k`-th invocation and never before
pub fn ready_on_attempt(name: &str, k: u32, log: &ProbeLog) -> Target {
    scripted(name, log, move |attempt| {
        if attempt >= k {
            ProbeOutcome::Ready
        } else {
            ProbeOutcome::NotReady
        }
    })
}

/// Probe that never reports ready, failing with connection errors
pub fn never_ready(name: &str, log: &ProbeLog) -> Target {
    scripted(name, log, |_| {
        ProbeOutcome::Errored(ProbeError::InvalidUrl("connection refused".to_string()))
    })
}

/// Probe whose outcome is computed from the 1-based attempt number
pub fn scripted<F>(name: &str, log: &ProbeLog, outcome: F) -> Target
where
    F: Fn(u32) -> ProbeOutcome + Send + Sync + 'static,
{
    let log = log.clone();
    let probe_name = name.to_string();
    let outcome = Arc::new(outcome);
    let probe: Box<dyn Probe> = Box::new(FnProbe::new(move || {
        let attempt = log.record(&probe_name);
        let result = outcome(attempt);
        async move { result }.boxed()
    }));
    Target::new(name, probe)
}
