use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide counters for the Probe Executor, exposed for the
/// orchestrator to log a summary after each tick.
#[derive(Clone, Default)]
pub struct ProbeMetrics {
    probes_total: Arc<AtomicU64>,
    probes_failed: Arc<AtomicU64>,
    last_latency_ms: Arc<AtomicU64>,
}

impl ProbeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_probe(&self, latency_ms: u64, failed: bool) {
        self.probes_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.probes_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.last_latency_ms.store(latency_ms, Ordering::Relaxed);
    }

    pub fn total_probes(&self) -> u64 {
        self.probes_total.load(Ordering::Relaxed)
    }

    pub fn failed_probes(&self) -> u64 {
        self.probes_failed.load(Ordering::Relaxed)
    }

    pub fn last_latency_ms(&self) -> u64 {
        self.last_latency_ms.load(Ordering::Relaxed)
    }
}
