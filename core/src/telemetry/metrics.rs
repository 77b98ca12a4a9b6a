use std::sync::Mutex;

/// Counters shared by a processor and the transform backend it owns.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub plan_rebuilds: usize,
    pub errors: usize,
}

struct Metrics {
    processed: usize,
    plan_rebuilds: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                processed: 0,
                plan_rebuilds: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_processed(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += count;
        }
    }

    pub fn record_plan_rebuild(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.plan_rebuilds += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                processed: metrics.processed,
                plan_rebuilds: metrics.plan_rebuilds,
                errors: metrics.errors,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
