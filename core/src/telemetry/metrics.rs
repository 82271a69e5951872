use crate::measurement::cable::EstimationMethod;
use serde::Serialize;
use std::sync::Mutex;

/// Counts analysis outcomes across runs.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub analyzed: usize,
    pub resonance_estimates: usize,
    pub phase_fallbacks: usize,
    pub failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_analyzed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.analyzed += 1;
        }
    }

    pub fn record_estimate(&self, method: EstimationMethod) {
        if let Ok(mut metrics) = self.inner.lock() {
            match method {
                EstimationMethod::ResonanceSpacing => metrics.resonance_estimates += 1,
                EstimationMethod::PhaseSlope => metrics.phase_fallbacks += 1,
            }
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_outcomes() {
        let recorder = MetricsRecorder::new();
        recorder.record_analyzed();
        recorder.record_analyzed();
        recorder.record_estimate(EstimationMethod::ResonanceSpacing);
        recorder.record_estimate(EstimationMethod::PhaseSlope);
        recorder.record_failure();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.analyzed, 2);
        assert_eq!(snapshot.resonance_estimates, 1);
        assert_eq!(snapshot.phase_fallbacks, 1);
        assert_eq!(snapshot.failures, 1);
    }
}
