//! Per-stage wall-time metrics: a stage's entry
//! opens before `on_stage_start` and closes after the stage returns, and
//! the whole-pipeline metric brackets every stage. `on_metrics_complete`
//! receives the finished list; `Orchestrator::metrics()` exposes the same
//! list afterward for offline inspection (e.g. `--write-test-data`).

use std::collections::HashMap;
use std::time::Instant;

/// One completed timing, handed to `on_metrics_complete`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageMetric {
    pub name: String,
    pub duration_seconds: f64,
}

/// Tracks open/close timings for named spans. Not `Clone`: `Instant` spans
/// are only meaningful within one run.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    open: HashMap<String, Instant>,
    completed: Vec<StageMetric>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, name: &str) {
        self.open.insert(name.to_string(), Instant::now());
    }

    /// Closes a previously opened span, recording its duration. A no-op
    /// (with a zero-duration entry) if `name` was never started, which
    /// should not happen in practice but keeps this infallible.
    pub fn stop(&mut self, name: &str) {
        let duration = self
            .open
            .remove(name)
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.completed.push(StageMetric { name: name.to_string(), duration_seconds: duration });
    }

    pub fn completed(&self) -> &[StageMetric] {
        &self.completed
    }

    pub fn into_completed(self) -> Vec<StageMetric> {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_records_zero_duration() {
        let mut recorder = MetricsRecorder::new();
        recorder.stop("never_started");
        assert_eq!(recorder.completed()[0].duration_seconds, 0.0);
    }

    #[test]
    fn start_then_stop_records_a_nonnegative_duration() {
        let mut recorder = MetricsRecorder::new();
        recorder.start("locate_labels");
        recorder.stop("locate_labels");
        assert!(recorder.completed()[0].duration_seconds >= 0.0);
        assert_eq!(recorder.completed()[0].name, "locate_labels");
    }
}
