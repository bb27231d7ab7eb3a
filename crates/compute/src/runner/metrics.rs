use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Runner operational counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunnerMetrics {
    pub cycles_started: u64,
    pub cycles_completed: u64,
    /// Cycles aborted because the next tick arrived first.
    pub cycles_superseded: u64,
    /// Completed cycles that ran on synthetic fallback data.
    pub fallbacks: u64,
    pub warnings: u64,
    pub last_duration: Option<Duration>,
    pub avg_duration: Duration,
    pub last_completed: Option<DateTime<Utc>>,
}

impl RunnerMetrics {
    pub fn record_start(&mut self) {
        self.cycles_started += 1;
    }

    pub fn record_superseded(&mut self) {
        self.cycles_superseded += 1;
    }

    /// Record a finished cycle.
    pub fn record_completion(&mut self, duration: Duration, used_fallback: bool, warnings: usize) {
        self.cycles_completed += 1;
        if used_fallback {
            self.fallbacks += 1;
        }
        self.warnings += warnings as u64;
        self.last_duration = Some(duration);
        self.last_completed = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.cycles_completed;
        self.avg_duration = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    /// Cycles started but neither completed nor superseded.
    pub fn in_flight(&self) -> u64 {
        self.cycles_started
            .saturating_sub(self.cycles_completed)
            .saturating_sub(self.cycles_superseded)
    }
}
