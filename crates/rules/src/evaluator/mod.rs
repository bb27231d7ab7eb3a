//! Per-reading threshold evaluator.
//!
//! Classifies each configured metric of the latest reading into a [`Zone`]
//! and turns every non-normal zone into one anomaly and one alert. The
//! evaluator is a pure function of (reading, thresholds, metric metadata,
//! stamp): it holds no state between calls.

mod zone;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use ecu_core::{
    Alert, Anomaly, MetricConfig, MetricDirection, MetricThreshold, PanelOptions, Reading,
};

use crate::health::health_score;

pub use zone::Zone;

/// Anomalies and alerts derived from one reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub anomalies: Vec<Anomaly>,
    pub alerts: Vec<Alert>,
}

impl Evaluation {
    pub fn is_clear(&self) -> bool {
        self.anomalies.is_empty() && self.alerts.is_empty()
    }

    pub fn health_score(&self) -> u8 {
        health_score(self.anomalies.len(), self.alerts.len())
    }
}

/// Evaluates a reading against per-metric thresholds.
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    /// Evaluate using the effective thresholds and metric metadata of `options`.
    pub fn evaluate(reading: &Reading, options: &PanelOptions, stamp: DateTime<Utc>) -> Evaluation {
        Self::evaluate_with(
            reading,
            &options.effective_thresholds(),
            &options.metrics_config,
            stamp,
        )
    }

    /// Evaluate `reading` against `thresholds`, in the map's insertion order.
    ///
    /// A metric is skipped (no anomaly, no alert) when it is missing from the
    /// reading, its value is not finite, or its metadata marks it disabled.
    /// Metrics without metadata use their key as display name and an inferred
    /// direction.
    pub fn evaluate_with(
        reading: &Reading,
        thresholds: &IndexMap<String, MetricThreshold>,
        metrics: &[MetricConfig],
        stamp: DateTime<Utc>,
    ) -> Evaluation {
        let mut out = Evaluation::default();

        for (key, threshold) in thresholds {
            let meta = metrics.iter().find(|m| &m.key == key);
            if meta.is_some_and(|m| !m.enabled) {
                continue;
            }

            let value = match reading.finite(key) {
                Some(v) => v,
                None => {
                    if reading.values.contains_key(key) {
                        debug!(metric = %key, "skipping non-finite value");
                    }
                    continue;
                }
            };

            let direction = meta
                .map(|m| m.effective_direction())
                .unwrap_or_else(|| MetricDirection::infer(threshold));

            let zone = Zone::classify(value, threshold, direction);
            let (severity, bound) = match (zone.severity(), zone.bound(threshold)) {
                (Some(s), Some(b)) => (s, b),
                _ => continue,
            };

            let name = meta.map(|m| m.name.as_str()).unwrap_or(key.as_str());
            let unit = meta.map(|m| m.unit.as_str()).unwrap_or("");

            out.anomalies.push(Anomaly {
                description: format!(
                    "{}: {:.2}{} ({} {} {:.2})",
                    name, value, unit, direction, severity, bound
                ),
                metric: key.clone(),
                value,
            });

            out.alerts.push(Alert {
                id: Alert::make_id(key, severity, stamp),
                severity,
                message: format!(
                    "{} {}: {:.2}{} is {} {:.2}",
                    name, severity, value, unit, direction, bound
                ),
                metric: key.clone(),
                value,
                threshold: bound,
                timestamp: stamp,
                acknowledged: false,
            });
        }

        out
    }
}
