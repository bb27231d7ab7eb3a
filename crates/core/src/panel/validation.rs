//! Structural checks on panel options.

use serde::Serialize;

use crate::metric::MetricDirection;

use super::{PanelOptions, REFRESH_INTERVAL_RANGE};

const PREDICTION_HORIZON_RANGE: std::ops::RangeInclusive<u32> = 15..=240;
const CHART_HEIGHT_RANGE: std::ops::RangeInclusive<u32> = 200..=800;
const CACHE_TTL_RANGE: std::ops::RangeInclusive<u64> = 10..=3600;

/// One problem found in a set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Option path, e.g. `refreshInterval` or `alertThresholds.hepaEfficiency`.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl PanelOptions {
    /// Check every constraint and collect all issues rather than stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(ValidationIssue::new("title", "must be a non-empty string"));
        }

        if !REFRESH_INTERVAL_RANGE.contains(&self.refresh_interval) {
            issues.push(ValidationIssue::new(
                "refreshInterval",
                format!(
                    "must be between {} and {} seconds (got {})",
                    REFRESH_INTERVAL_RANGE.start(),
                    REFRESH_INTERVAL_RANGE.end(),
                    self.refresh_interval
                ),
            ));
        }

        if self.selected_device.trim().is_empty() {
            issues.push(ValidationIssue::new("selectedDevice", "a device must be selected"));
        }

        if self.selected_metrics.is_empty() {
            issues.push(ValidationIssue::new(
                "selectedMetrics",
                "at least one metric must be selected",
            ));
        }
        for key in &self.selected_metrics {
            if self.metric(key).is_none() {
                issues.push(ValidationIssue::new(
                    "selectedMetrics",
                    format!("unknown metric '{}'", key),
                ));
            }
        }

        if !PREDICTION_HORIZON_RANGE.contains(&self.prediction_horizon) {
            issues.push(ValidationIssue::new(
                "predictionHorizon",
                format!(
                    "must be between {} and {} minutes",
                    PREDICTION_HORIZON_RANGE.start(),
                    PREDICTION_HORIZON_RANGE.end()
                ),
            ));
        }

        if !CHART_HEIGHT_RANGE.contains(&self.chart_height) {
            issues.push(ValidationIssue::new(
                "chartHeight",
                format!(
                    "must be between {} and {} px",
                    CHART_HEIGHT_RANGE.start(),
                    CHART_HEIGHT_RANGE.end()
                ),
            ));
        }

        for (key, t) in self.effective_thresholds() {
            let field = format!("alertThresholds.{}", key);
            if !t.warning.is_finite() || !t.critical.is_finite() {
                issues.push(ValidationIssue::new(field, "boundaries must be finite numbers"));
                continue;
            }
            let ordered = match self.direction_for(&key) {
                MetricDirection::Above => t.critical >= t.warning,
                MetricDirection::Below => t.critical <= t.warning,
            };
            if !ordered {
                issues.push(ValidationIssue::new(
                    field,
                    format!(
                        "critical {} is not past warning {} for direction '{}'",
                        t.critical,
                        t.warning,
                        self.direction_for(&key)
                    ),
                ));
            }
        }

        if let Some(cache) = self.advanced.cache_settings {
            if cache.enabled && !CACHE_TTL_RANGE.contains(&cache.ttl) {
                issues.push(ValidationIssue::new(
                    "advanced.cacheSettings.ttl",
                    format!(
                        "must be between {} and {} seconds",
                        CACHE_TTL_RANGE.start(),
                        CACHE_TTL_RANGE.end()
                    ),
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
