//! Metric thresholds, display metadata and monitored devices.

use serde::{Deserialize, Serialize};

/// Warning/critical boundary pair for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    pub warning: f64,
    pub critical: f64,
}

impl MetricThreshold {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Which side of a boundary counts as a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// Alert when the value rises above the boundary (temperatures).
    #[default]
    Above,
    /// Alert when the value drops below the boundary (filter efficiency).
    Below,
}

impl MetricDirection {
    /// Guess the direction from the boundary ordering when no metadata says otherwise.
    pub fn infer(threshold: &MetricThreshold) -> Self {
        if threshold.critical < threshold.warning {
            MetricDirection::Below
        } else {
            MetricDirection::Above
        }
    }

    /// Whether `value` is past `bound` in this direction (strict comparison).
    pub fn breaches(self, value: f64, bound: f64) -> bool {
        match self {
            MetricDirection::Above => value > bound,
            MetricDirection::Below => value < bound,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricDirection::Above => "above",
            MetricDirection::Below => "below",
        }
    }
}

impl std::fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata and default thresholds for a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfig {
    pub key: String,
    pub name: String,
    pub unit: String,
    pub color: String,
    pub thresholds: MetricThreshold,
    /// Absent in stored panels; inferred from `thresholds` then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<MetricDirection>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl MetricConfig {
    /// Explicit direction, or the one implied by the metric's own boundaries.
    pub fn effective_direction(&self) -> MetricDirection {
        self.direction
            .unwrap_or_else(|| MetricDirection::infer(&self.thresholds))
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Ecu,
    Egr,
    HepaFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "online"),
            DeviceStatus::Offline => write!(f, "offline"),
            DeviceStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// A monitored unit the panel can select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: DeviceStatus,
}
