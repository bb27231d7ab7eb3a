//! Panel options: the immutable configuration value handed to the engine.
//!
//! Options are never mutated in place. Every `with_*` method takes `&self`
//! and returns a new value, so a running engine keeps the snapshot it was
//! built with until the caller swaps in a new one.

mod advanced;
mod defaults;
mod migration;
mod validation;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EcuError, Result};
use crate::metric::{DeviceConfig, MetricConfig, MetricDirection, MetricThreshold};

pub use self::advanced::{AdvancedSettings, CacheSettings, CustomEndpoints};
pub use self::migration::{deep_merge, migrate, CURRENT_VERSION};
pub use self::validation::ValidationIssue;

/// Allowed refresh interval range in seconds.
pub const REFRESH_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 5..=300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    pub version: String,

    // ── Basic ──
    pub title: String,
    /// Seconds between evaluation cycles.
    pub refresh_interval: u64,
    pub show_legend: bool,
    pub show_grid: bool,

    // ── Device ──
    pub selected_device: String,
    pub available_devices: Vec<DeviceConfig>,

    // ── Metrics ──
    pub selected_metrics: Vec<String>,
    pub metrics_config: Vec<MetricConfig>,

    // ── AI ──
    pub enable_ai: bool,
    pub ai_endpoint: String,
    /// Minutes.
    pub prediction_horizon: u32,

    // ── Display ──
    pub chart_height: u32,
    pub show_prediction: bool,
    pub show_health_status: bool,
    pub show_alerts: bool,

    // ── Alerting ──
    pub alert_thresholds: IndexMap<String, MetricThreshold>,

    // ── Colors ──
    pub color_scheme: ColorScheme,
    pub colors: IndexMap<String, String>,

    pub advanced: AdvancedSettings,
}

impl PanelOptions {
    /// Parse options from TOML and validate them.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let options: Self = toml::from_str(toml_str)?;
        options.validate().map_err(EcuError::Validation)?;
        Ok(options)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Load options by extension: `.json` files are treated as stored panel
    /// options and migrated, anything else is parsed as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Self::from_file(path);
        }
        let content = std::fs::read_to_string(path)?;
        let stored: serde_json::Value = serde_json::from_str(&content)?;
        let options = migrate(stored)?;
        options.validate().map_err(EcuError::Validation)?;
        Ok(options)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EcuError::Other(e.to_string()))
    }

    // ── Lookups ──────────────────────────────────────────────

    pub fn metric(&self, key: &str) -> Option<&MetricConfig> {
        self.metrics_config.iter().find(|m| m.key == key)
    }

    pub fn device(&self, id: &str) -> Option<&DeviceConfig> {
        self.available_devices.iter().find(|d| d.id == id)
    }

    /// Effective threshold: `alert_thresholds` wins, metric config is the fallback.
    pub fn threshold_for(&self, key: &str) -> Option<MetricThreshold> {
        self.alert_thresholds
            .get(key)
            .copied()
            .or_else(|| self.metric(key).map(|m| m.thresholds))
    }

    /// Breach direction from the metric config, or inferred from the boundaries.
    pub fn direction_for(&self, key: &str) -> MetricDirection {
        match self.metric(key) {
            Some(m) => m.effective_direction(),
            None => self
                .threshold_for(key)
                .map(|t| MetricDirection::infer(&t))
                .unwrap_or_default(),
        }
    }

    /// All effective thresholds in evaluation order: `alert_thresholds` keys first,
    /// then metrics that only carry thresholds in their config.
    pub fn effective_thresholds(&self) -> IndexMap<String, MetricThreshold> {
        let mut out = self.alert_thresholds.clone();
        for m in &self.metrics_config {
            out.entry(m.key.clone()).or_insert(m.thresholds);
        }
        out
    }

    /// Refresh interval clamped into the allowed range.
    pub fn refresh_period(&self) -> Duration {
        let secs = self
            .refresh_interval
            .clamp(*REFRESH_INTERVAL_RANGE.start(), *REFRESH_INTERVAL_RANGE.end());
        Duration::from_secs(secs)
    }

    /// AI endpoint, honouring the advanced override.
    pub fn effective_ai_endpoint(&self) -> &str {
        self.advanced
            .custom_endpoints
            .as_ref()
            .and_then(|e| e.ai.as_deref())
            .unwrap_or(&self.ai_endpoint)
    }

    pub fn debug_mode(&self) -> bool {
        self.advanced.debug()
    }

    // ── Functional updates ───────────────────────────────────

    pub fn with_device(&self, device_id: impl Into<String>) -> Self {
        Self {
            selected_device: device_id.into(),
            ..self.clone()
        }
    }

    /// Add the metric to the selection if absent, remove it if present.
    pub fn toggle_metric(&self, key: &str) -> Self {
        let mut selected = self.selected_metrics.clone();
        if let Some(pos) = selected.iter().position(|m| m == key) {
            selected.remove(pos);
        } else {
            selected.push(key.to_string());
        }
        Self {
            selected_metrics: selected,
            ..self.clone()
        }
    }

    pub fn with_threshold(&self, key: impl Into<String>, threshold: MetricThreshold) -> Self {
        let mut thresholds = self.alert_thresholds.clone();
        thresholds.insert(key.into(), threshold);
        Self {
            alert_thresholds: thresholds,
            ..self.clone()
        }
    }

    pub fn with_direction(&self, key: &str, direction: MetricDirection) -> Self {
        let metrics = self
            .metrics_config
            .iter()
            .map(|m| {
                if m.key == key {
                    MetricConfig {
                        direction: Some(direction),
                        ..m.clone()
                    }
                } else {
                    m.clone()
                }
            })
            .collect();
        Self {
            metrics_config: metrics,
            ..self.clone()
        }
    }

    pub fn with_refresh_interval(&self, secs: u64) -> Self {
        Self {
            refresh_interval: secs,
            ..self.clone()
        }
    }

    pub fn with_ai(&self, enabled: bool) -> Self {
        Self {
            enable_ai: enabled,
            ..self.clone()
        }
    }

    pub fn with_advanced(&self, advanced: AdvancedSettings) -> Self {
        Self {
            advanced,
            ..self.clone()
        }
    }
}
