//! Anomalies, alerts and the caller-owned acknowledgement set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text description of an out-of-bound observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub description: String,
    pub metric: String,
    pub value: f64,
}

/// Structured, severity-tagged record of a threshold breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// `{metric}-{severity}-{timestamp_millis}`.
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub metric: String,
    pub value: f64,
    /// The boundary that was crossed.
    pub threshold: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
}

impl Alert {
    pub fn make_id(metric: &str, severity: AlertSeverity, timestamp: DateTime<Utc>) -> String {
        format!("{}-{}-{}", metric, severity, timestamp.timestamp_millis())
    }
}

/// Acknowledged alert ids. Owned by the display layer, never by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertAcknowledgements {
    ids: HashSet<String>,
}

impl AlertAcknowledgements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acknowledge(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn unacknowledge(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn is_acknowledged(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Set `acknowledged` on each alert whose id is in the set.
    pub fn apply(&self, alerts: &mut [Alert]) {
        for alert in alerts {
            alert.acknowledged = self.ids.contains(&alert.id);
        }
    }

    /// Forget ids that no longer appear in `alerts`.
    pub fn retain_active(&mut self, alerts: &[Alert]) {
        let live: HashSet<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        self.ids.retain(|id| live.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert(metric: &str, severity: AlertSeverity) -> Alert {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        Alert {
            id: Alert::make_id(metric, severity, ts),
            severity,
            message: String::new(),
            metric: metric.to_string(),
            value: 0.0,
            threshold: 0.0,
            timestamp: ts,
            acknowledged: false,
        }
    }

    #[test]
    fn id_format() {
        let a = alert("rightTempPV", AlertSeverity::Critical);
        assert_eq!(a.id, "rightTempPV-critical-1700000000123");
    }

    #[test]
    fn acknowledgements_apply_and_prune() {
        let mut alerts = vec![
            alert("rightTempPV", AlertSeverity::Warning),
            alert("hepaEfficiency", AlertSeverity::Critical),
        ];
        let mut acks = AlertAcknowledgements::new();
        acks.acknowledge(alerts[0].id.clone());
        acks.acknowledge("stale-warning-1");

        acks.apply(&mut alerts);
        assert!(alerts[0].acknowledged);
        assert!(!alerts[1].acknowledged);

        acks.retain_active(&alerts);
        assert_eq!(acks.len(), 1);
        assert!(!acks.is_acknowledged("stale-warning-1"));

        assert!(acks.unacknowledge(&alerts[0].id));
        assert!(!acks.unacknowledge(&alerts[0].id));
        acks.apply(&mut alerts);
        assert!(!alerts[0].acknowledged);
        assert!(acks.is_empty());
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(AlertSeverity::Critical > AlertSeverity::Warning);
        assert!(AlertSeverity::Warning > AlertSeverity::Info);
    }
}
