//! Output of one analysis pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, Anomaly};

/// Everything the display layer needs from one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub predictions: Vec<String>,
    pub anomalies: Vec<Anomaly>,
    pub recommendations: Vec<String>,
    /// 0–100.
    pub health_score: u8,
    pub alerts: Vec<Alert>,
    /// 0.0–1.0.
    pub confidence: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub analysis_time: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }
}

/// Display banding for the health score. Fixed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthBand {
    Good,
    Attention,
    NeedsAttention,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            HealthBand::Good
        } else if score >= 60 {
            HealthBand::Attention
        } else {
            HealthBand::NeedsAttention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthBand::Good => "good",
            HealthBand::Attention => "attention",
            HealthBand::NeedsAttention => "needs attention",
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(HealthBand::from_score(100), HealthBand::Good);
        assert_eq!(HealthBand::from_score(80), HealthBand::Good);
        assert_eq!(HealthBand::from_score(79), HealthBand::Attention);
        assert_eq!(HealthBand::from_score(60), HealthBand::Attention);
        assert_eq!(HealthBand::from_score(59), HealthBand::NeedsAttention);
        assert_eq!(HealthBand::from_score(0), HealthBand::NeedsAttention);
    }

    #[test]
    fn band_serializes_camel_case() {
        let json = serde_json::to_string(&HealthBand::NeedsAttention).unwrap();
        assert_eq!(json, "\"needsAttention\"");
    }
}
