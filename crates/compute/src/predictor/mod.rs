//! Prediction and recommendation strategies.
//!
//! The evaluator never depends on a predictor. The engine asks the
//! configured [`Predictor`] for forward-looking text after thresholds have
//! been evaluated, so a real model can replace [`StubPredictor`] without
//! touching evaluation.

mod http;
mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ecu_core::{Anomaly, Reading};

pub use self::http::HttpPredictor;
pub use self::stub::StubPredictor;

/// Forward-looking output attached to an analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub predictions: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

impl Prediction {
    /// Empty prediction used when AI is disabled.
    pub fn none() -> Self {
        Self::default()
    }
}

/// What a predictor gets to look at.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionContext<'a> {
    pub device_id: &'a str,
    pub reading: &'a Reading,
    pub anomalies: &'a [Anomaly],
    pub health_score: u8,
    /// Minutes.
    pub horizon: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("failed to decode prediction: {0}")]
    Decode(String),
    #[error("invalid predictor URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Pluggable prediction strategy.
#[async_trait]
pub trait Predictor: Send + Sync {
    fn name(&self) -> &str;

    async fn predict(&self, ctx: &PredictionContext<'_>) -> Result<Prediction, PredictError>;
}
