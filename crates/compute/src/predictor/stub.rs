use async_trait::async_trait;

use super::{PredictError, Prediction, PredictionContext, Predictor};

const PREDICTIONS: [&str; 3] = [
    "Temperature trend for the next hour: stable",
    "System efficiency forecast: good",
    "Suggested maintenance window: in 72 hours",
];

const RECOMMENDATIONS: [&str; 3] = [
    "Check the right-side control temperature loop",
    "Consider cleaning or replacing the HEPA filter",
    "Monitor EGR cooler performance",
];

pub const STUB_CONFIDENCE: f64 = 0.85;

/// Fixed placeholder output. Performs no computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPredictor;

impl StubPredictor {
    pub fn prediction() -> Prediction {
        Prediction {
            predictions: PREDICTIONS.iter().map(|s| s.to_string()).collect(),
            recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
            confidence: STUB_CONFIDENCE,
        }
    }
}

#[async_trait]
impl Predictor for StubPredictor {
    fn name(&self) -> &str {
        "stub"
    }

    async fn predict(&self, _ctx: &PredictionContext<'_>) -> Result<Prediction, PredictError> {
        Ok(Self::prediction())
    }
}
