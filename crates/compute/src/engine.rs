//! The telemetry analysis engine: one evaluation cycle end to end.
//!
//! A cycle fetches readings for the selected device, falls back to synthetic
//! data when the source fails or returns nothing, evaluates the newest
//! reading against the effective thresholds, scores it and attaches
//! predictions. Nothing in a cycle is fatal: problems come back as
//! [`EngineWarning`]s next to a fully populated result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use ecu_core::{AnalysisResult, PanelOptions, Reading, ReadingWindow};
use ecu_rules::{EvaluationClock, ThresholdEvaluator};

use crate::predictor::{Prediction, PredictionContext, Predictor, StubPredictor};
use crate::source::{DataSource, ReadingQuery, SyntheticSource};

pub const DEFAULT_WINDOW_SIZE: usize = 60;

/// Non-fatal problems encountered during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineWarning {
    #[error("data source '{source_name}' failed: {error}; using synthetic data")]
    DataSourceFailed { source_name: String, error: String },
    #[error("data source '{source_name}' returned no readings; using synthetic data")]
    EmptyData { source_name: String },
    #[error("predictor '{predictor}' failed: {error}; using stub predictions")]
    PredictorFailed { predictor: String, error: String },
}

/// Everything one cycle produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleOutput {
    /// Display history, oldest first.
    pub readings: Vec<Reading>,
    pub result: Option<AnalysisResult>,
    pub warnings: Vec<EngineWarning>,
    pub used_fallback: bool,
}

/// Immutable-options analysis engine.
///
/// Cloning is cheap; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct TelemetryAnalysisEngine {
    options: Arc<PanelOptions>,
    source: Arc<dyn DataSource>,
    fallback: Arc<SyntheticSource>,
    predictor: Arc<dyn Predictor>,
    clock: Arc<EvaluationClock>,
    window_size: usize,
}

impl TelemetryAnalysisEngine {
    pub fn new(
        options: Arc<PanelOptions>,
        source: Arc<dyn DataSource>,
        predictor: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            options,
            source,
            fallback: Arc::new(SyntheticSource::from_entropy()),
            predictor,
            clock: Arc::new(EvaluationClock::new()),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Same collaborators, new options. The evaluation clock is shared so
    /// alert ids stay unique across the swap.
    pub fn with_options(&self, options: Arc<PanelOptions>) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_fallback(mut self, fallback: SyntheticSource) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    pub fn options(&self) -> &Arc<PanelOptions> {
        &self.options
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Evaluate the newest of `readings`. `None` for an empty sequence.
    ///
    /// Predictor failures are logged and replaced by stub output; use
    /// [`run_cycle`](Self::run_cycle) to receive them as warnings.
    pub async fn analyze(
        &self,
        readings: &[Reading],
        stamp: DateTime<Utc>,
    ) -> Option<AnalysisResult> {
        let mut warnings = Vec::new();
        self.analyze_collecting(readings, stamp, &mut warnings).await
    }

    async fn analyze_collecting(
        &self,
        readings: &[Reading],
        stamp: DateTime<Utc>,
        warnings: &mut Vec<EngineWarning>,
    ) -> Option<AnalysisResult> {
        let latest = readings.iter().max_by_key(|r| r.timestamp)?;

        let evaluation = ThresholdEvaluator::evaluate(latest, &self.options, stamp);
        let health_score = evaluation.health_score();

        let prediction = if self.options.enable_ai {
            let ctx = PredictionContext {
                device_id: &self.options.selected_device,
                reading: latest,
                anomalies: &evaluation.anomalies,
                health_score,
                horizon: self.options.prediction_horizon,
            };
            match self.predictor.predict(&ctx).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(predictor = %self.predictor.name(), error = %e, "prediction failed, using stub");
                    warnings.push(EngineWarning::PredictorFailed {
                        predictor: self.predictor.name().to_string(),
                        error: e.to_string(),
                    });
                    StubPredictor::prediction()
                }
            }
        } else {
            Prediction::none()
        };

        Some(AnalysisResult {
            predictions: prediction.predictions,
            anomalies: evaluation.anomalies,
            recommendations: prediction.recommendations,
            health_score,
            alerts: evaluation.alerts,
            confidence: prediction.confidence,
            analysis_time: stamp,
        })
    }

    /// Fetch, fall back if needed, evaluate, score, predict.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleOutput {
        let query = ReadingQuery::window(
            self.options.selected_device.clone(),
            now,
            self.window_size,
        );
        let mut warnings = Vec::new();

        let fetched = match self.source.fetch(&query).await {
            Ok(readings) if !readings.is_empty() => Some(readings),
            Ok(_) => {
                warn!(source = %self.source.name(), device = %query.device_id, "no readings returned, falling back to synthetic data");
                warnings.push(EngineWarning::EmptyData {
                    source_name: self.source.name().to_string(),
                });
                None
            }
            Err(e) => {
                warn!(source = %self.source.name(), device = %query.device_id, error = %e, "data source failed, falling back to synthetic data");
                warnings.push(EngineWarning::DataSourceFailed {
                    source_name: self.source.name().to_string(),
                    error: e.to_string(),
                });
                None
            }
        };

        let used_fallback = fetched.is_none();
        let raw = fetched.unwrap_or_else(|| self.fallback.generate(&query));
        let readings = ReadingWindow::from_unordered(self.window_size, raw).into_vec();

        let stamp = self.clock.next(now);
        let result = self.analyze_collecting(&readings, stamp, &mut warnings).await;

        if let Some(r) = &result {
            if self.options.debug_mode() {
                info!(
                    device = %query.device_id,
                    readings = readings.len(),
                    health = r.health_score,
                    alerts = r.alerts.len(),
                    fallback = used_fallback,
                    "cycle complete"
                );
            } else {
                debug!(
                    device = %query.device_id,
                    readings = readings.len(),
                    health = r.health_score,
                    alerts = r.alerts.len(),
                    fallback = used_fallback,
                    "cycle complete"
                );
            }
        }

        CycleOutput {
            readings,
            result,
            warnings,
            used_fallback,
        }
    }
}
