//! Analysis cycle for ECU telemetry.
//!
//! This crate provides:
//! - The synthetic reading generator
//! - Data sources (HTTP, synthetic, cached) behind the `DataSource` trait
//! - Pluggable prediction strategies behind the `Predictor` trait
//! - The analysis engine with synthetic fallback
//! - The periodic runner that supersedes stale cycles

pub mod engine;
pub mod predictor;
pub mod runner;
pub mod source;
pub mod synthetic;

pub use engine::{CycleOutput, EngineWarning, TelemetryAnalysisEngine, DEFAULT_WINDOW_SIZE};
pub use predictor::{
    HttpPredictor, PredictError, Prediction, PredictionContext, Predictor, StubPredictor,
};
pub use runner::{LatestCycle, PeriodicRunner, RunnerMetrics};
pub use source::{
    CachedSource, DataSource, HttpDataSource, ReadingQuery, SourceError, SyntheticSource,
};
pub use synthetic::{SignalProfile, SyntheticGenerator, Wave};
