//! Threshold rules for ECU telemetry.
//!
//! This crate provides:
//! - Zone classification and the per-reading threshold evaluator
//! - The health score aggregator and display bands
//! - A monotonic evaluation clock for collision-free alert ids
//! - A YAML threshold override store with hot-reload via `notify`

pub mod clock;
pub mod evaluator;
pub mod health;
pub mod store;

pub use clock::EvaluationClock;
pub use evaluator::{Evaluation, ThresholdEvaluator, Zone};
pub use health::{health_score, HealthBand};
pub use store::{apply_overrides, StoreError, ThresholdOverride, ThresholdStore};
