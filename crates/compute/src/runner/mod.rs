//! Periodic re-evaluation of the engine.
//!
//! Split into focused submodules:
//! - `core`: PeriodicRunner struct, constructor, and accessor methods
//! - `execution`: the tick loop, cycle spawning and supersede handling
//! - `metrics`: operational counters

mod core;
mod execution;
mod metrics;

pub use self::core::{LatestCycle, PeriodicRunner};
pub use self::metrics::RunnerMetrics;
