use std::sync::atomic::AtomicU64;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tracing::info;

use ecu_core::panel::REFRESH_INTERVAL_RANGE;
use ecu_core::PanelOptions;

use crate::engine::{CycleOutput, TelemetryAnalysisEngine};

use super::metrics::RunnerMetrics;

/// Latest published cycle, if any.
pub type LatestCycle = Option<Arc<CycleOutput>>;

/// Drives [`TelemetryAnalysisEngine::run_cycle`] on a fixed interval.
///
/// Results are published last-write-wins on a `watch` channel. A tick that
/// arrives while the previous cycle is still running aborts that cycle.
pub struct PeriodicRunner {
    pub(super) engine: TelemetryAnalysisEngine,
    /// Options updates from the caller.
    pub(super) options_rx: watch::Receiver<Arc<PanelOptions>>,
    pub(super) results_tx: watch::Sender<LatestCycle>,
    /// Overrides the options' refresh interval when set.
    pub(super) refresh_override: Option<Duration>,
    pub(super) metrics: Arc<RwLock<RunnerMetrics>>,
    /// Bumped on every spawned cycle; only the newest may publish.
    pub(super) generation: Arc<AtomicU64>,
    pub(super) shutdown: Arc<Notify>,
}

impl PeriodicRunner {
    /// The engine's options are replaced by the value currently in `options_rx`.
    pub fn new(
        engine: TelemetryAnalysisEngine,
        options_rx: watch::Receiver<Arc<PanelOptions>>,
    ) -> Self {
        let current = options_rx.borrow().clone();
        let (results_tx, _) = watch::channel(None);
        Self {
            engine: engine.with_options(current),
            options_rx,
            results_tx,
            refresh_override: None,
            metrics: Arc::new(RwLock::new(RunnerMetrics::default())),
            generation: Arc::new(AtomicU64::new(0)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn with_refresh_override(mut self, period: Option<Duration>) -> Self {
        self.refresh_override = period;
        self
    }

    /// Receiver for published cycles. Starts at `None`.
    pub fn subscribe(&self) -> watch::Receiver<LatestCycle> {
        self.results_tx.subscribe()
    }

    /// Tick period: the override if set, else the options' refresh interval,
    /// clamped to 5..=300 seconds.
    pub fn period(&self) -> Duration {
        let wanted = self
            .refresh_override
            .unwrap_or_else(|| self.engine.options().refresh_period());
        let lo = Duration::from_secs(*REFRESH_INTERVAL_RANGE.start());
        let hi = Duration::from_secs(*REFRESH_INTERVAL_RANGE.end());
        wanted.clamp(lo, hi)
    }

    /// Get a snapshot of the current runner metrics.
    pub fn metrics(&self) -> RunnerMetrics {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get an Arc to the metrics (for reads after `run` consumed the runner).
    pub fn metrics_handle(&self) -> Arc<RwLock<RunnerMetrics>> {
        Arc::clone(&self.metrics)
    }

    /// Get an Arc to the shutdown signal. `notify_one` stops the loop.
    pub fn shutdown_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the runner to stop.
    pub fn shutdown(&self) {
        info!("runner shutdown requested");
        self.shutdown.notify_one();
    }
}
