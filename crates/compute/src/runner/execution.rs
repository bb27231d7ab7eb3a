use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError};
use std::time::Instant;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::core::PeriodicRunner;

fn build_ticker(period: std::time::Duration, first: tokio::time::Instant) -> Interval {
    let mut ticker = interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl PeriodicRunner {
    /// Run until [`shutdown`](Self::shutdown) is signalled.
    ///
    /// The first cycle starts immediately. Options updates are applied as
    /// soon as they arrive; a changed refresh interval rebuilds the ticker.
    pub async fn run(mut self) {
        let mut period = self.period();
        let mut ticker = build_ticker(period, tokio::time::Instant::now());
        let mut in_flight: Option<JoinHandle<()>> = None;
        let mut options_open = true;

        info!(period_secs = period.as_secs(), source = %self.engine.source_name(), "runner started");

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    if let Some(handle) = in_flight.take() {
                        handle.abort();
                    }
                    info!("runner stopped");
                    break;
                }
                changed = self.options_rx.changed(), if options_open => {
                    if changed.is_err() {
                        debug!("options channel closed, keeping current options");
                        options_open = false;
                        continue;
                    }
                    let options = self.options_rx.borrow_and_update().clone();
                    self.engine = self.engine.with_options(options);
                    let next = self.period();
                    if next != period {
                        info!(from_secs = period.as_secs(), to_secs = next.as_secs(), "refresh interval changed");
                        period = next;
                        ticker = build_ticker(period, tokio::time::Instant::now() + period);
                    }
                }
                _ = ticker.tick() => {
                    if let Some(handle) = in_flight.take() {
                        if !handle.is_finished() {
                            handle.abort();
                            self.metrics
                                .write()
                                .unwrap_or_else(PoisonError::into_inner)
                                .record_superseded();
                            warn!(period_secs = period.as_secs(), "previous cycle still running, superseded");
                        }
                    }
                    in_flight = Some(self.spawn_cycle());
                }
            }
        }
    }

    fn spawn_cycle(&self) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let engine = self.engine.clone();
        let metrics = Arc::clone(&self.metrics);
        let results_tx = self.results_tx.clone();

        metrics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record_start();

        tokio::spawn(async move {
            let started = Instant::now();
            let output = engine.run_cycle(Utc::now()).await;

            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "stale cycle finished late, discarding");
                return;
            }

            metrics
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .record_completion(started.elapsed(), output.used_fallback, output.warnings.len());
            results_tx.send_replace(Some(Arc::new(output)));
        })
    }
}
