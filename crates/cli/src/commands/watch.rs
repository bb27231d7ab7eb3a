use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use ecu_compute::PeriodicRunner;
use ecu_rules::apply_overrides;

use crate::cli::WatchArgs;
use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext, args: &WatchArgs) -> Result<()> {
    let base = ctx.base_options()?;
    let mut store = ctx.store()?;
    let initial = match &store {
        Some(s) => s.apply(&base),
        None => base.clone(),
    };
    let device = initial.selected_device.clone();

    let (options_tx, options_rx) = watch::channel(Arc::new(initial.clone()));
    let options_tx = Arc::new(options_tx);

    if let Some(store) = store.as_mut().filter(|_| !args.no_reload) {
        let tx = Arc::clone(&options_tx);
        store.watch(move |overrides| {
            let next = apply_overrides(&base, overrides);
            match next.validate() {
                Ok(()) => {
                    info!(count = overrides.len(), "threshold overrides reloaded");
                    tx.send_replace(Arc::new(next));
                }
                Err(issues) => {
                    let joined: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
                    warn!(issues = %joined.join("; "), "reloaded overrides are invalid; keeping current options");
                }
            }
        })?;
    }

    let engine = ctx.engine(initial, args.seed)?;
    let runner = PeriodicRunner::new(engine, options_rx).with_refresh_override(
        ctx.config.runner.refresh_override_secs.map(Duration::from_secs),
    );
    info!(device = %device, period_secs = runner.period().as_secs(), "starting periodic evaluation");

    let mut results = runner.subscribe();
    let shutdown = runner.shutdown_signal();
    let metrics = runner.metrics_handle();
    let handle = tokio::spawn(runner.run());

    let mut published = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = results.borrow_and_update().clone();
                let Some(out) = latest else { continue };
                let current_device = options_tx.borrow().selected_device.clone();
                output::print_cycle(ctx.format, &current_device, &out, false)?;
                published += 1;
                if args.cycles.is_some_and(|limit| published >= limit) {
                    break;
                }
            }
        }
    }

    shutdown.notify_one();
    handle.await?;

    let m = metrics
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone();
    info!(
        completed = m.cycles_completed,
        superseded = m.cycles_superseded,
        fallbacks = m.fallbacks,
        avg_ms = m.avg_duration.as_millis() as u64,
        "stopped"
    );
    Ok(())
}
