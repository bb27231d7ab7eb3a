use anyhow::{bail, Context, Result};

use ecu_rules::{ThresholdOverride, ThresholdStore};

use crate::cli::{OutputFormat, ThresholdCommand};
use crate::context::AppContext;
use crate::output;

pub fn run(ctx: &AppContext, cmd: &ThresholdCommand) -> Result<()> {
    let path = ctx
        .thresholds_path()
        .context("no overrides file; pass --thresholds or set ECU_THRESHOLDS_FILE")?;
    let store = ThresholdStore::new(path.clone());
    store.load()?;

    match cmd {
        ThresholdCommand::List => list(ctx.format, &store),
        ThresholdCommand::Set {
            metric,
            warning,
            critical,
            direction,
        } => {
            let mut value = ThresholdOverride::new(*warning, *critical);
            if let Some(d) = direction {
                value = value.with_direction((*d).into());
            }
            store.set(metric.clone(), value)?;
            let saved = store.save()?;
            println!("{metric}: warning {warning}, critical {critical} -> {}", saved.display());
            Ok(())
        }
        ThresholdCommand::Remove { metric } => {
            if store.remove(metric).is_none() {
                bail!("no override for '{metric}'");
            }
            let saved = store.save()?;
            println!("{metric}: removed -> {}", saved.display());
            Ok(())
        }
    }
}

fn list(format: OutputFormat, store: &ThresholdStore) -> Result<()> {
    let overrides = store.overrides();
    match format {
        OutputFormat::Json => output::print_json(&overrides, true),
        OutputFormat::Text => {
            if overrides.is_empty() {
                println!("no overrides in {}", store.path().display());
            }
            for (key, o) in &overrides {
                let direction = o.direction.map(|d| d.as_str()).unwrap_or("-");
                println!(
                    "{key:<20} warning {:<8} critical {:<8} {direction}",
                    o.warning, o.critical
                );
            }
            Ok(())
        }
    }
}
