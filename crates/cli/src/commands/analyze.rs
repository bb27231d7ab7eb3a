use anyhow::{Context, Result};
use chrono::Utc;

use ecu_core::Reading;

use crate::cli::{AnalyzeArgs, GenerateArgs, OutputFormat};
use crate::context::AppContext;
use crate::output;

/// One cycle against the configured source, or a single evaluation of
/// readings from `--input`.
pub async fn run(ctx: &AppContext, args: &AnalyzeArgs) -> Result<()> {
    let (options, _store) = ctx.effective_options()?;
    let device = options.selected_device.clone();
    let engine = ctx.engine(options, args.seed)?;

    let Some(path) = &args.input else {
        let out = engine.run_cycle(Utc::now()).await;
        return output::print_cycle(ctx.format, &device, &out, true);
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let readings: Vec<Reading> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of readings", path.display()))?;

    let result = engine.analyze(&readings, Utc::now()).await;
    match (ctx.format, result) {
        (OutputFormat::Json, result) => output::print_json(&result, true)?,
        (OutputFormat::Text, Some(result)) => output::print_result(&device, &result, false),
        (OutputFormat::Text, None) => println!("{}: no readings", path.display()),
    }
    Ok(())
}

pub fn generate(ctx: &AppContext, args: &GenerateArgs) -> Result<()> {
    let count = args.count.unwrap_or(ctx.config.runner.window_size);
    let readings = AppContext::generator(args.seed).generate(count, Utc::now());
    output::print_readings(ctx.format, &readings)
}
