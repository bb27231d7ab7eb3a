use anyhow::{bail, Result};
use serde_json::json;

use ecu_core::schema::{OptionCategory, OPTION_FIELDS};
use ecu_core::PanelOptions;

use crate::cli::{OutputFormat, SchemaArgs};
use crate::context::AppContext;
use crate::output;

fn parse_category(name: &str) -> Result<OptionCategory> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "basic" => OptionCategory::Basic,
        "device" => OptionCategory::Device,
        "metrics" => OptionCategory::Metrics,
        "ai" => OptionCategory::Ai,
        "display" => OptionCategory::Display,
        other => bail!("unknown category '{other}' (expected basic, device, metrics, ai or display)"),
    })
}

pub fn schema(ctx: &AppContext, args: &SchemaArgs) -> Result<()> {
    if args.defaults {
        print!("{}", PanelOptions::default().to_toml()?);
        return Ok(());
    }

    let category = args.category.as_deref().map(parse_category).transpose()?;
    let (options, _store) = ctx.effective_options()?;
    let fields = OPTION_FIELDS
        .iter()
        .filter(|f| category.map_or(true, |c| f.category == c));

    match ctx.format {
        OutputFormat::Json => {
            let rows: Vec<_> = fields
                .map(|f| {
                    json!({
                        "field": f,
                        "visible": f.is_visible(&options),
                        "choices": f.resolve_choices(&options),
                    })
                })
                .collect();
            output::print_json(&rows, true)
        }
        OutputFormat::Text => {
            for f in fields {
                let hidden = if f.is_visible(&options) { "" } else { " (hidden)" };
                println!("{:<24} {}{}", f.path, f.label, hidden);
                for c in f.resolve_choices(&options) {
                    println!("    {:<20} {}", c.value, c.label);
                }
            }
            Ok(())
        }
    }
}

/// Loading already validates; this also checks the options with overrides applied.
pub fn validate(ctx: &AppContext) -> Result<()> {
    let (options, store) = ctx.effective_options()?;
    if let Err(issues) = options.validate() {
        for issue in &issues {
            eprintln!("  {issue}");
        }
        bail!("{} issue(s) found", issues.len());
    }
    let overrides = store.map(|s| s.overrides().len()).unwrap_or(0);
    println!(
        "ok: device {}, {} metrics, {} threshold overrides",
        options.selected_device,
        options.metrics_config.len(),
        overrides
    );
    Ok(())
}
