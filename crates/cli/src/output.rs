//! Text and JSON rendering of cycle results.

use anyhow::Result;
use serde::Serialize;

use ecu_compute::CycleOutput;
use ecu_core::{AnalysisResult, Reading};

use crate::cli::OutputFormat;

/// One line of JSON, or pretty JSON for one-shot commands.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

pub fn print_cycle(
    format: OutputFormat,
    device: &str,
    out: &CycleOutput,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(out, pretty),
        OutputFormat::Text => {
            for warning in &out.warnings {
                println!("! {warning}");
            }
            match &out.result {
                Some(result) => print_result(device, result, out.used_fallback),
                None => println!("device {device}: no readings"),
            }
            Ok(())
        }
    }
}

pub fn print_result(device: &str, result: &AnalysisResult, synthetic: bool) {
    let source = if synthetic { " [synthetic]" } else { "" };
    println!(
        "{} device {}: health {} ({}), {} anomalies, {} alerts{}",
        result.analysis_time.format("%Y-%m-%d %H:%M:%S"),
        device,
        result.health_score,
        result.health_band(),
        result.anomalies.len(),
        result.alerts.len(),
        source,
    );
    for alert in &result.alerts {
        println!("  {:<8} {}", alert.severity.as_str().to_uppercase(), alert.message);
    }
    if !result.predictions.is_empty() {
        println!("  confidence {:.0}%", result.confidence * 100.0);
        for p in &result.predictions {
            println!("  > {p}");
        }
        for r in &result.recommendations {
            println!("  * {r}");
        }
    }
}

pub fn print_readings(format: OutputFormat, readings: &[Reading]) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&readings, true),
        OutputFormat::Text => {
            for r in readings {
                let values: Vec<String> = r
                    .values
                    .iter()
                    .map(|(k, v)| format!("{k}={v:.2}"))
                    .collect();
                println!("{} {}", r.timestamp.format("%H:%M:%S"), values.join(" "));
            }
            Ok(())
        }
    }
}
