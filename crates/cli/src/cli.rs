use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ecu_core::MetricDirection;

/// ECU telemetry monitor.
///
/// Evaluates ECU readings against warning/critical thresholds, scores unit
/// health and prints the results. Runs against a live telemetry API when
/// `ECU_API_BASE_URL` is set, otherwise on synthetic data.
#[derive(Parser, Debug)]
#[command(name = "ecu-monitor", version, about)]
pub struct Cli {
    /// Panel options file (TOML, or JSON from an older panel which is migrated).
    #[arg(long, global = true, env = "ECU_OPTIONS_FILE")]
    pub options: Option<PathBuf>,

    /// YAML threshold overrides file.
    #[arg(long, global = true, env = "ECU_THRESHOLDS_FILE")]
    pub thresholds: Option<PathBuf>,

    /// Device to monitor (overrides the options' selected device).
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Breach direction for `thresholds set`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Above,
    Below,
}

impl From<DirectionArg> for MetricDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Above => MetricDirection::Above,
            DirectionArg::Below => MetricDirection::Below,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Re-evaluate periodically until interrupted.
    Watch(WatchArgs),
    /// Run a single analysis cycle, or analyze readings from a file.
    Analyze(AnalyzeArgs),
    /// Print synthetic readings.
    Generate(GenerateArgs),
    /// Print the option field table resolved against the current options.
    Schema(SchemaArgs),
    /// Validate panel options (and threshold overrides, if configured).
    Validate,
    /// Inspect or edit the threshold overrides file.
    #[command(subcommand)]
    Thresholds(ThresholdCommand),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Stop after this many published cycles.
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Do not hot-reload the threshold overrides file.
    #[arg(long)]
    pub no_reload: bool,

    /// Seed for the synthetic generator (reproducible runs).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON array of readings to analyze instead of fetching.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Seed for the synthetic generator.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of readings (defaults to the configured window size).
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Only fields in this category (basic, device, metrics, ai, display).
    #[arg(long)]
    pub category: Option<String>,

    /// Print the default options as TOML instead.
    #[arg(long)]
    pub defaults: bool,
}

#[derive(Subcommand, Debug)]
pub enum ThresholdCommand {
    /// List current overrides.
    List,
    /// Add or replace an override.
    Set {
        metric: String,
        #[arg(long)]
        warning: f64,
        #[arg(long)]
        critical: f64,
        /// Inferred from the boundaries when omitted.
        #[arg(long, value_enum, ignore_case = true)]
        direction: Option<DirectionArg>,
    },
    /// Remove an override.
    Remove { metric: String },
}
