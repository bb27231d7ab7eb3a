mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;

use ecu_core::Config;

use crate::cli::Cli;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable with --format json.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    ecu_core::config::load_dotenv();
    let cli = Cli::parse();

    let ctx = AppContext::new(Config::from_env(), &cli);
    ctx.config.log_summary();

    commands::dispatch(&ctx, &cli.command).await
}
