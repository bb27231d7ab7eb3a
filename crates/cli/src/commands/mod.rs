mod analyze;
mod options;
mod thresholds;
mod watch;

use anyhow::Result;

use crate::cli::Command;
use crate::context::AppContext;

pub async fn dispatch(ctx: &AppContext, command: &Command) -> Result<()> {
    match command {
        Command::Watch(args) => watch::run(ctx, args).await,
        Command::Analyze(args) => analyze::run(ctx, args).await,
        Command::Generate(args) => analyze::generate(ctx, args),
        Command::Schema(args) => options::schema(ctx, args),
        Command::Validate => options::validate(ctx),
        Command::Thresholds(cmd) => thresholds::run(ctx, cmd),
    }
}
