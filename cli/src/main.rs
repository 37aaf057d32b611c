mod commands;
mod controller;
mod terminal;

use commands::{CommandLine, Commands, assess, targets};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    match commands.command {
        Commands::Assess(args) => assess::assess(args).await,
        Commands::Targets(args) => targets::targets(args).await,
    }
}
