mod cli;
mod cli_utils;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stepchart=info".parse()?)
                .add_directive("stepchart_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let rules = cli_utils::load_rules(args.rules.as_deref())?;

    match args.command {
        Command::Parse { input, output } => commands::parse::run(&input, output.as_deref(), &rules),
        Command::Stats { input, output } => {
            commands::stats::run(&input, output.as_deref(), &rules)
        }
    }
}
