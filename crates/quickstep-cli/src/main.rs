mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quickstep_cli=warn,quickstep_core=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match args.command {
        Command::Leaderboard { category, json } => {
            commands::leaderboard::run(&args.snapshot, category.as_deref(), json)
        }
        Command::Progress => commands::progress::run(&args.snapshot),
        Command::Sheet { category } => commands::sheet::run(&args.snapshot, &category),
        Command::Simulate { script } => commands::simulate::run(&args.snapshot, &script),
    }
}
