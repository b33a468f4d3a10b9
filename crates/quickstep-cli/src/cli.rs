//! CLI argument definitions for quickstep.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quickstep")]
#[command(about = "Dance competition scoring engine", version)]
pub struct Args {
    /// Path to the competition snapshot (JSON)
    #[arg(short, long, env = "QUICKSTEP_SNAPSHOT", default_value = "snapshot.json")]
    pub snapshot: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the ranked leaderboard for a category
    Leaderboard {
        /// Category id (defaults to every category in order)
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show per-judge submission progress across all categories
    Progress,
    /// Show a judge's own reconciled sheet for a category
    Sheet {
        /// Category id
        #[arg(long)]
        category: String,
    },
    /// Replay a scripted judge session against an in-memory writer
    Simulate {
        /// Path to the action script (JSON)
        #[arg(long)]
        script: String,
    },
}
