//! Progress command: the admin submission monitor.

use anyhow::{Context, Result};
use quickstep_core::console;
use quickstep_core::session::ScoringSession;
use quickstep_core::snapshot::CompetitionSnapshot;

pub fn run(snapshot_path: &str) -> Result<()> {
    let snapshot = CompetitionSnapshot::load(snapshot_path)
        .with_context(|| format!("failed to load snapshot: {snapshot_path}"))?;
    let session = ScoringSession::from_snapshot(snapshot);

    print!("{}", console::format_progress(&session.progress()));
    Ok(())
}
