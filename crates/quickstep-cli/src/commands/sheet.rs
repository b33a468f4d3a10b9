//! Sheet command: a judge's own reconciled score sheet for one category.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use quickstep_core::session::ScoringSession;
use quickstep_core::snapshot::CompetitionSnapshot;

pub fn run(snapshot_path: &str, category_id: &str) -> Result<()> {
    let snapshot = CompetitionSnapshot::load(snapshot_path)
        .with_context(|| format!("failed to load snapshot: {snapshot_path}"))?;
    let mut session = ScoringSession::from_snapshot(snapshot);

    if !session.actor().role.can_score() {
        bail!(
            "actor {} ({}) has no score sheet; sheets exist for judges only",
            session.actor().email,
            session.actor().role
        );
    }

    session
        .select_category(category_id)
        .with_context(|| format!("cannot open category {category_id}"))?;

    let category = session
        .competition()
        .category(category_id)
        .expect("select_category succeeded")
        .clone();
    let items = category.scored_items();
    let participants: Vec<_> = session
        .participants_for(category_id)
        .into_iter()
        .cloned()
        .collect();
    let draft = session.draft().expect("judge with active category");

    let mut output = String::new();
    let _ = write!(output, "{:>4}  {:<24}", "BIB", "NAME");
    for item in &items {
        let _ = write!(output, " {:>10}", item.label);
    }
    let _ = writeln!(output, " {:>8}", "TOTAL");

    for participant in &participants {
        let _ = write!(output, "{:>4}  {:<24}", participant.number, participant.name);
        for item in &items {
            let value = draft.get(&participant.id, &item.id).unwrap_or("");
            let shown = if value.is_empty() { "-" } else { value };
            let _ = write!(output, " {shown:>10}");
        }
        let _ = writeln!(output, " {:>8.1}", draft.total_for(&participant.id));
    }

    let state = session.submission_state(category_id);
    let _ = writeln!(output, "state: {state:?}");

    print!("{output}");
    Ok(())
}
