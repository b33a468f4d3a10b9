//! Simulate command: replay a scripted judge session against an in-memory
//! writer and report what would have been committed.
//!
//! The script is a JSON array of actions, e.g.:
//!
//! ```json
//! [
//!   {"select": {"category": "cat1"}},
//!   {"edit": {"participant": "p1", "item": "tech", "text": "75"}},
//!   {"blur": {"participant": "p1", "item": "tech"}},
//!   {"submit": {"confirm": true}}
//! ]
//! ```

use anyhow::{Context, Result};
use quickstep_core::session::{ScoringSession, SubmitOutcome};
use quickstep_core::snapshot::CompetitionSnapshot;
use quickstep_core::wire::MemoryWriter;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Action {
    Select {
        category: String,
    },
    Edit {
        participant: String,
        item: String,
        text: String,
    },
    Blur {
        participant: String,
        item: String,
    },
    Submit {
        #[serde(default)]
        confirm: bool,
    },
    Reopen {
        category: String,
    },
}

pub fn run(snapshot_path: &str, script_path: &str) -> Result<()> {
    let snapshot = CompetitionSnapshot::load(snapshot_path)
        .with_context(|| format!("failed to load snapshot: {snapshot_path}"))?;
    let mut session = ScoringSession::from_snapshot(snapshot);

    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script: {script_path}"))?;
    let actions: Vec<Action> =
        serde_json::from_str(&script).with_context(|| format!("malformed script: {script_path}"))?;

    let mut writer = MemoryWriter::new();
    for (index, action) in actions.iter().enumerate() {
        let step = index + 1;
        match action {
            Action::Select { category } => {
                session.select_category(category)?;
                println!("{step:>3}. select {category}");
            }
            Action::Edit {
                participant,
                item,
                text,
            } => match session.edit(participant, item, text)? {
                Some(formatted) => {
                    println!("{step:>3}. edit {participant}/{item} \"{text}\" -> \"{formatted}\"");
                }
                None => {
                    println!("{step:>3}. edit {participant}/{item} \"{text}\" -> rejected");
                }
            },
            Action::Blur { participant, item } => {
                match session.blur(participant, item)? {
                    Some(finalized) => {
                        println!("{step:>3}. blur {participant}/{item} -> \"{finalized}\"");
                    }
                    None => println!("{step:>3}. blur {participant}/{item} -> cleared"),
                }
            }
            Action::Submit { confirm } => match session.submit(&mut writer, *confirm)? {
                SubmitOutcome::Submitted { cells_written } => {
                    println!("{step:>3}. submit -> {cells_written} cells written");
                }
                SubmitOutcome::Incomplete { missing } => {
                    println!(
                        "{step:>3}. submit -> held back, missing scores for: {}",
                        missing.join(", ")
                    );
                }
            },
            Action::Reopen { category } => {
                session.reopen(&mut writer, category)?;
                println!("{step:>3}. reopen {category}");
            }
        }
    }

    println!();
    println!("batches committed: {}", writer.committed().len());
    if let Some(batch) = writer.last() {
        println!(
            "last batch: {} documents ({} cells + judge {})",
            batch.doc_count(),
            batch.cells.len(),
            batch.judge.doc_key()
        );
    }
    Ok(())
}
