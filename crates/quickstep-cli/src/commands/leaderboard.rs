//! Leaderboard command: ranked standings for one or all categories.

use anyhow::{Context, Result};
use quickstep_core::console;
use quickstep_core::session::ScoringSession;
use quickstep_core::snapshot::CompetitionSnapshot;
use serde_json::json;

pub fn run(snapshot_path: &str, category: Option<&str>, json_output: bool) -> Result<()> {
    let snapshot = CompetitionSnapshot::load(snapshot_path)
        .with_context(|| format!("failed to load snapshot: {snapshot_path}"))?;
    let session = ScoringSession::from_snapshot(snapshot);

    let category_ids: Vec<String> = match category {
        Some(id) => vec![id.to_string()],
        None => session
            .competition()
            .sorted_categories()
            .iter()
            .map(|c| c.id.clone())
            .collect(),
    };

    let mut boards = Vec::new();
    for category_id in &category_ids {
        let rows = session
            .leaderboard(category_id)
            .with_context(|| format!("cannot rank category {category_id}"))?;

        if json_output {
            let category = session
                .competition()
                .category(category_id)
                .expect("leaderboard succeeded, category exists");
            boards.push(json!({
                "categoryId": category.id,
                "categoryName": category.name,
                "locked": category.locked,
                "rows": rows
                    .iter()
                    .map(|row| json!({
                        "participantId": row.participant.id,
                        "number": row.participant.number,
                        "name": row.participant.name,
                        "total": row.aggregate.total,
                        "average": row.aggregate.average,
                        "rank": row.rank,
                        "tied": row.is_tied,
                    }))
                    .collect::<Vec<_>>(),
            }));
        } else {
            let category = session
                .competition()
                .category(category_id)
                .expect("leaderboard succeeded, category exists");
            print!("{}", console::format_leaderboard(category, &rows));
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&boards)?);
    }
    Ok(())
}
