//! Console output formatting with colored display.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::model::Category;
use crate::rank::{Rank, RankedParticipant};
use crate::score::input::format_score;
use crate::session::JudgeProgress;

/// Format a ranked category as a boxed leaderboard.
///
/// Unranked rows ("-") are dimmed; tie markers show as `=` after the rank.
pub fn format_leaderboard(category: &Category, rows: &[RankedParticipant]) -> String {
    let mut output = String::new();

    let title = format!("  {}", category.name.bold());
    let border: String = "━".repeat(58);
    let border_dim = border.dimmed();

    let _ = writeln!(output, "{border_dim}");
    let _ = writeln!(output, "{title}");
    let _ = writeln!(output, "{border_dim}");
    let _ = writeln!(
        output,
        "  {:>4}  {:>4}  {:<28} {:>7} {:>7}",
        "RANK", "BIB", "NAME", "TOTAL", "AVG"
    );

    for row in rows {
        let rank_str = match (row.rank, row.is_tied) {
            (Rank::Placed(n), true) => format!("{n}="),
            (Rank::Placed(n), false) => n.to_string(),
            (Rank::Unranked, _) => "-".to_string(),
        };
        let line = format!(
            "  {:>4}  {:>4}  {:<28} {:>7} {:>7}",
            rank_str,
            row.participant.number,
            row.participant.name,
            format_score(row.aggregate.total),
            format_score(row.aggregate.average),
        );
        match row.rank {
            Rank::Placed(1) => {
                let _ = writeln!(output, "{}", line.yellow());
            }
            Rank::Unranked => {
                let _ = writeln!(output, "{}", line.dimmed());
            }
            _ => {
                let _ = writeln!(output, "{line}");
            }
        }
    }

    let _ = writeln!(output, "{border_dim}");
    output
}

/// Format the admin progress monitor: one block per judge, one line per
/// category with the submission flag and scored-participant count.
pub fn format_progress(rows: &[JudgeProgress]) -> String {
    let mut output = String::new();

    for judge in rows {
        let _ = writeln!(
            output,
            "{} {}",
            judge.judge_name.bold(),
            format!("<{}>", judge.judge_email).dimmed()
        );
        for category in &judge.categories {
            let flag = if category.submitted {
                "SUBMITTED".green().to_string()
            } else if category.scored > 0 {
                "IN PROGRESS".yellow().to_string()
            } else {
                "NOT STARTED".dimmed().to_string()
            };
            let _ = writeln!(
                output,
                "  {:<28} {:>3}/{:<3} {}",
                category.category_name, category.scored, category.participants, flag
            );
        }
    }

    output
}
