//! Per-participant totals and averages.
//!
//! Pure functions of (participants, store/draft, judge roster); recomputed
//! on every store publish and every draft edit.

use std::collections::HashMap;

use crate::draft::CategoryDraft;
use crate::model::{Judge, Participant};
use crate::store::ScoreStore;

/// Whose scores feed the aggregation.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// The judge's own view: their draft overlay, nobody else's cells.
    Own { draft: &'a CategoryDraft },
    /// Admin / spectator / cross-judge view: every registered judge of the
    /// competition counts, scored or not.
    All { judges: &'a [Judge] },
}

/// Aggregated result for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub total: f64,
    pub average: f64,
    pub judge_count: usize,
}

/// Compute aggregates for every participant of a category.
///
/// In the `All` scope a judge with no committed cell contributes 0, and the
/// divisor is the registered judge count, not the count of judges who
/// scored. A persisted `total_score` on the participant is a stale-data
/// override: when present it wins over the live recomputation.
pub fn aggregate(
    participants: &[Participant],
    category_id: &str,
    store: &ScoreStore,
    scope: Scope<'_>,
) -> HashMap<String, Aggregate> {
    participants
        .iter()
        .map(|participant| {
            let aggregate = match scope {
                Scope::Own { draft } => aggregate_own(participant, draft),
                Scope::All { judges } => {
                    aggregate_all(participant, category_id, store, judges)
                }
            };
            (participant.id.clone(), aggregate)
        })
        .collect()
}

fn aggregate_own(participant: &Participant, draft: &CategoryDraft) -> Aggregate {
    let total = draft.total_for(&participant.id);
    // Single-judge view reports the judge's own total, not a cross-judge
    // average; the two coincide with judge_count = 1.
    Aggregate {
        total,
        average: total,
        judge_count: 1,
    }
}

fn aggregate_all(
    participant: &Participant,
    category_id: &str,
    store: &ScoreStore,
    judges: &[Judge],
) -> Aggregate {
    let judge_count = judges.len();

    // Stale-data compatibility: a persisted total overrides the live sum.
    if let Some(total_score) = participant.total_score {
        return Aggregate {
            total: total_score,
            average: total_score,
            judge_count,
        };
    }

    let total: f64 = judges
        .iter()
        .map(|judge| {
            store
                .judge_cell(category_id, &participant.id, &judge.email)
                .map(|cell| cell.total())
                .unwrap_or(0.0)
        })
        .sum();
    let average = if judge_count == 0 {
        0.0
    } else {
        total / judge_count as f64
    };

    Aggregate {
        total,
        average,
        judge_count,
    }
}
