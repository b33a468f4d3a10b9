//! Standard competition ranking.
//!
//! Ties share a rank and the next distinct average resumes at its 1-based
//! position (1,1,3,4 — never 1,1,2,3). A participant with no scores at all
//! (average exactly 0) gets the "-" sentinel instead of a number.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::aggregate::Aggregate;
use crate::model::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Placed(u32),
    /// Rendered as "-": no scores yet.
    Unranked,
}

// Emitted as a bare number or the "-" sentinel, matching the consumer's
// expectation of `int | "-"`.
impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Placed(n) => serializer.serialize_u32(*n),
            Self::Unranked => serializer.serialize_str("-"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed(n) => write!(f, "{n}"),
            Self::Unranked => write!(f, "-"),
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone)]
pub struct RankedParticipant {
    pub participant: Participant,
    pub aggregate: Aggregate,
    pub rank: Rank,
    /// Set only in tie-marked views (admin monitor, locked results); a judge
    /// actively scoring never sees it.
    pub is_tied: bool,
}

/// Assign ranks from aggregated averages.
///
/// The returned rows are in rank order (average descending). `mark_ties`
/// controls the `is_tied` flag: equality of averages rounded to 2 decimals,
/// requested by admin/locked views only.
pub fn rank(
    participants: &[Participant],
    aggregates: &HashMap<String, Aggregate>,
    mark_ties: bool,
) -> Vec<RankedParticipant> {
    let mut rows: Vec<RankedParticipant> = participants
        .iter()
        .map(|participant| {
            let aggregate = aggregates
                .get(&participant.id)
                .copied()
                .unwrap_or_default();
            RankedParticipant {
                participant: participant.clone(),
                aggregate,
                rank: Rank::Unranked,
                is_tied: false,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.aggregate.average.total_cmp(&a.aggregate.average));

    // Standard competition ranking: same average as the predecessor shares
    // its rank, otherwise the rank is the 1-based position. Averages compare
    // at the 2-decimal precision they are displayed with, so two entries the
    // scoreboard shows as equal can never carry different ranks.
    let mut previous_average: Option<i64> = None;
    let mut previous_rank = 0u32;
    for (index, row) in rows.iter_mut().enumerate() {
        if row.aggregate.average == 0.0 {
            row.rank = Rank::Unranked;
            continue;
        }
        let rounded = round2(row.aggregate.average);
        let rank_value = if previous_average == Some(rounded) {
            previous_rank
        } else {
            (index + 1) as u32
        };
        previous_average = Some(rounded);
        previous_rank = rank_value;
        row.rank = Rank::Placed(rank_value);
    }

    if mark_ties {
        let mut rounded_counts: HashMap<i64, usize> = HashMap::new();
        for row in &rows {
            if row.aggregate.average > 0.0 {
                *rounded_counts.entry(round2(row.aggregate.average)).or_insert(0) += 1;
            }
        }
        for row in &mut rows {
            row.is_tied = row.aggregate.average > 0.0
                && rounded_counts[&round2(row.aggregate.average)] > 1;
        }
    }

    rows
}

/// Reorder rows for display: bib number (numeric-aware) then name. Rank
/// values are untouched; they were assigned from the average-descending
/// order already.
pub fn display_sort(rows: &mut [RankedParticipant]) {
    rows.sort_by(|a, b| a.participant.display_cmp(&b.participant));
}

fn round2(value: f64) -> i64 {
    (value * 100.0).round() as i64
}
