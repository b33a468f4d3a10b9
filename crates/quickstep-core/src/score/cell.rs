use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::normalize_email;

/// Lowest admissible score. 5.0 is deliberately not scorable; 5.5 is the floor.
pub const SCORE_MIN: f64 = 5.5;
/// Highest admissible score.
pub const SCORE_MAX: f64 = 9.9;

/// Clamp a score into the admissible range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

/// Identity of one score cell: one judge's scores for one participant in one
/// category. Distinct judges never share a key, which is what makes
/// concurrent submissions conflict-free at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub category_id: String,
    pub participant_id: String,
    /// Always the normalized (lowercased) form.
    pub judge_email: String,
}

impl CellKey {
    pub fn new(
        category_id: impl Into<String>,
        participant_id: impl Into<String>,
        judge_email: impl AsRef<str>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            participant_id: participant_id.into(),
            judge_email: normalize_email(judge_email.as_ref()),
        }
    }

    /// Document key as persisted by the store collaborator.
    pub fn doc_key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.category_id, self.participant_id, self.judge_email
        )
    }
}

/// One judge's per-item scores for one participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCell {
    /// item id -> score, each in [SCORE_MIN, SCORE_MAX].
    pub values: HashMap<String, f64>,
}

impl ScoreCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, clamping into the admissible range.
    pub fn set(&mut self, item_id: impl Into<String>, value: f64) {
        self.values.insert(item_id.into(), clamp_score(value));
    }

    pub fn get(&self, item_id: &str) -> Option<f64> {
        self.values.get(item_id).copied()
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
