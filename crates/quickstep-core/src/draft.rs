//! Per-judge draft overlay and its reconciliation against the store.
//!
//! The draft is what the judge is typing right now: a category-scoped,
//! judge-scoped shadow of their own cells that may diverge from the store
//! until submitted. Reconciliation runs on exactly two events (category
//! switch, store update) and is strictly one-directional: server values fill
//! blanks in the draft, the draft never leaks into the store outside an
//! explicit submission.

use std::collections::HashMap;

use crate::model::{Participant, normalize_email};
use crate::score::input::{format_score, is_complete};
use crate::score::{ScoreCell, clamp_score};
use crate::store::ScoreStore;

/// A judge's local, possibly-unsaved scores for one category.
///
/// Values are raw text as typed; the empty string means "not yet scored".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub category_id: String,
    /// Lowercased.
    pub judge_email: String,
    /// participant id -> item id -> typed text.
    values: HashMap<String, HashMap<String, String>>,
}

impl CategoryDraft {
    pub fn new(category_id: impl Into<String>, judge_email: impl AsRef<str>) -> Self {
        Self {
            category_id: category_id.into(),
            judge_email: normalize_email(judge_email.as_ref()),
            values: HashMap::new(),
        }
    }

    pub fn get(&self, participant_id: &str, item_id: &str) -> Option<&str> {
        self.values
            .get(participant_id)
            .and_then(|items| items.get(item_id))
            .map(String::as_str)
    }

    /// Missing key and empty string are both blank; blanks are what
    /// reconciliation may fill from the server side.
    pub fn is_blank(&self, participant_id: &str, item_id: &str) -> bool {
        self.get(participant_id, item_id)
            .is_none_or(|text| text.is_empty())
    }

    pub fn set(
        &mut self,
        participant_id: impl Into<String>,
        item_id: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.values
            .entry(participant_id.into())
            .or_default()
            .insert(item_id.into(), text.into());
    }

    /// The draft rows that hold at least one non-blank value.
    pub fn participant_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .values
            .iter()
            .filter(|(_, items)| items.values().any(|text| !text.is_empty()))
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Sum of the judge's complete values for one participant.
    pub fn total_for(&self, participant_id: &str) -> f64 {
        self.values
            .get(participant_id)
            .map(|items| {
                items
                    .values()
                    .filter_map(|text| text.parse::<f64>().ok())
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Convert one participant's row into a committed cell, clamping each
    /// complete value into range. Incomplete text is dropped, not persisted.
    pub fn to_cell(&self, participant_id: &str) -> ScoreCell {
        let mut cell = ScoreCell::new();
        if let Some(items) = self.values.get(participant_id) {
            for (item_id, text) in items {
                if is_complete(text)
                    && let Ok(value) = text.parse::<f64>()
                {
                    cell.values.insert(item_id.clone(), clamp_score(value));
                }
            }
        }
        cell
    }
}

/// Reconcile a judge's draft against the authoritative store.
///
/// * `category_changed == true`: the draft starts over, seeded only from the
///   judge's own committed cells (their last known server values). Whatever
///   was typed for the previous category is gone by design; the caller keeps
///   at most one draft, for the active category.
/// * `category_changed == false`: a store update arrived mid-edit. The draft
///   is kept as-is; for every (participant, item) present in the judge's own
///   server cell but blank locally, the server value is copied in. A key the
///   judge has typed — even unsaved — is never overwritten.
///
/// This is what keeps a concurrent submission by a different judge (which
/// churns the whole store) from wiping this judge's keystrokes.
pub fn reconcile(
    category_id: &str,
    judge_email: &str,
    participants: &[Participant],
    store: &ScoreStore,
    previous: Option<&CategoryDraft>,
    category_changed: bool,
) -> CategoryDraft {
    let email = normalize_email(judge_email);

    let mut draft = match previous {
        Some(prev) if !category_changed && prev.category_id == category_id => prev.clone(),
        _ => CategoryDraft::new(category_id, &email),
    };

    for participant in participants {
        let Some(cell) = store.judge_cell(category_id, &participant.id, &email) else {
            continue;
        };
        for (item_id, value) in &cell.values {
            if draft.is_blank(&participant.id, item_id) {
                draft.set(&participant.id, item_id, format_score(*value));
            }
        }
    }

    draft
}
