//! Authoritative score store.
//!
//! Fed exclusively by the real-time document feed: each update replaces the
//! full value map for one cell key, never a partial merge. Consumers read
//! immutable snapshots; the revision counter lets them tell whether anything
//! changed since they last derived state.

use std::collections::HashMap;

use tracing::debug;

use crate::model::normalize_email;
use crate::score::{CellKey, ScoreCell};
use crate::wire::ScoreCellDoc;

#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    cells: HashMap<CellKey, ScoreCell>,
    revision: u64,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one document from the feed, replacing the whole cell.
    pub fn apply(&mut self, doc: &ScoreCellDoc) {
        let key = doc.key();
        let cell = ScoreCell {
            values: doc.values.clone(),
        };
        debug!("store apply {} ({} values)", key.doc_key(), cell.values.len());
        self.cells.insert(key, cell);
        self.revision += 1;
    }

    /// Apply a whole feed snapshot (initial load).
    pub fn apply_all<'a>(&mut self, docs: impl IntoIterator<Item = &'a ScoreCellDoc>) {
        for doc in docs {
            self.apply(doc);
        }
    }

    /// Bumped on every apply.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, key: &CellKey) -> Option<&ScoreCell> {
        self.cells.get(key)
    }

    /// One judge's committed cell for a participant, if any.
    pub fn judge_cell(
        &self,
        category_id: &str,
        participant_id: &str,
        judge_email: &str,
    ) -> Option<&ScoreCell> {
        self.cells
            .get(&CellKey::new(category_id, participant_id, judge_email))
    }

    /// All committed cells for one category.
    pub fn cells_for_category<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = (&'a CellKey, &'a ScoreCell)> {
        self.cells
            .iter()
            .filter(move |(key, _)| key.category_id == category_id)
    }

    /// Whether any cell exists for the participant (used by the delete-warning
    /// path in the surrounding app).
    pub fn has_scores_for_participant(&self, participant_id: &str) -> bool {
        self.cells
            .keys()
            .any(|key| key.participant_id == participant_id)
    }

    /// Count of participants a judge has scored in a category.
    pub fn scored_participants(&self, category_id: &str, judge_email: &str) -> usize {
        let email = normalize_email(judge_email);
        self.cells
            .iter()
            .filter(|(key, cell)| {
                key.category_id == category_id && key.judge_email == email && !cell.is_empty()
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn doc(category: &str, participant: &str, judge: &str, values: &[(&str, f64)]) -> ScoreCellDoc {
        ScoreCellDoc {
            category_id: category.into(),
            participant_id: participant.into(),
            judge_email: judge.into(),
            values: values
                .iter()
                .map(|(item, value)| (item.to_string(), *value))
                .collect::<HashMap<_, _>>(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_replaces_full_cell() {
        let mut store = ScoreStore::new();
        store.apply(&doc("cat1", "p1", "j@x.y", &[("tech", 7.0), ("art", 6.5)]));
        store.apply(&doc("cat1", "p1", "j@x.y", &[("tech", 8.0)]));

        let cell = store.judge_cell("cat1", "p1", "j@x.y").unwrap();
        assert_eq!(cell.get("tech"), Some(8.0));
        // "art" was dropped by the replacement, not merged.
        assert_eq!(cell.get("art"), None);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_cells_for_category_filters() {
        let mut store = ScoreStore::new();
        store.apply(&doc("cat1", "p1", "j@x.y", &[("tech", 7.0)]));
        store.apply(&doc("cat2", "p2", "j@x.y", &[("tech", 6.0)]));

        assert_eq!(store.cells_for_category("cat1").count(), 1);
        assert_eq!(store.cells_for_category("cat2").count(), 1);
        assert_eq!(store.cells_for_category("cat3").count(), 0);
    }

    #[test]
    fn test_scored_participants_ignores_empty_cells() {
        let mut store = ScoreStore::new();
        store.apply(&doc("cat1", "p1", "j@x.y", &[("tech", 7.0)]));
        store.apply(&doc("cat1", "p2", "j@x.y", &[]));
        store.apply(&doc("cat1", "p3", "other@x.y", &[("tech", 6.0)]));

        assert_eq!(store.scored_participants("cat1", "J@X.Y"), 1);
    }

    #[test]
    fn test_has_scores_for_participant() {
        let mut store = ScoreStore::new();
        assert!(!store.has_scores_for_participant("p1"));
        store.apply(&doc("cat1", "p1", "j@x.y", &[("tech", 7.0)]));
        assert!(store.has_scores_for_participant("p1"));
    }
}
