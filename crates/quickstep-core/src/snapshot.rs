//! Full consumed input as one loadable document.
//!
//! The surrounding application owns competitions, participants and judges;
//! this is the shape in which it hands them (plus the current score feed
//! state and the authenticated actor) to the scoring core. The CLI loads it
//! from a JSON file; tests build it in memory.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::model::{Actor, Competition, Judge, Participant};
use crate::wire::ScoreCellDoc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSnapshot {
    pub competition: Competition,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub judges: Vec<Judge>,
    #[serde(default)]
    pub scores: Vec<ScoreCellDoc>,
    pub actor: Actor,
}

impl CompetitionSnapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        snapshot.log_stale_references();
        Ok(snapshot)
    }

    /// Orphaned data is tolerated, never fatal: a participant or cell whose
    /// category has been deleted is excluded from categorized views further
    /// down, and only logged here.
    fn log_stale_references(&self) {
        for participant in &self.participants {
            if self.competition.category(&participant.category_id).is_none() {
                warn!(
                    "participant {} references missing category {}",
                    participant.id, participant.category_id
                );
            }
        }
        for doc in &self.scores {
            if self.competition.category(&doc.category_id).is_none() {
                warn!(
                    "score cell {} references missing category {}",
                    doc.doc_key(),
                    doc.category_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use std::io::Write;

    #[test]
    fn test_load_from_json_file() {
        let json = r#"{
            "competition": {
                "id": "comp1",
                "name": "City Open",
                "locked": false,
                "categories": [
                    {
                        "id": "cat1",
                        "name": "Salsa Couple",
                        "order": 0,
                        "items": [
                            {"id": "tech", "label": "Technique", "order": 0},
                            {"id": "art", "label": "Artistry", "order": 1}
                        ]
                    }
                ]
            },
            "participants": [
                {"id": "p1", "categoryId": "cat1", "number": "12", "name": "Ana & Luis"}
            ],
            "judges": [
                {
                    "email": "j@x.y",
                    "competitionId": "comp1",
                    "name": "J",
                    "submittedCategories": {"cat1": true}
                }
            ],
            "scores": [
                {
                    "categoryId": "cat1",
                    "participantId": "p1",
                    "judgeEmail": "j@x.y",
                    "values": {"tech": 7.5},
                    "updatedAt": "2026-05-17T14:30:00Z"
                }
            ],
            "actor": {"email": "j@x.y", "role": "JUDGE"}
        }"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snapshot = CompetitionSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.competition.categories.len(), 1);
        assert_eq!(snapshot.participants[0].number, "12");
        assert!(snapshot.judges[0].has_submitted("cat1"));
        assert_eq!(snapshot.scores[0].values["tech"], 7.5);
        assert_eq!(snapshot.actor.role, Role::Judge);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(CompetitionSnapshot::load(file.path()).is_err());
    }
}
