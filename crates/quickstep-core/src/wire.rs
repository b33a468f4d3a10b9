//! Document shapes shared with the real-time store collaborator.
//!
//! These shapes are load-bearing: field names, key formats and the
//! ISO-8601 timestamp must stay bit-exact for compatibility with the
//! documents already in production.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::normalize_email;
use crate::score::{CellKey, ScoreCell, clamp_score};

/// One persisted score cell, as stored under
/// `"{categoryId}_{participantId}_{judgeEmailLowercased}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCellDoc {
    pub category_id: String,
    pub participant_id: String,
    /// Lowercased.
    pub judge_email: String,
    /// item id -> score.
    pub values: HashMap<String, f64>,
    /// ISO-8601.
    pub updated_at: DateTime<Utc>,
}

impl ScoreCellDoc {
    pub fn new(key: &CellKey, cell: &ScoreCell, updated_at: DateTime<Utc>) -> Self {
        let values = cell
            .values
            .iter()
            .map(|(item, value)| (item.clone(), clamp_score(*value)))
            .collect();
        Self {
            category_id: key.category_id.clone(),
            participant_id: key.participant_id.clone(),
            judge_email: key.judge_email.clone(),
            values,
            updated_at,
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(&self.category_id, &self.participant_id, &self.judge_email)
    }

    pub fn doc_key(&self) -> String {
        self.key().doc_key()
    }
}

/// One persisted judge record, as stored under
/// `"{competitionId}_{judgeEmailLowercased}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeDoc {
    pub competition_id: String,
    /// Lowercased.
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub submitted_categories: HashMap<String, bool>,
}

impl JudgeDoc {
    pub fn doc_key(&self) -> String {
        format!("{}_{}", self.competition_id, normalize_email(&self.email))
    }
}

/// A submission: N cell documents plus the judge document, applied by the
/// persistence layer as one atomic unit. Partial application (cells without
/// the flag, or vice versa) is a correctness violation on the writer's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteBatch {
    pub cells: Vec<ScoreCellDoc>,
    pub judge: JudgeDoc,
}

impl WriteBatch {
    /// Total documents in the batch: cells plus the judge document.
    pub fn doc_count(&self) -> usize {
        self.cells.len() + 1
    }
}

/// Seam to the persistence layer.
///
/// `commit` must apply the whole batch or none of it; once it is dispatched
/// there is no mid-flight cancellation. Tests and the CLI simulator use
/// [`MemoryWriter`].
pub trait ScoreWriter {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()>;
}

/// In-memory writer: records every committed batch, optionally failing on
/// demand to exercise the revert path.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    committed: Vec<WriteBatch>,
    fail_with: Option<String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail with the given message.
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.fail_with = Some(message.into());
    }

    pub fn committed(&self) -> &[WriteBatch] {
        &self.committed
    }

    pub fn last(&self) -> Option<&WriteBatch> {
        self.committed.last()
    }
}

impl ScoreWriter for MemoryWriter {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> {
        if let Some(message) = self.fail_with.take() {
            return Err(crate::error::Error::Persistence(message));
        }
        self.committed.push(batch.clone());
        Ok(())
    }
}
