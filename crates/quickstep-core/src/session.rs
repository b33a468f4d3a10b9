//! Scoring session: the one controller that owns the shared state.
//!
//! Views get read-only snapshots (leaderboards, drafts, progress); mutation
//! goes through a narrow set of command methods (select_category, edit,
//! blur, submit, reopen, lock commands). Store updates and UI commands
//! serialize onto whatever single-threaded context drives this object; the
//! derivation pipeline (reconcile -> aggregate -> rank) is pure and reruns
//! on each event.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::aggregate::{Scope, aggregate};
use crate::draft::{CategoryDraft, reconcile};
use crate::error::{Error, Result};
use crate::lock::{LockView, SubmissionAction, SubmissionState, can_edit, incomplete_participants};
use crate::model::{Actor, Category, Competition, Judge, Participant, normalize_email};
use crate::rank::{RankedParticipant, display_sort, rank};
use crate::score::input;
use crate::snapshot::CompetitionSnapshot;
use crate::store::ScoreStore;
use crate::wire::{JudgeDoc, ScoreCellDoc, ScoreWriter, WriteBatch};

/// Result of a submit attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The batch was written and the submission flag is set.
    Submitted { cells_written: usize },
    /// Some participants are missing scores and the caller did not confirm;
    /// nothing was dispatched.
    Incomplete { missing: Vec<String> },
}

pub struct ScoringSession {
    competition: Competition,
    participants: Vec<Participant>,
    judges: Vec<Judge>,
    actor: Actor,
    store: ScoreStore,
    active_category: Option<String>,
    draft: Option<CategoryDraft>,
    /// Guards against double-submission while a write is in flight.
    in_flight: bool,
}

impl ScoringSession {
    pub fn new(
        competition: Competition,
        participants: Vec<Participant>,
        judges: Vec<Judge>,
        actor: Actor,
    ) -> Self {
        Self {
            competition,
            participants,
            judges,
            actor,
            store: ScoreStore::new(),
            active_category: None,
            draft: None,
            in_flight: false,
        }
    }

    pub fn from_snapshot(snapshot: CompetitionSnapshot) -> Self {
        let mut session = Self::new(
            snapshot.competition,
            snapshot.participants,
            snapshot.judges,
            snapshot.actor,
        );
        session.store.apply_all(&snapshot.scores);
        session
    }

    pub fn competition(&self) -> &Competition {
        &self.competition
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    pub fn draft(&self) -> Option<&CategoryDraft> {
        self.draft.as_ref()
    }

    pub fn judges(&self) -> &[Judge] {
        &self.judges
    }

    /// Participants of one category in display order (bib, then name).
    /// Orphaned participants (category deleted) never show up here.
    pub fn participants_for(&self, category_id: &str) -> Vec<&Participant> {
        let mut list: Vec<&Participant> = self
            .participants
            .iter()
            .filter(|p| p.category_id == category_id)
            .collect();
        list.sort_by(|a, b| a.display_cmp(b));
        list
    }

    fn category(&self, category_id: &str) -> Result<&Category> {
        self.competition
            .category(category_id)
            .ok_or_else(|| Error::UnknownCategory(category_id.to_string()))
    }

    fn judge_for(&self, email: &str) -> Option<&Judge> {
        let email = normalize_email(email);
        self.judges.iter().find(|j| j.email == email)
    }

    /// The lock/submission gate for the current actor on one category.
    pub fn lock_view(&self, category_id: &str) -> Result<LockView> {
        let category = self.category(category_id)?;
        let submitted = self
            .judge_for(&self.actor.email)
            .map(|judge| judge.has_submitted(category_id))
            .unwrap_or(false);
        Ok(LockView {
            competition_locked: self.competition.locked,
            category_locked: category.locked,
            submitted,
        })
    }

    pub fn submission_state(&self, category_id: &str) -> SubmissionState {
        let submitted = self
            .judge_for(&self.actor.email)
            .map(|judge| judge.has_submitted(category_id))
            .unwrap_or(false);
        SubmissionState::from_flag(submitted)
    }

    /// Switch the active category. For a judge this reseeds the draft from
    /// their own committed cells; any unsaved edits for the previous
    /// category are discarded by design.
    pub fn select_category(&mut self, category_id: &str) -> Result<()> {
        self.category(category_id)?;
        let changed = self.active_category.as_deref() != Some(category_id);
        self.active_category = Some(category_id.to_string());

        if self.actor.role.can_score() {
            let participants: Vec<Participant> = self
                .participants_for(category_id)
                .into_iter()
                .cloned()
                .collect();
            self.draft = Some(reconcile(
                category_id,
                &self.actor.email,
                &participants,
                &self.store,
                self.draft.as_ref(),
                changed,
            ));
        } else {
            self.draft = None;
        }
        debug!("selected category {category_id} (changed: {changed})");
        Ok(())
    }

    /// Feed one document from the real-time store. Reconciles the active
    /// draft without touching locally typed keys.
    pub fn on_store_update(&mut self, doc: &ScoreCellDoc) {
        self.store.apply(doc);

        let Some(category_id) = self.active_category.clone() else {
            return;
        };
        if !self.actor.role.can_score() {
            return;
        }
        let participants: Vec<Participant> = self
            .participants_for(&category_id)
            .into_iter()
            .cloned()
            .collect();
        self.draft = Some(reconcile(
            &category_id,
            &self.actor.email,
            &participants,
            &self.store,
            self.draft.as_ref(),
            false,
        ));
    }

    /// Apply a keystroke-level edit to one cell of the active draft.
    ///
    /// Returns the formatted text now in the cell, or `None` when the input
    /// was rejected and the cell kept its previous content.
    pub fn edit(
        &mut self,
        participant_id: &str,
        item_id: &str,
        text: &str,
    ) -> Result<Option<String>> {
        let category_id = self.require_active()?;
        self.ensure_editable(&category_id)?;

        let Some(formatted) = input::accept_typed(text) else {
            return Ok(None);
        };
        let draft = self.draft.as_mut().expect("editable implies draft");
        draft.set(participant_id, item_id, formatted.clone());
        Ok(Some(formatted))
    }

    /// Blur one cell: clamp and auto-complete its content.
    pub fn blur(&mut self, participant_id: &str, item_id: &str) -> Result<Option<String>> {
        let category_id = self.require_active()?;
        self.ensure_editable(&category_id)?;

        let draft = self.draft.as_mut().expect("editable implies draft");
        let Some(current) = draft.get(participant_id, item_id) else {
            return Ok(None);
        };
        match input::finalize(current) {
            Some(finalized) => {
                draft.set(participant_id, item_id, finalized.clone());
                Ok(Some(finalized))
            }
            None => Ok(None),
        }
    }

    /// Submit the active draft: N cell documents plus the judge document as
    /// one atomic batch. With `confirm_incomplete == false` the call returns
    /// [`SubmitOutcome::Incomplete`] instead of dispatching when any
    /// participant is missing scores; the caller re-invokes with `true`
    /// after the judge confirms.
    ///
    /// On a write failure the pair stays in `Draft` and the error carries
    /// the underlying message; nothing is half-applied.
    pub fn submit<W: ScoreWriter>(
        &mut self,
        writer: &mut W,
        confirm_incomplete: bool,
    ) -> Result<SubmitOutcome> {
        let category_id = self.require_active()?;
        self.ensure_editable(&category_id)?;
        if self.in_flight {
            return Err(Error::SubmissionInFlight(category_id));
        }

        let category = self.category(&category_id)?.clone();
        let participants: Vec<Participant> = self
            .participants_for(&category_id)
            .into_iter()
            .cloned()
            .collect();
        let draft = self.draft.as_ref().expect("editable implies draft");

        let missing = incomplete_participants(&category, &participants, draft);
        if !missing.is_empty() && !confirm_incomplete {
            return Ok(SubmitOutcome::Incomplete {
                missing: missing.iter().map(|p| p.name.clone()).collect(),
            });
        }

        let batch = self.build_batch(&category_id, &participants)?;
        let cells_written = batch.cells.len();

        self.in_flight = true;
        let result = writer.commit(&batch);
        self.in_flight = false;

        match result {
            Ok(()) => {
                self.set_submitted_flag(&category_id, true)?;
                info!(
                    "submitted {} cells for category {} as {}",
                    cells_written, category_id, self.actor.email
                );
                Ok(SubmitOutcome::Submitted { cells_written })
            }
            Err(err) => {
                // State reverts to Draft; the flag was never set locally.
                warn!("submit failed for category {category_id}: {err}");
                Err(err)
            }
        }
    }

    /// Reopen a submitted category: flips the flag back, no score mutation.
    /// Editing resumes from the last submitted values.
    pub fn reopen<W: ScoreWriter>(&mut self, writer: &mut W, category_id: &str) -> Result<()> {
        self.category(category_id)?;
        let judge = self
            .judge_for(&self.actor.email)
            .ok_or_else(|| Error::UnknownJudge(self.actor.email.clone()))?;

        let state = SubmissionState::from_flag(judge.has_submitted(category_id));
        if state.apply(SubmissionAction::Reopen) == state {
            return Ok(());
        }

        let mut judge_doc = self.judge_doc(judge);
        judge_doc
            .submitted_categories
            .insert(category_id.to_string(), false);
        writer.commit(&WriteBatch {
            cells: Vec::new(),
            judge: judge_doc,
        })?;
        self.set_submitted_flag(category_id, false)?;
        Ok(())
    }

    /// Ranked view of one category for the current actor.
    ///
    /// A judge looking at their active category ranks their own draft
    /// totals; everyone else (and a judge browsing a category they are not
    /// scoring) sees the all-judges average. Tie markers appear only on
    /// admin views and locked categories, never while a judge is scoring.
    pub fn leaderboard(&self, category_id: &str) -> Result<Vec<RankedParticipant>> {
        let category = self.category(category_id)?;
        let participants: Vec<Participant> = self
            .participants_for(category_id)
            .into_iter()
            .cloned()
            .collect();

        let own_view = self.actor.role.can_score()
            && self.active_category.as_deref() == Some(category_id)
            && self.draft.is_some();

        let (aggregates, mark_ties) = if own_view {
            let draft = self.draft.as_ref().expect("own view implies draft");
            let aggs = aggregate(&participants, category_id, &self.store, Scope::Own { draft });
            (aggs, false)
        } else {
            let aggs = aggregate(
                &participants,
                category_id,
                &self.store,
                Scope::All {
                    judges: &self.judges,
                },
            );
            let mark = self.actor.role.is_admin() || category.locked || self.competition.locked;
            (aggs, mark)
        };

        let mut rows = rank(&participants, &aggregates, mark_ties);
        display_sort(&mut rows);
        Ok(rows)
    }

    /// Admin monitor: per judge and category, submission flag plus how many
    /// participants they have scored.
    pub fn progress(&self) -> Vec<JudgeProgress> {
        let categories = self.competition.sorted_categories();
        self.judges
            .iter()
            .map(|judge| JudgeProgress {
                judge_email: judge.email.clone(),
                judge_name: judge.name.clone(),
                categories: categories
                    .iter()
                    .map(|category| CategoryProgress {
                        category_id: category.id.clone(),
                        category_name: category.name.clone(),
                        submitted: judge.has_submitted(&category.id),
                        scored: self.store.scored_participants(&category.id, &judge.email),
                        participants: self.participants_for(&category.id).len(),
                    })
                    .collect(),
            })
            .collect()
    }

    // Admin lock commands. Locking a competition cascades; unlocking does
    // not. A category cannot be unlocked while its competition is locked.

    pub fn lock_competition(&mut self) -> Result<()> {
        self.require_admin()?;
        self.competition.lock();
        info!("competition {} locked", self.competition.id);
        Ok(())
    }

    pub fn unlock_competition(&mut self) -> Result<()> {
        self.require_admin()?;
        self.competition.unlock();
        Ok(())
    }

    pub fn set_category_locked(&mut self, category_id: &str, locked: bool) -> Result<()> {
        self.require_admin()?;
        self.category(category_id)?;
        if !self.competition.set_category_locked(category_id, locked) {
            return Err(Error::CompetitionLocked(self.competition.id.clone()));
        }
        Ok(())
    }

    fn require_admin(&self) -> Result<()> {
        if self.actor.role.is_admin() {
            Ok(())
        } else {
            Err(Error::Forbidden(self.actor.role.to_string()))
        }
    }

    fn require_active(&self) -> Result<String> {
        self.active_category.clone().ok_or(Error::NoActiveCategory)
    }

    fn ensure_editable(&self, category_id: &str) -> Result<()> {
        // Only judges own cells; admins acting on a judge's behalf are out
        // of scope here.
        if !self.actor.role.can_score() {
            return Err(Error::ReadOnlyActor(self.actor.email.clone()));
        }
        let locks = self.lock_view(category_id)?;
        if can_edit(self.actor.role, &locks) {
            return Ok(());
        }
        if locks.competition_locked {
            return Err(Error::CompetitionLocked(self.competition.id.clone()));
        }
        Err(Error::CategoryLocked {
            category_id: category_id.to_string(),
            judge_email: self.actor.email.clone(),
        })
    }

    fn build_batch(&self, category_id: &str, participants: &[Participant]) -> Result<WriteBatch> {
        let draft = self.draft.as_ref().expect("caller checked draft");
        let judge = self
            .judge_for(&self.actor.email)
            .ok_or_else(|| Error::UnknownJudge(self.actor.email.clone()))?;

        let now = Utc::now();
        let cells = participants
            .iter()
            .map(|participant| {
                let key = crate::score::CellKey::new(category_id, &participant.id, &judge.email);
                ScoreCellDoc::new(&key, &draft.to_cell(&participant.id), now)
            })
            .collect();

        let mut judge_doc = self.judge_doc(judge);
        judge_doc
            .submitted_categories
            .insert(category_id.to_string(), true);

        Ok(WriteBatch {
            cells,
            judge: judge_doc,
        })
    }

    fn judge_doc(&self, judge: &Judge) -> JudgeDoc {
        JudgeDoc {
            competition_id: judge.competition_id.clone(),
            email: judge.email.clone(),
            name: judge.name.clone(),
            submitted_categories: judge.submitted_categories.clone(),
        }
    }

    fn set_submitted_flag(&mut self, category_id: &str, submitted: bool) -> Result<()> {
        let email = normalize_email(&self.actor.email);
        let judge = self
            .judges
            .iter_mut()
            .find(|j| j.email == email)
            .ok_or_else(|| Error::UnknownJudge(email.clone()))?;
        judge.set_submitted(category_id, submitted);
        Ok(())
    }
}

/// One judge's row in the admin progress monitor.
#[derive(Debug, Clone)]
pub struct JudgeProgress {
    pub judge_email: String,
    pub judge_name: String,
    pub categories: Vec<CategoryProgress>,
}

#[derive(Debug, Clone)]
pub struct CategoryProgress {
    pub category_id: String,
    pub category_name: String,
    pub submitted: bool,
    /// Participants this judge has at least one committed value for.
    pub scored: usize,
    pub participants: usize,
}
