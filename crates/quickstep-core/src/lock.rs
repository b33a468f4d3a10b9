//! Submission state machine and edit permissions.
//!
//! ## State transition rules
//!
//! Per (judge, category):
//! - `Draft -> Submitted` on explicit submit (persists the draft and sets
//!   the judge's submission flag, atomically, elsewhere)
//! - `Submitted -> Draft` on reopen (flag flip only, scores stay)
//!
//! Submit and reopen are idempotent on their target state. Category and
//! competition locks are orthogonal admin flags layered on top; the
//! combined answer is [`can_edit`], used by every mutation path.

use serde::{Deserialize, Serialize};

use crate::draft::CategoryDraft;
use crate::model::{Category, Participant, Role};
use crate::score::input::is_complete;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SubmissionState {
    #[default]
    Draft,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    Submit,
    Reopen,
}

impl SubmissionState {
    pub fn from_flag(submitted: bool) -> Self {
        if submitted { Self::Submitted } else { Self::Draft }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Pure transition function.
    pub fn apply(self, action: SubmissionAction) -> Self {
        match action {
            SubmissionAction::Submit => Self::Submitted,
            SubmissionAction::Reopen => Self::Draft,
        }
    }
}

/// Everything that gates one judge's edit access to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockView {
    pub competition_locked: bool,
    pub category_locked: bool,
    pub submitted: bool,
}

impl LockView {
    pub fn any_lock(&self) -> bool {
        self.competition_locked || self.category_locked || self.submitted
    }
}

/// Whether an actor may mutate a score cell under the given locks.
///
/// Admins are never blocked by the submission flag (the UI still greys out
/// locked competitions for them, but that is presentation, not permission).
/// Spectators and plain users never edit.
pub fn can_edit(role: Role, locks: &LockView) -> bool {
    match role {
        Role::RootAdmin | Role::Admin => true,
        Role::Judge => !locks.any_lock(),
        Role::Spectator | Role::User => false,
    }
}

/// Participants with a missing or incomplete value for any scored item.
///
/// Used for the submit-time warning; the judge may confirm and submit
/// anyway. Items disabled for the category (teamwork in solo categories)
/// are not counted.
pub fn incomplete_participants<'a>(
    category: &Category,
    participants: &'a [Participant],
    draft: &CategoryDraft,
) -> Vec<&'a Participant> {
    let items = category.scored_items();
    participants
        .iter()
        .filter(|participant| {
            items.iter().any(|item| {
                !draft
                    .get(&participant.id, &item.id)
                    .is_some_and(is_complete)
            })
        })
        .collect()
}
