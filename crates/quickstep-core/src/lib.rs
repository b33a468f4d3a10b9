pub mod aggregate;
pub mod console;
pub mod draft;
pub mod error;
pub mod lock;
pub mod model;
pub mod rank;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod wire;

pub use aggregate::{Aggregate, Scope, aggregate};
pub use draft::{CategoryDraft, reconcile};
pub use error::{Error, Result};
pub use lock::{LockView, SubmissionAction, SubmissionState, can_edit, incomplete_participants};
pub use model::{Actor, Category, Competition, Judge, Participant, Role, ScoringItem};
pub use rank::{Rank, RankedParticipant, display_sort, rank};
pub use score::{CellKey, SCORE_MAX, SCORE_MIN, ScoreCell, clamp_score};
pub use session::{CategoryProgress, JudgeProgress, ScoringSession, SubmitOutcome};
pub use snapshot::CompetitionSnapshot;
pub use store::ScoreStore;
pub use wire::{JudgeDoc, MemoryWriter, ScoreCellDoc, ScoreWriter, WriteBatch};
