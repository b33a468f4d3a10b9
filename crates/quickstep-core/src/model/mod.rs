//! Entities consumed from the surrounding application.
//!
//! The competition tree, participant lists, registered judges and the
//! current actor are supplied by external collaborators; this module defines
//! their shapes and the small amount of behavior the scoring core needs from
//! them (ordering, lock cascade, solo detection, email normalization).

mod competition;
mod judge;
mod participant;
mod role;

pub use competition::{Category, Competition, ScoringItem};
pub use judge::{Judge, normalize_email};
pub use participant::Participant;
pub use role::{Actor, Role};
