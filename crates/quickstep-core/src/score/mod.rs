//! Score cells and score-input handling.

mod cell;
pub mod input;

pub use cell::{CellKey, SCORE_MAX, SCORE_MIN, ScoreCell, clamp_score};
