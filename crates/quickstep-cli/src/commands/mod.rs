pub mod leaderboard;
pub mod progress;
pub mod sheet;
pub mod simulate;
