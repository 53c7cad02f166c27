//! High score persistence
//!
//! The high score is the only value that outlives a run. It is loaded once at
//! startup, written through on every improvement and flushed again when a run
//! ends. Storage problems never reach the player: a missing or unreadable
//! record counts as zero and failed writes are logged and dropped.

pub mod high_score;
pub mod store;

pub use high_score::HighScore;
pub use store::{FileScoreStore, MemoryScoreStore, ScoreStore};
