//! Core game logic for portal snake
//!
//! This module holds the tick-driven simulation without any terminal or
//! rendering dependencies: grid state, item and portal placement, and the
//! movement and collision engine.

pub mod action;
pub mod config;
pub mod engine;
pub mod sampler;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, Outcome, StepInfo, StepResult};
pub use sampler::CellSampler;
pub use state::{Boost, GameOverReason, GameState, PortalPair, Position, Snake};
