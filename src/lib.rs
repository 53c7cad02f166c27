//! Portal Snake - a grid snake game with speed boosts, hazards and portals
//!
//! This library provides:
//! - Core simulation (game module): state, item/portal placement, tick engine
//! - High score persistence (score module)
//! - Pause menu state machine (menu module) and tick scheduling (scheduler module)
//! - A terminal-free game session and its render snapshot (session, snapshot)
//! - TUI front end (input, render, modes)

pub mod game;
pub mod input;
pub mod menu;
pub mod modes;
pub mod render;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snapshot;
