use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid the board and the terminal renderer are sized for
pub const MAX_GRID_SIZE: usize = 100;
/// Slowest and fastest tick rates accepted, in Hz
pub const MIN_TICK_RATE: f64 = 0.1;
pub const MAX_TICK_RATE: f64 = 1000.0;
/// Longest speed boost accepted, in seconds
pub const MAX_BOOST_SECS: f64 = 3600.0;

/// Configuration for a game of portal snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// Length of the snake at the start of a run
    pub initial_snake_length: usize,

    /// Seconds a speed boost lasts once picked up
    pub boost_duration_secs: f64,
    /// Score at which the portal pair first appears
    pub portal_score_threshold: u32,
    /// Minimum Manhattan distance between the two portal cells
    pub portal_min_distance: i32,

    /// Ticks per second while running normally
    pub normal_tick_rate: f64,
    /// Ticks per second while a boost is active
    pub boosted_tick_rate: f64,
    /// Ticks per second while a menu or the game over screen is shown
    pub menu_tick_rate: f64,

    /// Random draws the sampler makes before falling back to a full scan
    pub sampler_max_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            boost_duration_secs: 3.0,
            portal_score_threshold: 2,
            portal_min_distance: 5,
            normal_tick_rate: 5.0,
            boosted_tick_rate: 10.0,
            menu_tick_rate: 30.0,
            sampler_max_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        Ok(config)
    }

    /// Check that the parameters describe a playable game
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (8..=MAX_GRID_SIZE).contains(&self.grid_size),
            "grid_size must be between 8 and {}, got {}",
            MAX_GRID_SIZE,
            self.grid_size
        );
        ensure!(
            self.initial_snake_length >= 3 && self.initial_snake_length <= self.grid_size / 2,
            "initial_snake_length must be between 3 and {}, got {}",
            self.grid_size / 2,
            self.initial_snake_length
        );
        ensure!(
            self.boost_duration_secs.is_finite()
                && self.boost_duration_secs > 0.0
                && self.boost_duration_secs <= MAX_BOOST_SECS,
            "boost_duration_secs must be in (0, {}], got {}",
            MAX_BOOST_SECS,
            self.boost_duration_secs
        );
        ensure!(
            self.portal_min_distance >= 1
                && self.portal_min_distance <= 2 * (self.grid_size as i32 - 3),
            "portal_min_distance must be between 1 and {}, got {}",
            2 * (self.grid_size as i32 - 3),
            self.portal_min_distance
        );
        for (name, rate) in [
            ("normal_tick_rate", self.normal_tick_rate),
            ("boosted_tick_rate", self.boosted_tick_rate),
            ("menu_tick_rate", self.menu_tick_rate),
        ] {
            ensure!(
                (MIN_TICK_RATE..=MAX_TICK_RATE).contains(&rate),
                "{} must be between {} and {} Hz, got {}",
                name,
                MIN_TICK_RATE,
                MAX_TICK_RATE,
                rate
            );
        }
        ensure!(
            self.boosted_tick_rate > self.normal_tick_rate,
            "boosted_tick_rate ({}) must exceed normal_tick_rate ({})",
            self.boosted_tick_rate,
            self.normal_tick_rate
        );
        ensure!(self.sampler_max_attempts > 0, "sampler_max_attempts must be positive");
        Ok(())
    }

    /// Boost length; out of range values are clamped rather than trusted
    pub fn boost_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.boost_duration_secs.clamp(0.0, MAX_BOOST_SECS))
            .unwrap_or_default()
    }
}
