//! Random cell selection for items and portals
//!
//! Both samplers draw from the grid interior, leaving a one-cell margin along
//! every edge. Random draws are retried up to a fixed number of attempts; after
//! that the sampler scans the whole interior and picks uniformly among the
//! cells that still qualify, so a crowded board cannot stall a tick.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::config::GameConfig;
use super::state::{PortalPair, Position};

/// Samples interior grid cells subject to exclusion constraints
#[derive(Debug, Clone)]
pub struct CellSampler<R> {
    rng: R,
    grid_size: usize,
    min_portal_distance: i32,
    max_attempts: usize,
}

impl<R: Rng> CellSampler<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            rng,
            grid_size: config.grid_size,
            min_portal_distance: config.portal_min_distance,
            max_attempts: config.sampler_max_attempts,
        }
    }

    /// A uniformly random interior cell
    fn random_interior(&mut self) -> Position {
        let upper = self.grid_size as i32 - 1;
        Position::new(self.rng.gen_range(1..upper), self.rng.gen_range(1..upper))
    }

    fn interior_cells(&self) -> impl Iterator<Item = Position> {
        let upper = self.grid_size as i32 - 1;
        (1..upper).flat_map(move |y| (1..upper).map(move |x| Position::new(x, y)))
    }

    /// Pick an interior cell not in `excluded`, or `None` if every interior cell is taken
    pub fn sample_free_cell(&mut self, excluded: &HashSet<Position>) -> Option<Position> {
        for _ in 0..self.max_attempts {
            let pos = self.random_interior();
            if !excluded.contains(&pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = self
            .interior_cells()
            .filter(|pos| !excluded.contains(pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Pick two free interior cells at least the minimum Manhattan distance apart
    pub fn place_portal_pair(&mut self, excluded: &HashSet<Position>) -> Option<PortalPair> {
        for _ in 0..self.max_attempts {
            let a = self.random_interior();
            let b = self.random_interior();
            if a.manhattan_distance(b) >= self.min_portal_distance
                && !excluded.contains(&a)
                && !excluded.contains(&b)
            {
                return Some(PortalPair::new(a, b));
            }
        }

        let mut free: Vec<Position> = self
            .interior_cells()
            .filter(|pos| !excluded.contains(pos))
            .collect();
        free.shuffle(&mut self.rng);

        for &a in &free {
            let partners: Vec<Position> = free
                .iter()
                .copied()
                .filter(|b| a.manhattan_distance(*b) >= self.min_portal_distance)
                .collect();
            if let Some(&b) = partners.choose(&mut self.rng) {
                return Some(PortalPair::new(a, b));
            }
        }

        None
    }
}
