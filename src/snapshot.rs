use serde::Serialize;

use crate::game::{Direction, GameOverReason, GameState, PortalPair, Position};
use crate::menu::{ConfirmAction, MenuState};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub grid_size: usize,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub boosted: bool,
    pub food: Position,
    pub boost_item: Position,
    pub obstacle: Position,
    pub portals: Option<PortalPair>,
    pub score: u32,
    pub high_score: u32,
    pub steps: u32,
    pub menu: MenuState,
    /// Action the confirmation dialog is asking about
    pub pending_confirm: Option<ConfirmAction>,
    pub game_over: Option<GameOverReason>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, menu: MenuState, high_score: u32) -> Self {
        Self {
            grid_size: state.grid_size,
            snake: state.snake.cells().collect(),
            direction: state.snake.direction,
            boosted: state.boost.is_active(),
            food: state.food,
            boost_item: state.boost_item,
            obstacle: state.obstacle,
            portals: state.portals,
            score: state.score,
            high_score,
            steps: state.steps,
            menu,
            pending_confirm: menu.pending_action(),
            game_over: state.game_over,
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
