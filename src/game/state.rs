use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::Instant;

use super::action::Direction;

/// A cell on the game grid; `x` is the column and `y` the row, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The snake: an ordered run of cells with the head at index 0
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    /// Heading applied on the most recent tick
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails straight behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let back = direction.reversed();
        let mut body = VecDeque::with_capacity(length);
        let mut cell = head;

        for _ in 0..length {
            body.push_back(cell);
            cell = cell.moved_in_direction(back);
        }

        Self { body, direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Change heading unless it would reverse onto the neck. Returns whether it changed.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Cell the head would enter on the next tick
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    /// Replace the head cell in place, leaving the rest of the body untouched
    pub(crate) fn relocate_head(&mut self, pos: Position) {
        self.body[0] = pos;
    }

    pub(crate) fn trim_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Two linked teleport cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortalPair {
    pub a: Position,
    pub b: Position,
}

impl PortalPair {
    pub fn new(a: Position, b: Position) -> Self {
        Self { a, b }
    }

    /// Where entering `pos` sends the head, if `pos` is one of the portals
    pub fn exit_for(&self, pos: Position) -> Option<Position> {
        if pos == self.a {
            Some(self.b)
        } else if pos == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos == self.a || pos == self.b
    }

    pub fn distance(&self) -> i32 {
        self.a.manhattan_distance(self.b)
    }
}

/// Timed speed boost; inactive when no expiry is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boost {
    pub expires_at: Option<Instant>,
}

impl Boost {
    pub fn is_active(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn activate(&mut self, expires_at: Instant) {
        self.expires_at = Some(expires_at);
    }

    /// Clear the boost if `now` is past its expiry. Returns true if it just ended.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(expiry) if now > expiry => {
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverReason {
    /// Head left the grid
    Wall,
    /// Head ran into the snake's own body
    SelfCollision,
    /// Head touched the obstacle
    HazardHit,
    /// No free cell was left for the food
    BoardFilled,
}

impl GameOverReason {
    pub fn describe(&self) -> &'static str {
        match self {
            GameOverReason::Wall => "Crashed into the wall",
            GameOverReason::SelfCollision => "Bit your own tail",
            GameOverReason::HazardHit => "Ran into the fire",
            GameOverReason::BoardFilled => "The board is full. You win!",
        }
    }
}

/// Entity state of a single run
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub boost_item: Position,
    pub obstacle: Position,
    pub portals: Option<PortalPair>,
    pub boost: Boost,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
    pub game_over: Option<GameOverReason>,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Position,
        boost_item: Position,
        obstacle: Position,
        grid_size: usize,
    ) -> Self {
        Self {
            snake,
            food,
            boost_item,
            obstacle,
            portals: None,
            boost: Boost::default(),
            grid_size,
            score: 0,
            steps: 0,
            game_over: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.game_over.is_none()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.grid_size as i32;
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    /// Every cell currently taken by the snake, an item, the obstacle or a portal
    pub fn occupied_cells(&self) -> HashSet<Position> {
        let mut cells: HashSet<Position> = self.snake.cells().collect();
        cells.extend([self.food, self.boost_item, self.obstacle]);
        if let Some(pair) = self.portals {
            cells.extend([pair.a, pair.b]);
        }
        cells
    }
}
