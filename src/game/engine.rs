use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    sampler::CellSampler,
    state::{GameOverReason, GameState, Position, Snake},
};
use crate::score::HighScore;

/// What happened during a step besides plain movement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// The snake ate the food and grew
    pub ate_food: bool,
    /// The snake picked up the boost item
    pub picked_boost: bool,
    /// The portal pair appeared this step
    pub portals_opened: bool,
    /// Cell the head was teleported to, if it entered a portal
    pub teleported_to: Option<Position>,
    /// An active boost ran out this step
    pub boost_expired: bool,
}

/// Whether the run goes on after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    GameOver(GameOverReason),
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub outcome: Outcome,
    pub info: StepInfo,
}

impl StepResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self.outcome, Outcome::GameOver(_))
    }
}

/// Movement and collision engine; owns everything that outlives a single run
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    sampler: CellSampler<R>,
    high_score: HighScore,
}

impl GameEngine<StdRng> {
    /// Create an engine seeded from the OS
    pub fn new(config: GameConfig, high_score: HighScore) -> Self {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed, for reproducible runs
    pub fn seeded(config: GameConfig, high_score: HighScore, seed: u64) -> Self {
        Self::with_rng(config, high_score, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, high_score: HighScore, rng: R) -> Self {
        Self {
            sampler: CellSampler::new(&config, rng),
            config,
            high_score,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.get()
    }

    /// Start a fresh run: centred snake heading right, items on distinct free cells
    pub fn reset(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;
        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let mut taken: HashSet<Position> = snake.cells().collect();
        let food = self.place_initial(&mut taken);
        let boost_item = self.place_initial(&mut taken);
        let obstacle = self.place_initial(&mut taken);

        debug!(%food, %boost_item, %obstacle, "New run");
        GameState::new(snake, food, boost_item, obstacle, self.config.grid_size)
    }

    fn place_initial(&mut self, taken: &mut HashSet<Position>) -> Position {
        // A validated config always leaves free interior cells at reset
        let pos = self
            .sampler
            .sample_free_cell(taken)
            .unwrap_or_else(|| Position::new(1, 1));
        taken.insert(pos);
        pos
    }

    /// Advance the run by one tick
    pub fn step(&mut self, state: &mut GameState, action: Action, now: Instant) -> StepResult {
        let mut info = StepInfo::default();

        if let Some(reason) = state.game_over {
            return StepResult {
                outcome: Outcome::GameOver(reason),
                info,
            };
        }

        if let Action::Move(direction) = action {
            state.snake.turn(direction);
        }

        let new_head = state.snake.next_head();

        // The head is never committed onto a wall or onto the body
        if !state.is_in_bounds(new_head) {
            return self.end_run(state, GameOverReason::Wall, info);
        }
        if state.snake.contains(new_head) {
            return self.end_run(state, GameOverReason::SelfCollision, info);
        }

        state.snake.push_head(new_head);

        if new_head == state.food {
            info.ate_food = true;
            state.score += 1;
            self.high_score.record(state.score);
            info!(score = state.score, "Ate the food");

            match self.sampler.sample_free_cell(&state.occupied_cells()) {
                Some(pos) => state.food = pos,
                None => return self.end_run(state, GameOverReason::BoardFilled, info),
            }
        } else if new_head == state.boost_item {
            info.picked_boost = true;
            match self.sampler.sample_free_cell(&state.occupied_cells()) {
                Some(pos) => state.boost_item = pos,
                None => warn!("No free cell for the boost item, leaving it in place"),
            }
            state.boost.activate(now + self.config.boost_duration());
            info!(secs = self.config.boost_duration_secs, "Speed boost");
        } else if new_head == state.obstacle {
            return self.end_run(state, GameOverReason::HazardHit, info);
        }

        if state.portals.is_none() && state.score >= self.config.portal_score_threshold {
            state.portals = self.sampler.place_portal_pair(&state.occupied_cells());
            if let Some(pair) = state.portals {
                info.portals_opened = true;
                info!(a = %pair.a, b = %pair.b, "Portals opened");
            }
        }

        if let Some(exit) = state.portals.and_then(|pair| pair.exit_for(new_head)) {
            state.snake.relocate_head(exit);
            info.teleported_to = Some(exit);

            // Old portal cells are still in the occupied set, so the new pair never reuses them
            state.portals = self.sampler.place_portal_pair(&state.occupied_cells());
            match state.portals {
                Some(pair) => info!(to = %exit, a = %pair.a, b = %pair.b, "Teleported, portals moved"),
                None => warn!(to = %exit, "Teleported, no room to re-place portals"),
            }
        }

        if !info.ate_food {
            state.snake.trim_tail();
        }

        if state.boost.expire(now) {
            info.boost_expired = true;
            info!("Speed boost expired");
        }

        state.steps += 1;

        StepResult {
            outcome: Outcome::Continue,
            info,
        }
    }

    fn end_run(
        &mut self,
        state: &mut GameState,
        reason: GameOverReason,
        info: StepInfo,
    ) -> StepResult {
        state.game_over = Some(reason);
        self.high_score.settle(state.score);
        info!(
            ?reason,
            score = state.score,
            high_score = self.high_score.get(),
            "Game over"
        );

        StepResult {
            outcome: Outcome::GameOver(reason),
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PortalPair;
    use crate::score::MemoryScoreStore;
    use std::time::Duration;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::seeded(config, HighScore::load(MemoryScoreStore::new()), 1234)
    }

    /// 20x20 board, snake [(10,10),(9,10),(8,10)] heading right, items out of the way
    fn scenario_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(10, 10), Direction::Right, 3),
            Position::new(2, 2),
            Position::new(2, 17),
            Position::new(17, 2),
            20,
        )
    }

    fn cells(state: &GameState) -> Vec<Position> {
        state.snake.cells().collect()
    }

    fn assert_sound(state: &GameState) {
        let body = cells(state);
        let unique: HashSet<_> = body.iter().copied().collect();
        assert_eq!(unique.len(), body.len(), "snake overlaps itself: {body:?}");
        assert!(body.iter().all(|p| state.is_in_bounds(*p)));
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(
            cells(&state),
            vec![Position::new(10, 10), Position::new(9, 10), Position::new(8, 10)]
        );
        assert!(state.portals.is_none());
        assert!(!state.boost.is_active());

        let items: HashSet<_> = [state.food, state.boost_item, state.obstacle].into();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|p| !state.snake.contains(*p)));
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert_eq!(result.outcome, Outcome::Continue);
        assert_eq!(result.info, StepInfo::default());
        assert_eq!(
            cells(&state),
            vec![Position::new(11, 10), Position::new(10, 10), Position::new(9, 10)]
        );
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.food = Position::new(11, 10);

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert!(result.info.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert!(!state.snake.contains(state.food));
        assert_ne!(state.food, state.boost_item);
        assert_ne!(state.food, state.obstacle);
        assert_eq!(engine.high_score(), 1);
    }

    #[test]
    fn test_portals_open_at_threshold() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.score = 1;
        state.food = Position::new(11, 10);

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert!(result.info.portals_opened);
        assert_eq!(state.score, 2);
        let pair = state.portals.expect("portal pair should exist");
        assert!(pair.distance() >= 5);
        assert!(!state.snake.contains(pair.a) && !state.snake.contains(pair.b));
        assert!(![state.food, state.boost_item, state.obstacle].contains(&pair.a));
        assert!(![state.food, state.boost_item, state.obstacle].contains(&pair.b));
    }

    #[test]
    fn test_portals_stay_closed_below_threshold() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.food = Position::new(11, 10);

        engine.step(&mut state, Action::Continue, Instant::now());
        assert_eq!(state.score, 1);
        assert!(state.portals.is_none());
    }

    #[test]
    fn test_portal_teleports_head_only() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.score = 2;
        let (a, b) = (Position::new(11, 10), Position::new(4, 15));
        state.portals = Some(PortalPair::new(a, b));

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert_eq!(result.info.teleported_to, Some(b));
        assert_eq!(
            cells(&state),
            vec![b, Position::new(10, 10), Position::new(9, 10)]
        );
        let moved = state.portals.expect("portals should be re-placed");
        assert!(moved.distance() >= 5);
        assert!(!moved.contains(a) && !moved.contains(b));
    }

    #[test]
    fn test_portal_works_from_either_end() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.score = 2;
        let (a, b) = (Position::new(4, 15), Position::new(11, 10));
        state.portals = Some(PortalPair::new(a, b));

        engine.step(&mut state, Action::Continue, Instant::now());
        assert_eq!(state.snake.head(), a);
    }

    #[test]
    fn test_boost_lasts_its_duration() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.boost_item = Position::new(11, 10);
        let start = Instant::now();

        let result = engine.step(&mut state, Action::Continue, start);
        assert!(result.info.picked_boost);
        assert!(state.boost.is_active());
        assert_eq!(state.snake.len(), 3);
        assert_ne!(state.boost_item, Position::new(11, 10));
        assert!(!state.snake.contains(state.boost_item));

        engine.step(&mut state, Action::Continue, start + Duration::from_secs(3));
        assert!(state.boost.is_active());

        let result = engine.step(
            &mut state,
            Action::Continue,
            start + Duration::from_millis(3001),
        );
        assert!(result.info.boost_expired);
        assert!(!state.boost.is_active());
    }

    #[test]
    fn test_obstacle_is_fatal() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.obstacle = Position::new(11, 10);

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert_eq!(result.outcome, Outcome::GameOver(GameOverReason::HazardHit));
        assert!(!state.is_alive());
        // Head went in, tail never trimmed
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_food_wins_over_obstacle() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.food = Position::new(11, 10);
        state.obstacle = Position::new(11, 10);

        let result = engine.step(&mut state, Action::Continue, Instant::now());
        assert_eq!(result.outcome, Outcome::Continue);
        assert!(result.info.ate_food);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 1),
            Position::new(5, 5),
            Position::new(6, 6),
            Position::new(7, 7),
            10,
        );
        let before = cells(&state);

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert_eq!(result.outcome, Outcome::GameOver(GameOverReason::Wall));
        assert_eq!(cells(&state), before);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 4),
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(3, 1),
            10,
        );

        // (6,5) (5,5) (4,5) (3,5)
        engine.step(&mut state, Action::Continue, Instant::now());
        // (6,6) (6,5) (5,5) (4,5)
        engine.step(&mut state, Action::Move(Direction::Down), Instant::now());
        // (5,6) (6,6) (6,5) (5,5)
        engine.step(&mut state, Action::Move(Direction::Left), Instant::now());
        assert!(state.is_alive());

        // (5,5) is still the tail
        let result = engine.step(&mut state, Action::Move(Direction::Up), Instant::now());
        assert_eq!(
            result.outcome,
            Outcome::GameOver(GameOverReason::SelfCollision)
        );
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();

        let result = engine.step(&mut state, Action::Move(Direction::Left), Instant::now());

        assert_eq!(result.outcome, Outcome::Continue);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::default());
        let mut state = scenario_state();
        state.game_over = Some(GameOverReason::Wall);
        let before = state.clone();

        let result = engine.step(&mut state, Action::Continue, Instant::now());

        assert!(result.is_terminal());
        assert_eq!(state, before);
    }

    #[test]
    fn test_high_score_survives_reset() {
        let store = MemoryScoreStore::with_value(1);
        let mut engine = GameEngine::seeded(
            GameConfig::default(),
            HighScore::load(store.clone()),
            5,
        );
        let mut state = scenario_state();
        state.score = 1;
        state.food = Position::new(11, 10);

        engine.step(&mut state, Action::Continue, Instant::now());
        assert_eq!(engine.high_score(), 2);
        assert_eq!(store.value(), Some(2));

        let fresh = engine.reset();
        assert_eq!(fresh.score, 0);
        assert_eq!(engine.high_score(), 2);
    }

    #[test]
    fn test_game_over_flushes_high_score() {
        let store = MemoryScoreStore::with_value(7);
        let mut engine = GameEngine::seeded(
            GameConfig::default(),
            HighScore::load(store.clone()),
            5,
        );
        let mut state = scenario_state();
        state.obstacle = Position::new(11, 10);

        engine.step(&mut state, Action::Continue, Instant::now());
        assert_eq!(store.saves(), 1);
        assert_eq!(store.value(), Some(7));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
        let mut engine = engine(GameConfig::default());
        let mut picker = StdRng::seed_from_u64(99);
        let mut state = engine.reset();
        let mut high = engine.high_score();
        let start = Instant::now();

        for tick in 0..5000u64 {
            let length_before = state.snake.len();
            let previous_direction = state.snake.direction;
            let action = Action::Move(directions[picker.gen_range(0..4)]);
            let now = start + Duration::from_millis(tick * 100);

            let result = engine.step(&mut state, action, now);

            assert!(engine.high_score() >= high);
            high = engine.high_score();
            assert!(high >= state.score);

            if result.is_terminal() {
                state = engine.reset();
                continue;
            }

            assert_sound(&state);
            assert!(!state.snake.direction.is_opposite(previous_direction));
            let grew = usize::from(result.info.ate_food);
            assert_eq!(state.snake.len(), length_before + grew);
            if let Some(pair) = state.portals {
                assert!(pair.distance() >= 5);
                assert!(!state.snake.contains(pair.a) && !state.snake.contains(pair.b));
            }
        }
    }

    #[test]
    fn test_largest_grid_resets_and_moves() {
        let config = GameConfig::new(crate::game::config::MAX_GRID_SIZE);
        assert!(config.validate().is_ok());
        let mut engine = engine(config);
        let mut state = engine.reset();

        assert_eq!(state.snake.head(), Position::new(50, 50));
        state.food = Position::new(2, 2);
        state.boost_item = Position::new(2, 97);
        state.obstacle = Position::new(97, 2);
        let result = engine.step(&mut state, Action::Continue, Instant::now());
        assert!(!result.is_terminal());
        assert_eq!(state.snake.head(), Position::new(51, 50));
    }
}
