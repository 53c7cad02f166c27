//! One player's sitting at the game, independent of any terminal
//!
//! A [`Session`] owns the engine, the current run and the menu. The front end
//! feeds it decoded key actions, calls [`Session::tick`] whenever the wait
//! from [`Session::next_wait`] has elapsed, and draws from
//! [`Session::snapshot`].

use rand::Rng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::game::{Action, Direction, GameEngine, GameState, StepResult};
use crate::input::KeyAction;
use crate::menu::{MenuButton, MenuEffect, MenuInput, MenuState};
use crate::scheduler::TickScheduler;
use crate::snapshot::RenderSnapshot;

/// Whether the main loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Session<R = StdRng> {
    engine: GameEngine<R>,
    state: GameState,
    menu: MenuState,
    scheduler: TickScheduler,
    pending_direction: Option<Direction>,
}

impl<R: Rng> Session<R> {
    pub fn new(mut engine: GameEngine<R>) -> Self {
        let state = engine.reset();
        let scheduler = TickScheduler::new(engine.config());

        Self {
            engine,
            state,
            menu: MenuState::Running,
            scheduler,
            pending_direction: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    pub fn high_score(&self) -> u32 {
        self.engine.high_score()
    }

    /// Apply one decoded key press
    pub fn handle(&mut self, action: KeyAction) -> Control {
        match action {
            KeyAction::Steer(direction) => {
                self.steer(direction);
                Control::Continue
            }
            KeyAction::Menu(input) if !self.state.is_alive() => self.handle_game_over(input),
            KeyAction::Menu(input) => self.handle_menu(input),
            KeyAction::None => Control::Continue,
        }
    }

    fn steer(&mut self, direction: Direction) {
        if self.menu.is_paused() || !self.state.is_alive() {
            return;
        }
        // Reversals are dropped here so the engine never sees one
        if self.state.snake.direction.is_opposite(direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    fn handle_menu(&mut self, input: MenuInput) -> Control {
        let (next, effect) = self.menu.apply(input);
        if next != self.menu {
            debug!(from = ?self.menu, to = ?next, "Menu transition");
            if !self.menu.is_paused() {
                info!("Paused");
            } else if !next.is_paused() {
                info!("Resumed");
            }
        }
        self.menu = next;

        match effect {
            MenuEffect::None => Control::Continue,
            MenuEffect::Restart => {
                self.restart();
                Control::Continue
            }
            MenuEffect::Quit => {
                info!(score = self.state.score, "Quit");
                Control::Quit
            }
        }
    }

    fn handle_game_over(&mut self, input: MenuInput) -> Control {
        match input {
            MenuInput::Activate(MenuButton::Restart | MenuButton::Resume) => {
                self.restart();
                Control::Continue
            }
            MenuInput::Activate(MenuButton::Quit) | MenuInput::Close => Control::Quit,
            _ => Control::Continue,
        }
    }

    /// Drop the current run and start a fresh one
    pub fn restart(&mut self) {
        self.state = self.engine.reset();
        self.menu = MenuState::Running;
        self.pending_direction = None;
        info!("Restarted");
    }

    /// Advance the run once, unless paused or over
    pub fn tick(&mut self, now: Instant) -> Option<StepResult> {
        if self.menu.is_paused() || !self.state.is_alive() {
            return None;
        }

        let action = Action::from(self.pending_direction.take());
        Some(self.engine.step(&mut self.state, action, now))
    }

    /// How long to wait before the next call to [`Session::tick`]
    pub fn next_wait(&self) -> Duration {
        let overlay = self.menu.is_paused() || !self.state.is_alive();
        self.scheduler.interval(overlay, self.state.boost.is_active())
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, self.menu, self.engine.high_score())
    }
}
