//! Pause overlay and confirmation dialog
//!
//! The menu is a small state machine that sits in front of the engine. While
//! it is anywhere but [`MenuState::Running`] the snake does not move and
//! steering input is dropped. Transitions are pure; anything that reaches
//! outside the menu (restarting the run, quitting the process) comes back as a
//! [`MenuEffect`] for the caller to carry out.

use serde::Serialize;

/// Action waiting on a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfirmAction {
    Restart,
    Quit,
}

/// Where the menu overlay is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MenuState {
    /// No overlay, the game advances
    #[default]
    Running,
    /// Pause menu showing Resume / Restart / Quit
    Paused,
    /// Pause menu plus a yes/no dialog for the pending action
    Confirm(ConfirmAction),
}

/// On-screen controls of the pause menu and dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Resume,
    Restart,
    Quit,
    Yes,
    No,
}

/// Inputs the menu reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    TogglePause,
    Activate(MenuButton),
    /// Window close / interrupt request
    Close,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    None,
    /// Throw away the run and start a fresh one
    Restart,
    /// End the process
    Quit,
}

impl MenuState {
    pub fn is_paused(&self) -> bool {
        !matches!(self, MenuState::Running)
    }

    /// The action the dialog is asking about, if one is open
    pub fn pending_action(&self) -> Option<ConfirmAction> {
        match self {
            MenuState::Confirm(action) => Some(*action),
            _ => None,
        }
    }

    /// Apply one input, returning the next state and any effect to perform
    pub fn apply(self, input: MenuInput) -> (MenuState, MenuEffect) {
        use MenuButton::*;

        match (self, input) {
            (MenuState::Running, MenuInput::TogglePause) => (MenuState::Paused, MenuEffect::None),
            // Closing mid-game asks first
            (MenuState::Running, MenuInput::Close) => (
                MenuState::Confirm(ConfirmAction::Quit),
                MenuEffect::None,
            ),
            (MenuState::Running, MenuInput::Activate(_)) => (self, MenuEffect::None),

            (MenuState::Paused, MenuInput::TogglePause | MenuInput::Activate(Resume)) => {
                (MenuState::Running, MenuEffect::None)
            }
            (MenuState::Paused, MenuInput::Activate(Restart)) => (
                MenuState::Confirm(ConfirmAction::Restart),
                MenuEffect::None,
            ),
            (MenuState::Paused, MenuInput::Activate(Quit)) => (
                MenuState::Confirm(ConfirmAction::Quit),
                MenuEffect::None,
            ),
            (MenuState::Paused, MenuInput::Activate(Yes | No)) => (self, MenuEffect::None),

            (MenuState::Confirm(ConfirmAction::Restart), MenuInput::Activate(Yes)) => {
                (MenuState::Running, MenuEffect::Restart)
            }
            (MenuState::Confirm(ConfirmAction::Quit), MenuInput::Activate(Yes)) => {
                (self, MenuEffect::Quit)
            }
            (MenuState::Confirm(_), MenuInput::Activate(No)) => {
                (MenuState::Paused, MenuEffect::None)
            }
            // The dialog only answers to Yes / No
            (MenuState::Confirm(_), MenuInput::TogglePause | MenuInput::Activate(_)) => {
                (self, MenuEffect::None)
            }

            // Already paused: closing is immediate
            (MenuState::Paused | MenuState::Confirm(_), MenuInput::Close) => {
                (self, MenuEffect::Quit)
            }
        }
    }
}
