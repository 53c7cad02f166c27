use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::menu::{MenuButton, MenuInput};

/// Player intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Request a new heading
    Steer(Direction),
    /// Pause menu, dialog buttons and close requests
    Menu(MenuInput),
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Menu(MenuInput::Close);
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Pause menu
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::Menu(MenuInput::TogglePause)
            }
            KeyCode::Enter => KeyAction::Menu(MenuInput::Activate(MenuButton::Resume)),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Menu(MenuInput::Activate(MenuButton::Restart))
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                KeyAction::Menu(MenuInput::Activate(MenuButton::Quit))
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                KeyAction::Menu(MenuInput::Activate(MenuButton::Yes))
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                KeyAction::Menu(MenuInput::Activate(MenuButton::No))
            }

            KeyCode::Esc => KeyAction::Menu(MenuInput::Close),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
