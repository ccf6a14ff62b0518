//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        // Field movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::MoveRight),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameAction::MoveUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::MoveDown),

        // Field rotation
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::RotateCcw),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(GameAction::RotateCw),

        // Actions
        KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('C') => Some(GameAction::HardDrop),
        KeyCode::Char('v') | KeyCode::Char('V') => Some(GameAction::DecreaseLevel),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(GameAction::ArmBomb),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
///
/// Checked before [`handle_key_event`] so Ctrl-C never reaches the hard drop.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && key.modifiers.contains(KeyModifiers::CONTROL))
}
