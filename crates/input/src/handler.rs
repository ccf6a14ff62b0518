//! Key-repeat handler for held field moves.
//!
//! A press moves the field once. Holding the key repeats the move every
//! `repeat_ms` after an initial `repeat_ms` delay. The horizontal and
//! vertical axes are tracked separately so diagonal holds work.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameAction, KEY_REPEAT_MS};

/// A held field-move direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn action(self) -> GameAction {
        match self {
            Direction::Left => GameAction::MoveLeft,
            Direction::Right => GameAction::MoveRight,
            Direction::Up => GameAction::MoveUp,
            Direction::Down => GameAction::MoveDown,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Held state of one axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisState {
    held: Option<Direction>,
    delay_timer: u32,
    repeat_accumulator: u32,
}

impl AxisState {
    fn press(&mut self, direction: Direction) -> Option<GameAction> {
        if self.held == Some(direction) {
            return None;
        }
        *self = AxisState {
            held: Some(direction),
            ..AxisState::default()
        };
        Some(direction.action())
    }

    fn release(&mut self, direction: Direction) {
        if self.held == Some(direction) {
            *self = AxisState::default();
        }
    }

    fn update<const N: usize>(
        &mut self,
        elapsed_ms: u32,
        repeat_ms: u32,
        actions: &mut ArrayVec<GameAction, N>,
    ) {
        let Some(direction) = self.held else {
            self.delay_timer = 0;
            self.repeat_accumulator = 0;
            return;
        };

        let prev_delay = self.delay_timer;
        self.delay_timer = self.delay_timer.saturating_add(elapsed_ms);
        if self.delay_timer < repeat_ms {
            return;
        }

        let excess = if prev_delay < repeat_ms {
            self.delay_timer - repeat_ms
        } else {
            elapsed_ms
        };
        self.repeat_accumulator = self.repeat_accumulator.saturating_add(excess);
        while repeat_ms > 0 && self.repeat_accumulator >= repeat_ms {
            let _ = actions.try_push(direction.action());
            self.repeat_accumulator -= repeat_ms;
        }
    }
}

/// Tracks held movement keys and emits repeats.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: AxisState,
    vertical: AxisState,
    last_key_time: Instant,
    repeat_ms: u32,
    key_release_timeout_ms: u32,
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state. OS auto-repeat keeps refreshing it.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl InputHandler {
    pub fn new() -> Self {
        Self::with_repeat_ms(KEY_REPEAT_MS)
    }

    pub fn with_repeat_ms(repeat_ms: u32) -> Self {
        Self {
            horizontal: AxisState::default(),
            vertical: AxisState::default(),
            last_key_time: Instant::now(),
            repeat_ms,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn repeat_ms(&self) -> u32 {
        self.repeat_ms
    }

    /// Register a press; returns the move for a fresh press.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let direction = Direction::from_key(code)?;
        self.last_key_time = Instant::now();
        self.axis_mut(direction).press(direction)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(direction) = Direction::from_key(code) {
            self.axis_mut(direction).release(direction);
        }
    }

    /// Advance timers; returns the repeats that came due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 16> {
        let mut actions = ArrayVec::<GameAction, 16>::new();

        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            self.horizontal = AxisState::default();
            self.vertical = AxisState::default();
        }

        self.horizontal
            .update(elapsed_ms, self.repeat_ms, &mut actions);
        self.vertical.update(elapsed_ms, self.repeat_ms, &mut actions);
        actions
    }

    pub fn held(&self) -> (Option<Direction>, Option<Direction>) {
        (self.horizontal.held, self.vertical.held)
    }

    pub fn reset(&mut self) {
        self.horizontal = AxisState::default();
        self.vertical = AxisState::default();
        self.last_key_time = Instant::now();
    }

    fn axis_mut(&mut self, direction: Direction) -> &mut AxisState {
        if direction.is_horizontal() {
            &mut self.horizontal
        } else {
            &mut self.vertical
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_held_move_repeats_after_delay() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        // Holding the key does not fire again on its own press events.
        assert_eq!(ih.handle_key_press(KeyCode::Char('a')), None);

        assert!(ih.update(299).is_empty());
        // Reaching the delay only starts the repeat clock.
        assert!(ih.update(1).is_empty());

        assert_eq!(ih.update(300).as_slice(), &[GameAction::MoveLeft]);
        assert_eq!(
            ih.update(600).as_slice(),
            &[GameAction::MoveLeft, GameAction::MoveLeft]
        );
    }

    #[test]
    fn test_axes_repeat_independently() {
        let mut ih = InputHandler::with_repeat_ms(100).with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        assert_eq!(ih.handle_key_press(KeyCode::Up), Some(GameAction::MoveUp));
        assert_eq!(ih.held(), (Some(Direction::Right), Some(Direction::Up)));

        let actions = ih.update(200);
        assert_eq!(actions.as_slice(), &[GameAction::MoveRight, GameAction::MoveUp]);

        ih.handle_key_release(KeyCode::Up);
        assert_eq!(ih.update(100).as_slice(), &[GameAction::MoveRight]);
    }

    #[test]
    fn test_opposite_press_replaces_held_direction() {
        let mut ih = InputHandler::with_repeat_ms(100).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(KeyCode::Left);
        ih.update(150);
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        // The delay starts over for the new direction.
        assert!(ih.update(99).is_empty());
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut ih = InputHandler::new();
        ih.key_release_timeout_ms = 50;

        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameAction::MoveDown));
        assert_eq!(ih.held(), (None, Some(Direction::Down)));

        ih.last_key_time = Instant::now() - Duration::from_millis(51);

        assert!(ih.update(0).is_empty());
        assert_eq!(ih.held(), (None, None));
    }

    #[test]
    fn test_non_movement_key_does_not_extend_auto_release_timeout() {
        let mut ih = InputHandler::new();
        ih.key_release_timeout_ms = 50;

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        ih.last_key_time = Instant::now() - Duration::from_millis(51);
        assert_eq!(ih.handle_key_press(KeyCode::Char('z')), None);

        assert!(ih.update(0).is_empty());
        assert_eq!(ih.held(), (None, None));
    }

    #[test]
    fn test_reset_clears_held_state_and_stops_repeats() {
        let mut ih = InputHandler::with_repeat_ms(100).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(KeyCode::Left);
        assert!(!ih.update(500).is_empty(), "expected repeats before reset");

        ih.reset();
        assert!(ih.update(500).is_empty(), "reset should stop repeats");
    }

    #[test]
    fn test_default_repeat_interval() {
        let ih = InputHandler::default();
        assert_eq!(ih.repeat_ms(), KEY_REPEAT_MS);
        assert!(ih.key_release_timeout_ms() > 0);
    }
}
