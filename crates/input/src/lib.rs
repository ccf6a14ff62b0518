//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework. Maps `crossterm` key events into
//! [`crate::types::GameAction`] and provides a key-repeat handler for held
//! field moves that also works in terminals without key-release events.

pub mod handler;
pub mod map;

pub use tui_spinfield_types as types;

pub use handler::{Direction, InputHandler};
pub use map::{handle_key_event, should_quit};
