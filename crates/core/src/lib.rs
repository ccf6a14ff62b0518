//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on UI, terminals, or I/O, making it:
//!
//! - **Deterministic**: Same config and seed produce identical games
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Can run in any environment (terminal, headless, benches)
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size cell grids for the 40x30 background and the 20x10 field
//! - [`transform`]: field <-> background coordinate mapping for the four rotations
//! - [`game_state`]: the session: falling piece, locking, row clears, field motion
//! - [`pieces`]: the seven regular shapes and the 1x1 bomb
//! - [`rng`]: weighted piece generation with a one-ahead preview
//! - [`scoring`]: score, speed level and the teleport (combo) counter
//! - [`bomb`]: bomb countdown, inventory and spawn placement
//! - [`config`]: level table and tunables, with JSON loading behind `serde`
//! - [`snapshot`]: plain copy of the state for renderers and tests
//!
//! # Game Rules
//!
//! - **Gravity** always points down the background. The field rectangle
//!   slides and turns around it; the player steers the field, not the piece.
//! - **Open edge**: the side of the rectangle holding the field's top row.
//!   Pieces spawn just inside it and may cross it freely.
//! - **Soft lock**: a piece resting on the field's floor or on field content
//!   becomes part of the field and turns with it.
//! - **Hard lock**: a piece resting on garbage or the background floor, or
//!   stuck on a closed wall for too long, becomes garbage.
//! - **Rows** clear independently in the field and in the background.
//! - **Bombs** appear around the field, are collected by covering them with
//!   the field, and clear a 3x3 block when dropped.
//!
//! # Example
//!
//! ```
//! use tui_spinfield_core::{GameConfig, GameState};
//! use tui_spinfield_core::types::GameAction;
//!
//! let mut game = GameState::new(GameConfig::default());
//! game.start();
//! assert!(game.active().is_some());
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCcw);
//! assert!(game.apply_action(GameAction::HardDrop));
//!
//! assert!(game.active().is_none());
//! assert_eq!(game.teleport_value(), 10);
//! ```
//!
//! # Timing
//!
//! The core has no clock. The driver calls
//! [`GameState::tick`](game_state::GameState::tick) once per
//! [`gravity_interval_ms`](game_state::GameState::gravity_interval_ms),
//! which follows the current level's `speedTime`.

pub mod bomb;
pub mod config;
pub mod game_state;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod transform;

pub use tui_spinfield_types as types;

// Re-export commonly used types for convenience
pub use bomb::BombState;
pub use config::{default_levels, ConfigError, GameConfig};
pub use game_state::{ActivePiece, FieldPlacement, GameState};
pub use grid::{Background, Field, Grid};
pub use pieces::{get_shape, PieceShape};
pub use rng::{seeded_rng, PieceGenerator};
pub use scoring::{calculate_line_score, Progress};
pub use snapshot::{ActiveSnapshot, BombSnapshot, GameSnapshot};
pub use transform::{background_to_field, field_rect, field_to_background, Rect};
