//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: snapshots are drawn into a
//! plain framebuffer which is then flushed to the terminal. No widget or
//! layout framework is involved.
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Make the view testable by inspecting the framebuffer
//! - Control the aspect ratio precisely (2 columns per background cell)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_spinfield_core as core;
pub use tui_spinfield_types as types;

pub use fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{changed_rows, encode_full_into, encode_rows_into, TerminalRenderer};
