//! TUI Spinfield (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `tui_spinfield::{core,input,term,types}`.

pub use tui_spinfield_core as core;
pub use tui_spinfield_input as input;
pub use tui_spinfield_term as term;
pub use tui_spinfield_types as types;
