//! Shared types module - data structures and constants
//!
//! This crate defines the plain data types used across the workspace: grid
//! dimensions, cell values, piece kinds, field rotation states, player
//! commands, emitted events, and the tuning table rows. Nothing in here
//! owns game state, so the types are usable from the simulation core, the
//! terminal view, and the input layer alike.
//!
//! Enabling the `serde` feature derives `Serialize`/`Deserialize` on the
//! tuning rows and the enums they reference.
//!
//! # Grid Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BACKGROUND_WIDTH` | 40 | Columns of the fixed background grid |
//! | `BACKGROUND_HEIGHT` | 30 | Rows of the fixed background grid |
//! | `FIELD_WIDTH` | 20 | Columns of the rotatable field |
//! | `FIELD_HEIGHT` | 10 | Rows of the rotatable field |
//!
//! Row 0 is the bottom of either grid; gravity points toward decreasing y.
//!
//! # Examples
//!
//! ```
//! use tui_spinfield_types::{FieldRotation, GameAction, PieceKind, FIELD_WIDTH};
//!
//! let kind = PieceKind::from_str("l_mirror").unwrap();
//! assert_eq!(kind, PieceKind::LMirror);
//!
//! let rotation = FieldRotation::Rotate0.turned(1);
//! assert_eq!(rotation, FieldRotation::Rotate90);
//!
//! let action = GameAction::from_str("rotateCcw").unwrap();
//! assert_eq!(action, GameAction::RotateCcw);
//!
//! assert_eq!(FIELD_WIDTH, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Background grid width in cells (40 columns)
pub const BACKGROUND_WIDTH: usize = 40;

/// Background grid height in cells (30 rows)
pub const BACKGROUND_HEIGHT: usize = 30;

/// Field grid width in cells (20 columns)
pub const FIELD_WIDTH: usize = 20;

/// Field grid height in cells (10 rows)
pub const FIELD_HEIGHT: usize = 10;

/// Default cap on the number of bombs the player may hold.
pub const DEFAULT_BOMB_LIMIT: u32 = 3;

/// Ticks a piece may sit on a side wall before it is force-locked.
pub const DEFAULT_STUCK_LOCK_TICKS: u32 = 3;

/// Repeat interval for held field-move keys (milliseconds).
pub const KEY_REPEAT_MS: u32 = 300;

/// A cell value in either grid.
///
/// The background stores `Empty`, `Locked` and `Bomb`; the field stores
/// `Empty` and `Soft`. Queries that compose the two views may return any of
/// the four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    /// Settled inside the field; moves and rotates with it.
    Soft = 1,
    /// Permanent garbage in the background.
    Locked = 2,
    /// The single bomb pickup.
    Bomb = 3,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Stable numeric code used by snapshots.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Soft),
            2 => Some(Cell::Locked),
            3 => Some(Cell::Bomb),
            _ => None,
        }
    }
}

/// The falling piece kinds
///
/// - **T**: three across, one on top in the middle
/// - **L** / **LMirror**: three across with a corner block
/// - **I**: four across
/// - **S**: the 2x2 block (named S in the tuning tables)
/// - **Z** / **ZMirror**: offset two-by-two steps
/// - **Bomb**: single cell, only spawned when the player arms one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PieceKind {
    T,
    L,
    LMirror,
    I,
    S,
    Z,
    ZMirror,
    Bomb,
}

impl PieceKind {
    /// The seven kinds the weighted generator may produce.
    pub const REGULAR: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::L,
        PieceKind::LMirror,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::ZMirror,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_spinfield_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("T"), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_str("z_mirror"), Some(PieceKind::ZMirror));
    /// assert_eq!(PieceKind::from_str("bomb"), Some(PieceKind::Bomb));
    /// assert_eq!(PieceKind::from_str("o"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "l_mirror" => Some(PieceKind::LMirror),
            "i" => Some(PieceKind::I),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "z_mirror" => Some(PieceKind::ZMirror),
            "bomb" => Some(PieceKind::Bomb),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::LMirror => "l_mirror",
            PieceKind::I => "i",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::ZMirror => "z_mirror",
            PieceKind::Bomb => "bomb",
        }
    }
}

/// Rotation state of the field inside the background
///
/// Turning by +1 rotates the field 90° counter-clockwise:
/// Rotate0 → Rotate90 → Rotate180 → Rotate270 → Rotate0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldRotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl FieldRotation {
    pub const ALL: [FieldRotation; 4] = [
        FieldRotation::Rotate0,
        FieldRotation::Rotate90,
        FieldRotation::Rotate180,
        FieldRotation::Rotate270,
    ];

    /// Quarter-turn index (0..4).
    pub fn index(&self) -> i32 {
        match self {
            FieldRotation::Rotate0 => 0,
            FieldRotation::Rotate90 => 1,
            FieldRotation::Rotate180 => 2,
            FieldRotation::Rotate270 => 3,
        }
    }

    /// Build from any integer, wrapping modulo four.
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => FieldRotation::Rotate0,
            1 => FieldRotation::Rotate90,
            2 => FieldRotation::Rotate180,
            _ => FieldRotation::Rotate270,
        }
    }

    /// Turn by `direction` quarter turns (+1 counter-clockwise, -1 clockwise).
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_spinfield_types::FieldRotation;
    ///
    /// assert_eq!(FieldRotation::Rotate0.turned(-1), FieldRotation::Rotate270);
    /// assert_eq!(FieldRotation::Rotate270.turned(1), FieldRotation::Rotate0);
    /// ```
    pub fn turned(&self, direction: i32) -> Self {
        Self::from_index(self.index() + 4 + direction)
    }

    /// Odd rotations swap the field's width and height in background space.
    pub fn is_sideways(&self) -> bool {
        matches!(self, FieldRotation::Rotate90 | FieldRotation::Rotate270)
    }

    pub fn degrees(&self) -> u16 {
        self.index() as u16 * 90
    }

    /// The edge of the field rectangle that holds the field's top row.
    pub fn open_edge(&self) -> Edge {
        match self {
            FieldRotation::Rotate0 => Edge::Top,
            FieldRotation::Rotate90 => Edge::Left,
            FieldRotation::Rotate180 => Edge::Bottom,
            FieldRotation::Rotate270 => Edge::Right,
        }
    }

    /// Unit vector of the field's local +y axis in background space.
    pub fn up(&self) -> (i32, i32) {
        match self {
            FieldRotation::Rotate0 => (0, 1),
            FieldRotation::Rotate90 => (-1, 0),
            FieldRotation::Rotate180 => (0, -1),
            FieldRotation::Rotate270 => (1, 0),
        }
    }
}

/// A side of the field rectangle, in background orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Player commands
///
/// Field moves translate the whole field by one background cell; the
/// falling piece keeps its position unless the field pushes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Rotate the field a quarter turn counter-clockwise (+1)
    RotateCcw,
    /// Rotate the field a quarter turn clockwise (-1)
    RotateCw,
    /// Drop the falling piece until it locks
    HardDrop,
    /// Replace the next spawn with a bomb from inventory
    ArmBomb,
    /// Pay score to drop one speed level
    DecreaseLevel,
    /// Toggle pause state
    Pause,
    /// Restart the game from the same tuning
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_spinfield_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("armBomb"), Some(GameAction::ArmBomb));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "moveup" => Some(GameAction::MoveUp),
            "movedown" => Some(GameAction::MoveDown),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotatecw" => Some(GameAction::RotateCw),
            "harddrop" => Some(GameAction::HardDrop),
            "armbomb" => Some(GameAction::ArmBomb),
            "decreaselevel" => Some(GameAction::DecreaseLevel),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::RotateCw => "rotateCw",
            GameAction::HardDrop => "hardDrop",
            GameAction::ArmBomb => "armBomb",
            GameAction::DecreaseLevel => "decreaseLevel",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }

    /// Background-space delta for the four move actions.
    pub fn field_delta(&self) -> Option<(i32, i32)> {
        match self {
            GameAction::MoveLeft => Some((-1, 0)),
            GameAction::MoveRight => Some((1, 0)),
            GameAction::MoveUp => Some((0, 1)),
            GameAction::MoveDown => Some((0, -1)),
            _ => None,
        }
    }
}

/// Everything the driver wants applied during one simulation step.
///
/// Applied in field order: move, rotate, arm bomb, decrease level, hard
/// drop; gravity runs afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub move_field: Option<(i32, i32)>,
    /// Quarter turns: 0, +1 or -1.
    pub rotate: i32,
    pub arm_bomb: bool,
    pub decrease_level: bool,
    pub hard_drop: bool,
}

impl TickInput {
    pub fn is_idle(&self) -> bool {
        *self == TickInput::default()
    }
}

/// Audio cue for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A piece locked without clearing anything.
    BlockSolid,
    /// A lock cleared at least one row.
    Eliminate,
    BombPickup,
    BombExplode,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::BlockSolid => "blockSolid",
            SoundCue::Eliminate => "eliminate",
            SoundCue::BombPickup => "bombPickup",
            SoundCue::BombExplode => "bombExplode",
        }
    }
}

/// Discrete events emitted by the simulation, drained by the driver.
///
/// Coordinates are background cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BlockDestroyed { x: i32, y: i32 },
    BombDetonated { x: i32, y: i32 },
    BombSpawned { x: i32, y: i32 },
    BombPickedUp { inventory: u32 },
    PieceLocked { kind: PieceKind, sound: SoundCue },
    LevelChanged { level: u32 },
    GameOver,
}

/// Spawn weight for one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceWeight {
    pub kind: PieceKind,
    pub weight: u32,
}

/// One row of the per-level tuning table.
///
/// `speed_time` is gravity ticks per second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LevelRow {
    pub level: u32,
    /// Combo counter needed to reach this level.
    pub teleport_value: u32,
    pub teleport_value_add: u32,
    pub teleport_value_decrease: u32,
    pub speed_time: f32,
    /// Reward per cleared row.
    pub score: u32,
    /// Price of dropping from this level to the one below.
    pub score_cost: u32,
    /// Field cells to lock before a bomb may appear.
    pub bomb_solid_time: u32,
}

impl LevelRow {
    /// Gravity interval in milliseconds.
    pub fn gravity_interval_ms(&self) -> u32 {
        if self.speed_time <= 0.0 {
            return u32::MAX;
        }
        (1000.0 / self.speed_time).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_input_idle() {
        assert!(TickInput::default().is_idle());
        let input = TickInput {
            rotate: -1,
            ..TickInput::default()
        };
        assert!(!input.is_idle());
    }

    #[test]
    fn test_rotation_turns_wrap() {
        for rotation in FieldRotation::ALL {
            assert_eq!(rotation.turned(1).turned(-1), rotation);
            assert_eq!(rotation.turned(4), rotation);
        }
        assert_eq!(FieldRotation::from_index(-1), FieldRotation::Rotate270);
    }

    #[test]
    fn test_up_points_at_open_edge() {
        // The field's local +y must exit through its open edge.
        for rotation in FieldRotation::ALL {
            let expected = match rotation.open_edge() {
                Edge::Top => (0, 1),
                Edge::Bottom => (0, -1),
                Edge::Left => (-1, 0),
                Edge::Right => (1, 0),
            };
            assert_eq!(rotation.up(), expected);
        }
    }

    #[test]
    fn test_piece_kind_string_roundtrip() {
        for kind in PieceKind::REGULAR {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_str(PieceKind::Bomb.as_str()), Some(PieceKind::Bomb));
    }

    #[test]
    fn test_cell_codes() {
        for cell in [Cell::Empty, Cell::Soft, Cell::Locked, Cell::Bomb] {
            assert_eq!(Cell::from_u8(cell.as_u8()), Some(cell));
        }
        assert_eq!(Cell::from_u8(9), None);
    }

    #[test]
    fn test_gravity_interval() {
        let row = LevelRow {
            level: 1,
            teleport_value: 0,
            teleport_value_add: 10,
            teleport_value_decrease: 1,
            speed_time: 2.0,
            score: 100,
            score_cost: 0,
            bomb_solid_time: 40,
        };
        assert_eq!(row.gravity_interval_ms(), 500);
    }
}
