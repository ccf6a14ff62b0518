//! Pieces module - the fixed piece catalog
//!
//! Pieces never rotate; the field does. Each kind is a static occupancy
//! list measured from the bottom-left corner of its bounding box (y up).

use crate::types::PieceKind;

/// Offset of a single cell relative to the piece anchor
pub type CellOffset = (i8, i8);

/// Immutable shape of a piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    pub kind: PieceKind,
    pub width: i32,
    pub height: i32,
    pub cells: &'static [CellOffset],
}

impl PieceShape {
    /// Whether the bounding-box cell (dx, dy) is occupied
    pub fn is_occupied(&self, dx: i32, dy: i32) -> bool {
        self.cells
            .iter()
            .any(|&(cx, cy)| cx as i32 == dx && cy as i32 == dy)
    }
}

static T: PieceShape = PieceShape {
    kind: PieceKind::T,
    width: 3,
    height: 2,
    cells: &[(0, 0), (1, 0), (2, 0), (1, 1)],
};

static L: PieceShape = PieceShape {
    kind: PieceKind::L,
    width: 3,
    height: 2,
    cells: &[(0, 0), (1, 0), (2, 0), (2, 1)],
};

static L_MIRROR: PieceShape = PieceShape {
    kind: PieceKind::LMirror,
    width: 3,
    height: 2,
    cells: &[(0, 1), (1, 1), (2, 1), (2, 0)],
};

static I: PieceShape = PieceShape {
    kind: PieceKind::I,
    width: 4,
    height: 1,
    cells: &[(0, 0), (1, 0), (2, 0), (3, 0)],
};

static S: PieceShape = PieceShape {
    kind: PieceKind::S,
    width: 2,
    height: 2,
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

static Z: PieceShape = PieceShape {
    kind: PieceKind::Z,
    width: 3,
    height: 2,
    cells: &[(0, 1), (1, 1), (1, 0), (2, 0)],
};

static Z_MIRROR: PieceShape = PieceShape {
    kind: PieceKind::ZMirror,
    width: 3,
    height: 2,
    cells: &[(0, 0), (1, 0), (1, 1), (2, 1)],
};

static BOMB: PieceShape = PieceShape {
    kind: PieceKind::Bomb,
    width: 1,
    height: 1,
    cells: &[(0, 0)],
};

/// Get the shape for a piece kind
pub fn get_shape(kind: PieceKind) -> &'static PieceShape {
    match kind {
        PieceKind::T => &T,
        PieceKind::L => &L,
        PieceKind::LMirror => &L_MIRROR,
        PieceKind::I => &I,
        PieceKind::S => &S,
        PieceKind::Z => &Z,
        PieceKind::ZMirror => &Z_MIRROR,
        PieceKind::Bomb => &BOMB,
    }
}
