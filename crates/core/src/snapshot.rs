use crate::game_state::ActivePiece;
use crate::transform::Rect;
use crate::types::{
    FieldRotation, PieceKind, BACKGROUND_HEIGHT, BACKGROUND_WIDTH, FIELD_HEIGHT, FIELD_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BombSnapshot {
    pub position: Option<(i32, i32)>,
    pub remaining_block_num: u32,
    pub inventory: u32,
    pub armed: bool,
}

/// Plain copy of everything the view reads
///
/// `background` is the composed view: stored background cells with the
/// field's soft cells projected on top. Rows are indexed by y, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub background: [[u8; BACKGROUND_WIDTH]; BACKGROUND_HEIGHT],
    pub field: [[u8; FIELD_WIDTH]; FIELD_HEIGHT],
    pub center: (i32, i32),
    pub rotation: FieldRotation,
    pub field_rect: Rect,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub teleport_value: u32,
    pub bomb: BombSnapshot,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub tick_count: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.background = [[0u8; BACKGROUND_WIDTH]; BACKGROUND_HEIGHT];
        self.field = [[0u8; FIELD_WIDTH]; FIELD_HEIGHT];
        self.center = (0, 0);
        self.rotation = FieldRotation::Rotate0;
        self.field_rect = Rect {
            x1: 0,
            y1: 0,
            x2: 0,
            y2: 0,
        };
        self.active = None;
        self.next = PieceKind::T;
        self.score = 0;
        self.level = 1;
        self.teleport_value = 0;
        self.bomb = BombSnapshot::default();
        self.paused = false;
        self.game_over = false;
        self.episode_id = 0;
        self.tick_count = 0;
    }

    /// Cell code at background (x, y); 0 when out of range
    pub fn background_code(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= BACKGROUND_WIDTH as i32 || y >= BACKGROUND_HEIGHT as i32 {
            return 0;
        }
        self.background[y as usize][x as usize]
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut snap = Self {
            background: [[0u8; BACKGROUND_WIDTH]; BACKGROUND_HEIGHT],
            field: [[0u8; FIELD_WIDTH]; FIELD_HEIGHT],
            center: (0, 0),
            rotation: FieldRotation::Rotate0,
            field_rect: Rect {
                x1: 0,
                y1: 0,
                x2: 0,
                y2: 0,
            },
            active: None,
            next: PieceKind::T,
            score: 0,
            level: 1,
            teleport_value: 0,
            bomb: BombSnapshot::default(),
            paused: false,
            game_over: false,
            episode_id: 0,
            tick_count: 0,
        };
        snap.clear();
        snap
    }
}
