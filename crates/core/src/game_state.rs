//! Game state module - the rotating-field simulation
//!
//! Ties together the two grids, the field placement, the falling piece, the
//! weighted generator, progress and the bomb. Every public command either
//! commits completely or leaves the state untouched.
//!
//! Gravity always points to background -y. The field is what turns: a
//! piece spawns at the field's open edge and settles either on the field
//! (becoming `Soft`) or on garbage and the background floor (becoming
//! `Locked`). Field translation and rotation live in [`field_motion`].

mod field_motion;

use arrayvec::ArrayVec;
use log::{debug, info};
use rand_pcg::Pcg32;

use crate::bomb::{sample_bomb_position, BombState};
use crate::config::GameConfig;
use crate::grid::{Background, Field};
use crate::pieces::{get_shape, PieceShape};
use crate::rng::{seeded_rng, PieceGenerator};
use crate::scoring::Progress;
use crate::snapshot::{ActiveSnapshot, BombSnapshot, GameSnapshot};
use crate::transform::{background_to_field, field_rect, field_to_background, in_field, Rect};
use crate::types::*;

/// Longest side of any piece; bounds the rows one lock can touch.
const MAX_PIECE_SPAN: usize = 4;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Bottom-left corner of the bounding box, background cells
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }

    pub fn shape(&self) -> &'static PieceShape {
        get_shape(self.kind)
    }

    /// Background cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.shape()
            .cells
            .iter()
            .map(move |&(dx, dy)| (x + dx as i32, y + dy as i32))
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Bounding box in background cells
    pub fn bounds(&self) -> Rect {
        let shape = self.shape();
        Rect {
            x1: self.x,
            y1: self.y,
            x2: self.x + shape.width,
            y2: self.y + shape.height,
        }
    }
}

/// Where the field sits inside the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPlacement {
    pub center: (i32, i32),
    pub rotation: FieldRotation,
}

impl Default for FieldPlacement {
    fn default() -> Self {
        Self {
            center: (BACKGROUND_WIDTH as i32 / 2, BACKGROUND_HEIGHT as i32 / 2),
            rotation: FieldRotation::Rotate0,
        }
    }
}

impl FieldPlacement {
    pub fn rect(&self) -> Rect {
        field_rect(self.rotation, self.center)
    }

    pub fn to_background(&self, x: i32, y: i32) -> (i32, i32) {
        field_to_background(x, y, self.rotation, self.center)
    }

    pub fn to_field(&self, bx: i32, by: i32) -> (i32, i32) {
        background_to_field(bx, by, self.rotation, self.center)
    }
}

/// Outcome of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fall {
    Advance,
    /// Resting on the outside of a wall
    Blocked,
    Lock(LockKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockKind {
    /// Settles into the background as garbage
    Hard,
    /// Settles into the field
    Soft,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    background: Background,
    field: Field,
    placement: FieldPlacement,
    active: Option<ActivePiece>,
    rng: Pcg32,
    generator: PieceGenerator,
    progress: Progress,
    bomb: BombState,
    /// Consecutive gravity steps spent resting on a side wall
    blocked_ticks: u32,
    events: Vec<GameEvent>,
    sounds: Vec<SoundCue>,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    tick_count: u32,
    paused: bool,
    game_over: bool,
}

impl GameState {
    /// Create a new game from a validated config
    pub fn new(config: GameConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "GameState needs a validated config");

        let mut rng = seeded_rng(config.seed);
        let generator = PieceGenerator::new(&config.weights, &mut rng);
        let bomb = BombState::new(config.level_row(1).bomb_solid_time);

        Self {
            config,
            background: Background::new(),
            field: Field::new(),
            placement: FieldPlacement::default(),
            active: None,
            rng,
            generator,
            progress: Progress::default(),
            bomb,
            blocked_ticks: 0,
            events: Vec::new(),
            sounds: Vec::new(),
            episode_id: 0,
            tick_count: 0,
            paused: false,
            game_over: false,
        }
    }

    /// Spawn the first piece right away instead of on the first tick
    pub fn start(&mut self) {
        if self.active.is_none() && !self.game_over {
            self.spawn_piece();
        }
    }

    /// Start over from the same config
    pub fn restart(&mut self) {
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(self.config.clone());
        self.episode_id = next_episode;
        self.start();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    /// Current combo counter
    pub fn teleport_value(&self) -> u32 {
        self.progress.teleport_value()
    }

    pub fn level_row(&self) -> &LevelRow {
        self.config.level_row(self.progress.level())
    }

    /// Milliseconds between gravity ticks at the current level
    pub fn gravity_interval_ms(&self) -> u32 {
        self.level_row().gravity_interval_ms()
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Kind of the next spawn; a bomb once one is armed
    pub fn next_kind(&self) -> PieceKind {
        if self.bomb.armed {
            PieceKind::Bomb
        } else {
            self.generator.peek()
        }
    }

    pub fn placement(&self) -> FieldPlacement {
        self.placement
    }

    pub fn rotation(&self) -> FieldRotation {
        self.placement.rotation
    }

    pub fn center(&self) -> (i32, i32) {
        self.placement.center
    }

    /// Background rectangle covered by the field
    pub fn field_rect(&self) -> Rect {
        self.placement.rect()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn bomb(&self) -> BombState {
        self.bomb
    }

    pub fn bomb_inventory(&self) -> u32 {
        self.bomb.inventory
    }

    /// Cell at background (x, y) with the field projected on top
    /// Returns None if out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let stored = self.background.get(x, y)?;
        if stored != Cell::Empty {
            return Some(stored);
        }
        Some(self.field_cell_at(x, y).unwrap_or(Cell::Empty))
    }

    /// Field cell at field-local (x, y)
    pub fn field_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.field.get(x, y)
    }

    /// Field cell under background (x, y), if the field covers it
    fn field_cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.field_rect().contains(x, y) {
            return None;
        }
        let (fx, fy) = self.placement.to_field(x, y);
        self.field.get(fx, fy)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Take every sound cue emitted since the last drain
    pub fn drain_sounds(&mut self) -> std::vec::Drain<'_, SoundCue> {
        self.sounds.drain(..)
    }

    #[cfg(test)]
    pub(crate) fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Option<ActivePiece>) {
        self.active = piece;
    }

    #[cfg(test)]
    pub(crate) fn give_bombs(&mut self, count: u32) {
        self.bomb.inventory = count;
    }

    #[cfg(test)]
    pub(crate) fn place_bomb(&mut self, x: i32, y: i32) {
        self.background.set(x, y, Cell::Bomb);
        self.bomb.position = Some((x, y));
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.background.write_codes(&mut out.background);
        self.field.write_codes(&mut out.field);
        for fy in 0..FIELD_HEIGHT as i32 {
            for fx in 0..FIELD_WIDTH as i32 {
                if self.field.is(fx, fy, Cell::Soft) {
                    let (bx, by) = self.placement.to_background(fx, fy);
                    if let Some(row) = out.background.get_mut(by as usize) {
                        if let Some(code) = row.get_mut(bx as usize) {
                            *code = Cell::Soft.as_u8();
                        }
                    }
                }
            }
        }

        out.center = self.placement.center;
        out.rotation = self.placement.rotation;
        out.field_rect = self.field_rect();
        out.active = self.active.map(ActiveSnapshot::from);
        out.next = self.next_kind();
        out.score = self.progress.score();
        out.level = self.progress.level();
        out.teleport_value = self.progress.teleport_value();
        out.bomb = BombSnapshot {
            position: self.bomb.position,
            remaining_block_num: self.bomb.remaining_block_num,
            inventory: self.bomb.inventory,
            armed: self.bomb.armed,
        };
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
        out.tick_count = self.tick_count;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Spawn the next piece at the field's open edge
    ///
    /// Returns false when no valid position exists; the controller then
    /// stays empty until a later tick.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let from_inventory = self.bomb.armed;
        let kind = if from_inventory {
            PieceKind::Bomb
        } else {
            self.generator.draw(&mut self.rng)
        };

        let (x, y) = self.spawn_anchor(kind);
        self.active = Some(ActivePiece::new(kind, x, y));
        self.blocked_ticks = 0;

        if !self.adjust_active_piece() {
            debug!("no room to spawn {} at ({x}, {y})", kind.as_str());
            self.active = None;
            return false;
        }

        if from_inventory {
            self.bomb.armed = false;
        }
        self.check_bomb_pickup();
        true
    }

    /// Anchor that places `kind` just inside the field's open edge
    fn spawn_anchor(&self, kind: PieceKind) -> (i32, i32) {
        let shape = get_shape(kind);
        let rect = self.field_rect();
        let centered_x = self.placement.center.0 - shape.width / 2;
        match self.placement.rotation {
            FieldRotation::Rotate0 => (centered_x, rect.y2 - shape.height),
            FieldRotation::Rotate90 => (rect.x1, rect.y2 - shape.height),
            FieldRotation::Rotate180 => (centered_x, rect.y1),
            FieldRotation::Rotate270 => (rect.x2 - shape.width, rect.y2 - shape.height),
        }
    }

    /// Classify one gravity step of `piece`
    fn classify_fall(&self, piece: &ActivePiece) -> Fall {
        let rect = self.field_rect();
        let open = self.placement.rotation.open_edge();
        let mut soft = false;
        let mut blocked = false;

        for (x, y) in piece.cells() {
            let below = y - 1;
            if below < 0
                || matches!(self.background.get(x, below), Some(Cell::Locked | Cell::Bomb))
            {
                return Fall::Lock(LockKind::Hard);
            }

            let in_columns = x >= rect.x1 && x < rect.x2;
            // Inner side of the bottom edge: a floor unless it is the open edge.
            if in_columns && y == rect.y1 && open != Edge::Bottom {
                soft = true;
            }
            // Outer side of the top edge: a wall unless it is the open edge.
            if in_columns && y == rect.y2 && open != Edge::Top {
                blocked = true;
            }
            if self.field_cell_at(x, below) == Some(Cell::Soft) {
                soft = true;
            }
        }

        // A closed wall holds the piece outside even with field content under it.
        if blocked {
            Fall::Blocked
        } else if soft {
            Fall::Lock(LockKind::Soft)
        } else {
            Fall::Advance
        }
    }

    /// Apply one gravity step to the active piece
    /// Returns true if the piece locked
    fn step_active(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };

        match self.classify_fall(&piece) {
            Fall::Advance => {
                self.active = Some(piece.shifted(0, -1));
                self.blocked_ticks = 0;
                false
            }
            Fall::Blocked => {
                self.blocked_ticks += 1;
                if self.blocked_ticks > self.config.stuck_lock_ticks {
                    self.lock_active(LockKind::Hard);
                    true
                } else {
                    false
                }
            }
            Fall::Lock(kind) => {
                self.lock_active(kind);
                true
            }
        }
    }

    fn lock_active(&mut self, kind: LockKind) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.blocked_ticks = 0;

        if piece.kind == PieceKind::Bomb {
            self.detonate(piece.x, piece.y);
            return;
        }

        let rect = self.field_rect();
        if kind == LockKind::Soft && piece.cells().any(|(x, y)| !rect.contains(x, y)) {
            self.set_game_over();
            return;
        }

        // Cells inside the rectangle always go to the field so garbage never
        // ends up under it.
        let mut field_rows: ArrayVec<usize, MAX_PIECE_SPAN> = ArrayVec::new();
        let mut background_rows: ArrayVec<usize, MAX_PIECE_SPAN> = ArrayVec::new();
        let mut field_cells = 0u32;
        for (x, y) in piece.cells() {
            if rect.contains(x, y) {
                let (fx, fy) = self.placement.to_field(x, y);
                if in_field(fx, fy) && self.field.set(fx, fy, Cell::Soft) {
                    field_cells += 1;
                    push_row(&mut field_rows, fy as usize);
                }
            } else if self.background.set(x, y, Cell::Locked) {
                push_row(&mut background_rows, y as usize);
            }
        }

        let lines = self.clear_field_rows(&field_rows) + self.clear_background_rows(&background_rows);
        if lines > 0 {
            self.progress.award_lines(lines, &self.config);
        }
        self.bomb.count_down(field_cells);

        let sound = if lines > 0 {
            SoundCue::Eliminate
        } else {
            SoundCue::BlockSolid
        };
        self.sounds.push(sound);
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind,
            sound,
        });

        self.maybe_spawn_bomb();
    }

    fn clear_field_rows(&mut self, rows: &[usize]) -> usize {
        let cleared = self.field.clear_full_rows(rows, Cell::Soft);
        for &row in &cleared {
            for x in 0..FIELD_WIDTH as i32 {
                let (bx, by) = self.placement.to_background(x, row as i32);
                self.events.push(GameEvent::BlockDestroyed { x: bx, y: by });
            }
        }
        cleared.len()
    }

    fn clear_background_rows(&mut self, rows: &[usize]) -> usize {
        let cleared = self.background.clear_full_rows(rows, Cell::Locked);
        for &row in &cleared {
            let row = row as i32;
            for x in 0..BACKGROUND_WIDTH as i32 {
                self.events.push(GameEvent::BlockDestroyed { x, y: row });
            }
            // Everything above the row fell by one; the field and the bomb
            // fall with it.
            if self.field_rect().y1 > row {
                self.placement.center.1 -= 1;
            }
            if let Some((bx, by)) = self.bomb.position {
                if by > row {
                    self.bomb.position = Some((bx, by - 1));
                }
            }
        }
        cleared.len()
    }

    /// Clear the 3x3 block around (cx, cy) in whichever grid owns each cell
    fn detonate(&mut self, cx: i32, cy: i32) {
        let rect = self.field_rect();
        for y in cy - 1..=cy + 1 {
            for x in cx - 1..=cx + 1 {
                let cleared = if rect.contains(x, y) {
                    let (fx, fy) = self.placement.to_field(x, y);
                    self.field.is(fx, fy, Cell::Soft) && self.field.set(fx, fy, Cell::Empty)
                } else {
                    self.background.is(x, y, Cell::Locked)
                        && self.background.set(x, y, Cell::Empty)
                };
                if cleared {
                    self.events.push(GameEvent::BlockDestroyed { x, y });
                }
            }
        }
        debug!("bomb detonated at ({cx}, {cy})");
        self.events.push(GameEvent::BombDetonated { x: cx, y: cy });
        self.sounds.push(SoundCue::BombExplode);
    }

    /// Pick up the bomb if the field now covers it
    fn check_bomb_pickup(&mut self) {
        let Some((x, y)) = self.bomb.position else {
            return;
        };
        if !self.field_rect().contains(x, y) {
            return;
        }
        self.background.set(x, y, Cell::Empty);
        let reset_to = self.level_row().bomb_solid_time;
        self.bomb.pick_up(reset_to);
        self.events.push(GameEvent::BombPickedUp {
            inventory: self.bomb.inventory,
        });
        self.sounds.push(SoundCue::BombPickup);
    }

    fn maybe_spawn_bomb(&mut self) {
        if !self.bomb.ready_to_spawn(self.config.bomb_limit) {
            return;
        }

        let rect = self.field_rect();
        let background = &self.background;
        let active = self.active;
        let spot = sample_bomb_position(
            rect,
            self.config.bomb_min_distance,
            self.config.bomb_spawn_band,
            &mut self.rng,
            |x, y| {
                background.is(x, y, Cell::Empty)
                    && !active.is_some_and(|piece| piece.cells().any(|c| c == (x, y)))
            },
        );

        if let Some((x, y)) = spot {
            self.background.set(x, y, Cell::Bomb);
            self.bomb.position = Some((x, y));
            debug!("bomb placed at ({x}, {y})");
            self.events.push(GameEvent::BombSpawned { x, y });
        }
    }

    fn set_game_over(&mut self) {
        self.game_over = true;
        self.active = None;
        info!(
            "game over: score {} at level {}",
            self.progress.score(),
            self.progress.level()
        );
        self.events.push(GameEvent::GameOver);
    }

    fn on_level_changed(&mut self, level: u32) {
        info!("speed level now {level}");
        self.events.push(GameEvent::LevelChanged { level });
    }

    /// Advance the simulation by one gravity step
    ///
    /// Spawns a piece when none is falling. Returns true if a piece locked.
    pub fn tick(&mut self) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(level) = self.progress.decay(&self.config) {
            self.on_level_changed(level);
        }

        let locked = if self.active.is_some() {
            self.step_active()
        } else {
            self.spawn_piece();
            false
        };
        self.maybe_spawn_bomb();
        locked
    }

    /// Apply one step of driver input, then tick
    pub fn tick_with(&mut self, input: &TickInput) -> bool {
        if input.is_idle() {
            return self.tick();
        }
        if let Some((dx, dy)) = input.move_field {
            self.move_field(dx, dy);
        }
        if input.rotate != 0 {
            self.rotate_field(input.rotate.signum());
        }
        if input.arm_bomb {
            self.arm_bomb();
        }
        if input.decrease_level {
            self.decrease_level();
        }
        if input.hard_drop {
            self.hard_drop();
        }
        self.tick()
    }

    /// Drop the active piece until it locks
    pub fn hard_drop(&mut self) -> bool {
        if self.paused || self.game_over || self.active.is_none() {
            return false;
        }
        if let Some(level) = self.progress.on_hard_drop(&self.config) {
            self.on_level_changed(level);
        }

        let limit = BACKGROUND_HEIGHT as u32 + self.config.stuck_lock_ticks + 2;
        for _ in 0..limit {
            if self.active.is_none() || self.game_over {
                break;
            }
            self.step_active();
        }
        true
    }

    /// Queue a bomb from inventory as the next spawn
    pub fn arm_bomb(&mut self) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        self.bomb.arm()
    }

    /// Spend score to drop one speed level
    pub fn decrease_level(&mut self) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        if !self.progress.decrease_level(&self.config) {
            return false;
        }
        self.on_level_changed(self.progress.level());
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft
            | GameAction::MoveRight
            | GameAction::MoveUp
            | GameAction::MoveDown => match action.field_delta() {
                Some((dx, dy)) => self.move_field(dx, dy),
                None => false,
            },
            GameAction::RotateCcw => self.rotate_field(1),
            GameAction::RotateCw => self.rotate_field(-1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::ArmBomb => self.arm_bomb(),
            GameAction::DecreaseLevel => self.decrease_level(),
            GameAction::Pause => {
                if self.game_over {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

fn push_row(rows: &mut ArrayVec<usize, MAX_PIECE_SPAN>, row: usize) {
    if !rows.contains(&row) {
        let pushed = rows.try_push(row);
        debug_assert!(pushed.is_ok(), "a piece touches at most {MAX_PIECE_SPAN} rows");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Only I pieces, flat combo counter
    fn i_only_config() -> GameConfig {
        let mut config = GameConfig {
            weights: vec![PieceWeight {
                kind: PieceKind::I,
                weight: 1,
            }],
            ..GameConfig::default()
        };
        for row in &mut config.levels {
            row.teleport_value_add = 0;
            row.teleport_value_decrease = 0;
            row.bomb_solid_time = 1000;
        }
        config
    }

    fn events(state: &mut GameState) -> Vec<GameEvent> {
        state.drain_events().collect()
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::default();
        assert_eq!(state.center(), (20, 15));
        assert_eq!(state.rotation(), FieldRotation::Rotate0);
        assert_eq!(state.field_rect(), Rect { x1: 10, y1: 10, x2: 30, y2: 20 });
        assert!(state.active().is_none());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert!(!state.game_over());
    }

    #[test]
    fn test_spawn_per_rotation() {
        let mut state = GameState::new(i_only_config());
        let expected = [
            (FieldRotation::Rotate0, (18, 19)),
            (FieldRotation::Rotate90, (15, 24)),
            (FieldRotation::Rotate180, (18, 10)),
            (FieldRotation::Rotate270, (21, 24)),
        ];
        for (rotation, anchor) in expected {
            state.placement.rotation = rotation;
            state.set_active(None);
            assert!(state.spawn_piece());
            let piece = state.active().unwrap();
            assert_eq!((piece.x, piece.y), anchor, "{rotation:?}");
        }
    }

    #[test]
    fn test_tick_spawns_then_falls() {
        let mut state = GameState::new(i_only_config());
        assert!(!state.tick());
        let piece = state.active().unwrap();
        assert_eq!((piece.x, piece.y), (18, 19));

        state.tick();
        assert_eq!(state.active().unwrap().y, 18);
    }

    #[test]
    fn test_soft_lock_on_field_floor() {
        let mut state = GameState::new(i_only_config());
        state.start();
        for _ in 0..9 {
            assert!(!state.tick());
        }
        assert_eq!(state.active().unwrap().y, 10);
        assert!(state.tick());

        assert!(state.active().is_none());
        for x in 8..12 {
            assert_eq!(state.field_cell(x, 0), Some(Cell::Soft));
        }
        assert_eq!(state.score(), 0);
        assert_eq!(state.drain_sounds().collect::<Vec<_>>(), vec![SoundCue::BlockSolid]);
    }

    #[test]
    fn test_soft_lock_on_field_content() {
        let mut state = GameState::new(i_only_config());
        state.field_mut().set(9, 3, Cell::Soft);
        state.start();
        state.hard_drop();
        // Lands on the soft cell one row up from the floor.
        for x in 8..12 {
            assert_eq!(state.field_cell(x, 4), Some(Cell::Soft));
        }
    }

    #[test]
    fn test_hard_lock_on_background_floor() {
        let mut state = GameState::new(i_only_config());
        state.set_active(Some(ActivePiece::new(PieceKind::I, 2, 0)));
        assert!(state.tick());
        for x in 2..6 {
            assert_eq!(state.background().get(x, 0), Some(Cell::Locked));
        }
        assert_eq!(state.field().count(Cell::Soft), 0);
    }

    #[test]
    fn test_hard_lock_on_garbage() {
        let mut state = GameState::new(i_only_config());
        state.background_mut().set(3, 4, Cell::Locked);
        state.set_active(Some(ActivePiece::new(PieceKind::T, 2, 5)));
        assert!(state.tick());
        assert_eq!(state.cell(3, 6), Some(Cell::Locked));
        assert_eq!(state.cell(2, 5), Some(Cell::Locked));
    }

    #[test]
    fn test_background_row_clear_lowers_field() {
        let mut state = GameState::new(i_only_config());
        for x in 4..BACKGROUND_WIDTH as i32 {
            state.background_mut().set(x, 0, Cell::Locked);
        }
        state.background_mut().set(0, 1, Cell::Locked);
        state.set_active(Some(ActivePiece::new(PieceKind::I, 0, 0)));
        state.tick();

        assert_eq!(state.score(), 100);
        assert_eq!(state.center(), (20, 14));
        assert_eq!(state.background().get(0, 0), Some(Cell::Locked));
        assert_eq!(state.background().count(Cell::Locked), 1);
        let destroyed = events(&mut state)
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BlockDestroyed { .. }))
            .count();
        assert_eq!(destroyed, BACKGROUND_WIDTH);
    }

    #[test]
    fn test_field_row_clear_shifts_rows_above() {
        let mut state = GameState::new(i_only_config());
        for x in 0..FIELD_WIDTH as i32 {
            if !(8..12).contains(&x) {
                state.field_mut().set(x, 0, Cell::Soft);
            }
        }
        state.field_mut().set(0, 1, Cell::Soft);
        state.field_mut().set(5, 2, Cell::Soft);
        state.start();
        state.hard_drop();

        assert_eq!(state.score(), 100);
        assert_eq!(state.field_cell(0, 0), Some(Cell::Soft));
        assert_eq!(state.field_cell(5, 1), Some(Cell::Soft));
        assert_eq!(state.field().count(Cell::Soft), 2);
        assert_eq!(state.drain_sounds().last(), Some(SoundCue::Eliminate));
    }

    #[test]
    fn test_blocked_on_wall_then_force_locked() {
        let mut state = GameState::new(i_only_config());
        state.placement.rotation = FieldRotation::Rotate90;
        // Top edge of the sideways field is a wall.
        state.set_active(Some(ActivePiece::new(PieceKind::I, 17, 25)));

        for _ in 0..DEFAULT_STUCK_LOCK_TICKS {
            assert!(!state.tick());
            assert_eq!(state.active().unwrap().y, 25);
        }
        assert!(state.tick());
        for x in 17..21 {
            assert_eq!(state.background().get(x, 25), Some(Cell::Locked));
        }
    }

    #[test]
    fn test_wall_rest_ignores_field_content_below() {
        let mut state = GameState::new(i_only_config());
        state.placement.rotation = FieldRotation::Rotate90;
        assert_eq!(state.placement.to_background(19, 4), (20, 24));
        state.field_mut().set(19, 4, Cell::Soft);
        state.set_active(Some(ActivePiece::new(PieceKind::I, 17, 25)));

        for _ in 0..DEFAULT_STUCK_LOCK_TICKS {
            assert!(!state.tick());
            assert_eq!(state.active().unwrap().y, 25);
        }
        assert!(state.tick());
        assert!(!state.game_over());
        for x in 17..21 {
            assert_eq!(state.background().get(x, 25), Some(Cell::Locked));
        }
        assert_eq!(state.field_cell(19, 4), Some(Cell::Soft));
    }

    #[test]
    fn test_garbage_below_wall_rest_locks_at_once() {
        let mut state = GameState::new(i_only_config());
        state.placement.rotation = FieldRotation::Rotate90;
        // Columns 13 and 14 hang past the field's left side.
        state.background_mut().set(13, 24, Cell::Locked);
        state.set_active(Some(ActivePiece::new(PieceKind::I, 13, 25)));

        assert!(state.tick());
        assert!(!state.game_over());
        for x in 13..17 {
            assert_eq!(state.background().get(x, 25), Some(Cell::Locked));
        }
    }

    #[test]
    fn test_open_top_lets_piece_enter() {
        let mut state = GameState::new(i_only_config());
        state.set_active(Some(ActivePiece::new(PieceKind::I, 17, 21)));
        state.tick();
        state.tick();
        assert_eq!(state.active().unwrap().y, 19);
    }

    #[test]
    fn test_game_over_on_overflow() {
        let mut state = GameState::new(i_only_config());
        state.field_mut().set(8, 9, Cell::Soft);
        state.set_active(Some(ActivePiece::new(PieceKind::I, 18, 20)));
        state.tick();

        assert!(state.game_over());
        assert!(state.active().is_none());
        assert!(events(&mut state).contains(&GameEvent::GameOver));
        assert!(!state.tick());
        assert!(!state.move_field(1, 0));
        assert!(!state.rotate_field(1));
    }

    #[test]
    fn test_bomb_clears_three_by_three() {
        let mut state = GameState::new(i_only_config());
        for x in 19..22 {
            state.background_mut().set(x, 9, Cell::Locked);
        }
        for (fx, fy) in [(9, 0), (11, 0), (9, 1), (11, 1)] {
            state.field_mut().set(fx, fy, Cell::Soft);
        }
        state.give_bombs(1);
        assert!(state.arm_bomb());
        assert_eq!(state.next_kind(), PieceKind::Bomb);
        assert_eq!(state.bomb_inventory(), 0);

        state.tick();
        assert_eq!(state.active().unwrap().kind, PieceKind::Bomb);
        assert!(state.hard_drop());

        for y in 9..12 {
            for x in 19..22 {
                assert_eq!(state.cell(x, y), Some(Cell::Empty), "({x},{y})");
            }
        }
        assert_eq!(state.score(), 0);
        let events = events(&mut state);
        let detonations = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BombDetonated { .. }))
            .count();
        assert_eq!(detonations, 1);
        let destroyed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BlockDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 7);
        assert!(!state.bomb().armed);
    }

    #[test]
    fn test_bomb_spawns_after_countdown() {
        let mut config = i_only_config();
        config.levels[0].bomb_solid_time = 4;
        let mut state = GameState::new(config);
        state.start();
        state.hard_drop();

        let (x, y) = state.bomb().position.expect("bomb should be placed");
        assert_eq!(state.cell(x, y), Some(Cell::Bomb));
        assert!(!state.field_rect().contains(x, y));
        assert!(events(&mut state).contains(&GameEvent::BombSpawned { x, y }));
    }

    #[test]
    fn test_bomb_pickup_on_move() {
        let mut state = GameState::new(i_only_config());
        state.place_bomb(30, 15);
        assert!(state.move_field(1, 0));

        assert_eq!(state.bomb_inventory(), 1);
        assert_eq!(state.bomb().position, None);
        assert_eq!(state.bomb().remaining_block_num, 1000);
        assert_eq!(state.cell(30, 15), Some(Cell::Empty));
        assert_eq!(state.drain_sounds().collect::<Vec<_>>(), vec![SoundCue::BombPickup]);
    }

    #[test]
    fn test_arm_bomb_requires_inventory() {
        let mut state = GameState::new(i_only_config());
        assert!(!state.arm_bomb());
        state.give_bombs(2);
        assert!(state.arm_bomb());
        assert!(!state.arm_bomb());
        assert_eq!(state.bomb_inventory(), 1);
    }

    #[test]
    fn test_hard_drops_raise_level() {
        let mut state = GameState::default();
        // +10 per drop, -1 per tick: 10, 19, 28, 37
        for _ in 0..4 {
            state.tick();
            assert!(state.hard_drop());
        }
        assert_eq!(state.level(), 2);
        assert!(events(&mut state).contains(&GameEvent::LevelChanged { level: 2 }));
    }

    #[test]
    fn test_pause_blocks_commands() {
        let mut state = GameState::new(i_only_config());
        state.start();
        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.tick());
        assert!(!state.move_field(1, 0));
        assert!(state.apply_action(GameAction::Pause));
        assert!(state.move_field(1, 0));
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut state = GameState::new(i_only_config());
        state.start();
        state.hard_drop();
        state.apply_action(GameAction::Restart);
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.field().count(Cell::Soft), 0);
        assert!(state.active().is_some());
    }

    #[test]
    fn test_tick_with_applies_input_first() {
        let mut state = GameState::new(i_only_config());
        state.start();
        let input = TickInput {
            move_field: Some((1, 0)),
            ..TickInput::default()
        };
        state.tick_with(&input);
        assert_eq!(state.center(), (21, 15));
        assert_eq!(state.active().unwrap().y, 18);
    }

    #[test]
    fn test_idle_tick_with_matches_tick() {
        let mut a = GameState::new(GameConfig::default());
        a.start();
        let mut b = a.clone();
        for _ in 0..30 {
            assert_eq!(a.tick_with(&TickInput::default()), b.tick());
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_snapshot_projects_field() {
        let mut state = GameState::new(i_only_config());
        state.field_mut().set(0, 0, Cell::Soft);
        state.background_mut().set(0, 0, Cell::Locked);
        let snap = state.snapshot();
        assert_eq!(snap.background_code(10, 10), Cell::Soft.as_u8());
        assert_eq!(snap.background_code(0, 0), Cell::Locked.as_u8());
        assert_eq!(snap.field[0][0], Cell::Soft.as_u8());
        assert_eq!(snap.center, (20, 15));
    }
}
