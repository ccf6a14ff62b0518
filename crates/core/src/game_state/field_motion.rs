//! Field translation and rotation
//!
//! The field rectangle may never leave the background or cover garbage.
//! Walls other than the open edge push the active piece along when they
//! sweep into it; if the pushed piece has nowhere to go the whole move is
//! undone.

use log::debug;

use super::{ActivePiece, GameState};
use crate::transform::Rect;
use crate::types::*;

/// Upper bound on single-cell pushes while freeing a piece
const MAX_PUSHES: i32 = (BACKGROUND_WIDTH + BACKGROUND_HEIGHT) as i32;

const EDGES: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

impl GameState {
    /// Slide the field by (dx, dy) background cells
    pub fn move_field(&mut self, dx: i32, dy: i32) -> bool {
        if self.paused || self.game_over || (dx == 0 && dy == 0) {
            return false;
        }
        if !self.translate_field(dx, dy, true) {
            return false;
        }
        self.check_bomb_pickup();
        true
    }

    /// Turn the field a quarter turn; +1 is counter-clockwise
    ///
    /// The rectangle is nudged back inside the background, then kicked
    /// upward past any garbage it would cover. Fails without side effects
    /// when no placement works for both the field and the active piece.
    pub fn rotate_field(&mut self, direction: i32) -> bool {
        if self.paused || self.game_over || direction == 0 {
            return false;
        }

        let saved_placement = self.placement;
        let saved_active = self.active;

        self.placement.rotation = self.placement.rotation.turned(direction.signum());
        self.nudge_into_background();

        let placed = match self.kick_distance() {
            Some(0) => true,
            Some(kick) => self.translate_field(0, kick, true),
            None => false,
        };

        if !placed || !self.adjust_active_piece() {
            debug!(
                "rotation to {} degrees rejected at center {:?}",
                self.placement.rotation.degrees(),
                self.placement.center
            );
            self.placement = saved_placement;
            self.active = saved_active;
            return false;
        }

        self.check_bomb_pickup();
        true
    }

    /// Inside the background and free of garbage
    fn rect_is_clear(&self, rect: &Rect) -> bool {
        rect.within_background()
            && rect
                .cells()
                .all(|(x, y)| !self.background.is(x, y, Cell::Locked))
    }

    /// Shift the center by exactly the amount the rectangle sticks out
    fn nudge_into_background(&mut self) {
        let rect = self.field_rect();
        let width = BACKGROUND_WIDTH as i32;
        let height = BACKGROUND_HEIGHT as i32;

        let dx = if rect.x1 < 0 {
            -rect.x1
        } else if rect.x2 > width {
            width - rect.x2
        } else {
            0
        };
        let dy = if rect.y1 < 0 {
            -rect.y1
        } else if rect.y2 > height {
            height - rect.y2
        } else {
            0
        };

        self.placement.center.0 += dx;
        self.placement.center.1 += dy;
    }

    /// Smallest upward shift that leaves the rectangle clear
    fn kick_distance(&self) -> Option<i32> {
        let rect = self.field_rect();
        (0..=BACKGROUND_HEIGHT as i32)
            .map(|d| (d, rect.translated(0, d)))
            .take_while(|(_, r)| r.within_background())
            .find(|(_, r)| self.rect_is_clear(r))
            .map(|(d, _)| d)
    }

    /// Move the rectangle, optionally pushing the active piece along
    ///
    /// Leaves the state untouched and returns false when the new rectangle
    /// is not clear or the pushed piece would collide.
    fn translate_field(&mut self, dx: i32, dy: i32, carry: bool) -> bool {
        let old = self.field_rect();
        if !self.rect_is_clear(&old.translated(dx, dy)) {
            return false;
        }

        let saved_center = self.placement.center;
        self.placement.center.0 += dx;
        self.placement.center.1 += dy;

        if !carry {
            return true;
        }
        let Some(piece) = self.active else {
            return true;
        };
        if !self.is_pressed(&piece, &old, dx, dy) {
            return true;
        }

        let moved = piece.shifted(dx, dy);
        if !self.piece_fits(&moved) {
            self.placement.center = saved_center;
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Whether moving the rectangle from `old` by (dx, dy) shoves `piece`
    ///
    /// A piece is shoved by any closed edge that sweeps over one of its
    /// cells, or when the moved field's content lands on it. Must be called
    /// with the placement already moved.
    fn is_pressed(&self, piece: &ActivePiece, old: &Rect, dx: i32, dy: i32) -> bool {
        let open = self.placement.rotation.open_edge();
        let swept = EDGES
            .iter()
            .filter(|&&edge| edge != open)
            .filter_map(|&edge| old.swept_by(edge, dx, dy))
            .any(|band| piece.cells().any(|(x, y)| band.contains(x, y)));

        swept
            || piece
                .cells()
                .any(|(x, y)| self.field_cell_at(x, y) == Some(Cell::Soft))
    }

    /// Every cell in bounds and empty in the composed view
    fn piece_fits(&self, piece: &ActivePiece) -> bool {
        piece
            .cells()
            .all(|(x, y)| self.cell(x, y) == Some(Cell::Empty))
    }

    /// Any in-bounds cell of `piece` on something solid
    fn overlaps_content(&self, piece: &ActivePiece) -> bool {
        piece
            .cells()
            .any(|(x, y)| matches!(self.cell(x, y), Some(c) if c != Cell::Empty))
    }

    /// Shift a piece straddling a closed edge back inside the rectangle
    fn clamp_to_walls(&self, piece: ActivePiece) -> ActivePiece {
        let rect = self.field_rect();
        let open = self.placement.rotation.open_edge();
        let b = piece.bounds();
        let rows_overlap = b.y1 < rect.y2 && b.y2 > rect.y1;
        let cols_overlap = b.x1 < rect.x2 && b.x2 > rect.x1;

        let mut dx = 0;
        let mut dy = 0;
        if rows_overlap {
            if open != Edge::Left && b.x1 < rect.x1 && b.x2 > rect.x1 {
                dx = rect.x1 - b.x1;
            } else if open != Edge::Right && b.x1 < rect.x2 && b.x2 > rect.x2 {
                dx = rect.x2 - b.x2;
            }
        }
        if cols_overlap {
            if open != Edge::Bottom && b.y1 < rect.y1 && b.y2 > rect.y1 {
                dy = rect.y1 - b.y1;
            } else if open != Edge::Top && b.y1 < rect.y2 && b.y2 > rect.y2 {
                dy = rect.y2 - b.y2;
            }
        }
        piece.shifted(dx, dy)
    }

    /// Cells the piece sticks out past the background edge it was pushed toward
    fn overflow(&self, piece: &ActivePiece) -> i32 {
        let b = piece.bounds();
        let amount = match self.placement.rotation.open_edge() {
            Edge::Top => b.y2 - BACKGROUND_HEIGHT as i32,
            Edge::Left => -b.x1,
            Edge::Bottom => -b.y1,
            Edge::Right => b.x2 - BACKGROUND_WIDTH as i32,
        };
        amount.max(0)
    }

    /// Settle the active piece after a spawn or rotation
    ///
    /// Clamps it inside the closed walls, pushes it toward the open edge
    /// until it is free, and if that runs it off the background moves the
    /// field back by the overflow. On failure the piece and center are
    /// restored and false is returned.
    pub(super) fn adjust_active_piece(&mut self) -> bool {
        let Some(original) = self.active else {
            return true;
        };
        let saved_center = self.placement.center;

        let mut piece = self.clamp_to_walls(original);
        let (ux, uy) = self.placement.rotation.up();
        let mut pushes = 0;
        while pushes < MAX_PUSHES && self.overlaps_content(&piece) {
            piece = piece.shifted(ux, uy);
            pushes += 1;
        }

        let overflow = self.overflow(&piece);
        if overflow > 0 && self.translate_field(-ux * overflow, -uy * overflow, false) {
            piece = piece.shifted(-ux * overflow, -uy * overflow);
        }

        if self.piece_fits(&piece) {
            self.active = Some(piece);
            true
        } else {
            self.placement.center = saved_center;
            self.active = Some(original);
            false
        }
    }
}
