//! Bomb module - countdown, pickup bookkeeping and spawn placement

use rand::Rng;

use crate::transform::Rect;
use crate::types::{BACKGROUND_HEIGHT, BACKGROUND_WIDTH};

/// Random draws spent per spawn attempt before giving up until later
pub const BOMB_SAMPLE_ATTEMPTS: usize = 64;

/// Bomb bookkeeping for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombState {
    /// Background cell of the pickup, if one is on the board
    pub position: Option<(i32, i32)>,
    /// Field cells still to lock before a new bomb may appear
    pub remaining_block_num: u32,
    /// Bombs held by the player
    pub inventory: u32,
    /// Next spawn is a bomb
    pub armed: bool,
}

impl BombState {
    pub fn new(remaining_block_num: u32) -> Self {
        Self {
            position: None,
            remaining_block_num,
            inventory: 0,
            armed: false,
        }
    }

    /// Count down by the number of cells locked into the field
    pub fn count_down(&mut self, cells: u32) {
        self.remaining_block_num = self.remaining_block_num.saturating_sub(cells);
    }

    /// A new bomb may be placed now
    pub fn ready_to_spawn(&self, limit: u32) -> bool {
        self.remaining_block_num == 0 && self.position.is_none() && self.inventory < limit
    }

    /// Move the armed flag out of inventory
    pub fn arm(&mut self) -> bool {
        if self.inventory == 0 || self.armed {
            return false;
        }
        self.inventory -= 1;
        self.armed = true;
        true
    }

    /// Take the pickup off the board; the countdown restarts at `reset_to`
    pub fn pick_up(&mut self, reset_to: u32) {
        self.position = None;
        self.inventory += 1;
        self.remaining_block_num = reset_to;
    }
}

/// Sample a bomb cell around the field rectangle
///
/// Candidates are drawn uniformly from the ring between `field` grown by
/// `min_distance` and that rectangle grown by a further `band`, wrapped into
/// the background. Cells that wrap back into the field rectangle or fail
/// `is_free` are rejected.
pub fn sample_bomb_position<R, F>(
    field: Rect,
    min_distance: i32,
    band: i32,
    rng: &mut R,
    is_free: F,
) -> Option<(i32, i32)>
where
    R: Rng,
    F: Fn(i32, i32) -> bool,
{
    let inner = field.expanded(min_distance.max(0));
    let outer = inner.expanded(band.max(1));

    for _ in 0..BOMB_SAMPLE_ATTEMPTS {
        let x = rng.random_range(outer.x1..outer.x2);
        let y = rng.random_range(outer.y1..outer.y2);
        if inner.contains(x, y) {
            continue;
        }
        let wx = x.rem_euclid(BACKGROUND_WIDTH as i32);
        let wy = y.rem_euclid(BACKGROUND_HEIGHT as i32);
        if field.contains(wx, wy) {
            continue;
        }
        if is_free(wx, wy) {
            return Some((wx, wy));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use crate::transform::field_rect;
    use crate::types::FieldRotation;

    #[test]
    fn test_samples_stay_outside_field_and_inner_gap() {
        let field = field_rect(FieldRotation::Rotate0, (20, 15));
        let mut rng = seeded_rng(5);
        for _ in 0..200 {
            let (x, y) = sample_bomb_position(field, 2, 4, &mut rng, |_, _| true).unwrap();
            assert!(!field.contains(x, y));
            assert!((0..BACKGROUND_WIDTH as i32).contains(&x));
            assert!((0..BACKGROUND_HEIGHT as i32).contains(&y));
        }
    }

    #[test]
    fn test_samples_respect_free_predicate() {
        let field = field_rect(FieldRotation::Rotate90, (20, 15));
        let mut rng = seeded_rng(11);
        let pos = sample_bomb_position(field, 1, 3, &mut rng, |x, _| x < 10);
        if let Some((x, _)) = pos {
            assert!(x < 10);
        }
        assert_eq!(
            sample_bomb_position(field, 1, 3, &mut rng, |_, _| false),
            None
        );
    }

    #[test]
    fn test_arm_consumes_inventory_once() {
        let mut bomb = BombState::new(10);
        assert!(!bomb.arm());

        bomb.pick_up(25);
        assert_eq!(bomb.inventory, 1);
        assert_eq!(bomb.remaining_block_num, 25);

        assert!(bomb.arm());
        assert!(bomb.armed);
        assert_eq!(bomb.inventory, 0);
        assert!(!bomb.arm());
    }

    #[test]
    fn test_ready_to_spawn() {
        let mut bomb = BombState::new(4);
        assert!(!bomb.ready_to_spawn(3));
        bomb.count_down(9);
        assert_eq!(bomb.remaining_block_num, 0);
        assert!(bomb.ready_to_spawn(3));
        bomb.inventory = 3;
        assert!(!bomb.ready_to_spawn(3));
    }
}
