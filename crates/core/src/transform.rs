//! Coordinate transforms between the field and the background
//!
//! The field is a `FIELD_WIDTH x FIELD_HEIGHT` grid placed inside the
//! background at an integer center with one of four rotation states. The
//! mapping for each state is a quarter-turn around the center followed by a
//! translation:
//!
//! | Rotation | Offset of field cell (x, y) from the center |
//! |----------|---------------------------------------------|
//! | 0°       | `(x - hw, y - hh)`                          |
//! | 90°      | `(hh - y - 1, x - hw)`                      |
//! | 180°     | `(hw - x - 1, hh - y - 1)`                  |
//! | 270°     | `(y - hh, hw - x - 1)`                      |
//!
//! where `hw`/`hh` are the half extents. All functions here are pure.

use crate::types::{Edge, FieldRotation, BACKGROUND_HEIGHT, BACKGROUND_WIDTH, FIELD_HEIGHT, FIELD_WIDTH};

/// Half of the field width
pub const HALF_WIDTH: i32 = FIELD_WIDTH as i32 / 2;
/// Half of the field height
pub const HALF_HEIGHT: i32 = FIELD_HEIGHT as i32 / 2;

/// Axis-aligned half-open rectangle `[x1, x2) x [y1, y2)` in background cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Grow by `amount` cells on every side
    pub fn expanded(&self, amount: i32) -> Self {
        Self {
            x1: self.x1 - amount,
            y1: self.y1 - amount,
            x2: self.x2 + amount,
            y2: self.y2 + amount,
        }
    }

    /// Fully inside the background grid
    pub fn within_background(&self) -> bool {
        self.x1 >= 0
            && self.y1 >= 0
            && self.x2 <= BACKGROUND_WIDTH as i32
            && self.y2 <= BACKGROUND_HEIGHT as i32
    }

    /// Every background cell covered by the rectangle
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x1, x2) = (self.x1, self.x2);
        (self.y1..self.y2).flat_map(move |y| (x1..x2).map(move |x| (x, y)))
    }

    /// Band of cells swept by `edge` when the rectangle moves by (dx, dy)
    ///
    /// Only the component of the motion across the edge matters; the band
    /// spans the union of the old and new extents along the edge.
    pub fn swept_by(&self, edge: Edge, dx: i32, dy: i32) -> Option<Rect> {
        let moved = self.translated(dx, dy);
        let span_x = (self.x1.min(moved.x1), self.x2.max(moved.x2));
        let span_y = (self.y1.min(moved.y1), self.y2.max(moved.y2));
        let band = match edge {
            Edge::Bottom if dy != 0 => Rect {
                x1: span_x.0,
                x2: span_x.1,
                y1: self.y1.min(moved.y1),
                y2: self.y1.max(moved.y1),
            },
            Edge::Top if dy != 0 => Rect {
                x1: span_x.0,
                x2: span_x.1,
                y1: self.y2.min(moved.y2),
                y2: self.y2.max(moved.y2),
            },
            Edge::Left if dx != 0 => Rect {
                x1: self.x1.min(moved.x1),
                x2: self.x1.max(moved.x1),
                y1: span_y.0,
                y2: span_y.1,
            },
            Edge::Right if dx != 0 => Rect {
                x1: self.x2.min(moved.x2),
                x2: self.x2.max(moved.x2),
                y1: span_y.0,
                y2: span_y.1,
            },
            _ => return None,
        };
        Some(band)
    }
}

/// Offset of field cell (x, y) from the field center, in background space
#[inline]
pub fn field_offset(x: i32, y: i32, rotation: FieldRotation) -> (i32, i32) {
    match rotation {
        FieldRotation::Rotate0 => (x - HALF_WIDTH, y - HALF_HEIGHT),
        FieldRotation::Rotate90 => (HALF_HEIGHT - y - 1, x - HALF_WIDTH),
        FieldRotation::Rotate180 => (HALF_WIDTH - x - 1, HALF_HEIGHT - y - 1),
        FieldRotation::Rotate270 => (y - HALF_HEIGHT, HALF_WIDTH - x - 1),
    }
}

/// Map field cell (x, y) to its background cell
///
/// # Examples
///
/// ```
/// use tui_spinfield_core::transform::field_to_background;
/// use tui_spinfield_core::types::FieldRotation;
///
/// // The field's bottom-left cell at rotation 0 with the default center.
/// assert_eq!(field_to_background(0, 0, FieldRotation::Rotate0, (20, 15)), (10, 10));
/// ```
#[inline]
pub fn field_to_background(
    x: i32,
    y: i32,
    rotation: FieldRotation,
    center: (i32, i32),
) -> (i32, i32) {
    let (ox, oy) = field_offset(x, y, rotation);
    (center.0 + ox, center.1 + oy)
}

/// Map background cell (bx, by) into field coordinates
///
/// The result may lie outside the field when (bx, by) is outside the field
/// rectangle; callers check the range.
#[inline]
pub fn background_to_field(
    bx: i32,
    by: i32,
    rotation: FieldRotation,
    center: (i32, i32),
) -> (i32, i32) {
    let dx = bx - center.0;
    let dy = by - center.1;
    match rotation {
        FieldRotation::Rotate0 => (dx + HALF_WIDTH, dy + HALF_HEIGHT),
        FieldRotation::Rotate90 => (dy + HALF_WIDTH, HALF_HEIGHT - 1 - dx),
        FieldRotation::Rotate180 => (HALF_WIDTH - 1 - dx, HALF_HEIGHT - 1 - dy),
        FieldRotation::Rotate270 => (HALF_WIDTH - 1 - dy, dx + HALF_HEIGHT),
    }
}

/// Whether (x, y) is a valid field coordinate
#[inline]
pub fn in_field(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && x < FIELD_WIDTH as i32 && y < FIELD_HEIGHT as i32
}

/// Background rectangle covered by the field
pub fn field_rect(rotation: FieldRotation, center: (i32, i32)) -> Rect {
    let (hx, hy) = if rotation.is_sideways() {
        (HALF_HEIGHT, HALF_WIDTH)
    } else {
        (HALF_WIDTH, HALF_HEIGHT)
    };
    Rect {
        x1: center.0 - hx,
        y1: center.1 - hy,
        x2: center.0 + hx,
        y2: center.1 + hy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: (i32, i32) = (20, 15);

    #[test]
    fn test_corners_land_inside_rect() {
        for rotation in FieldRotation::ALL {
            let rect = field_rect(rotation, CENTER);
            for (x, y) in [(0, 0), (19, 0), (0, 9), (19, 9)] {
                let (bx, by) = field_to_background(x, y, rotation, CENTER);
                assert!(rect.contains(bx, by), "{rotation:?} ({x},{y}) -> ({bx},{by})");
            }
        }
    }

    #[test]
    fn test_rect_swaps_axes_when_sideways() {
        let flat = field_rect(FieldRotation::Rotate0, CENTER);
        let side = field_rect(FieldRotation::Rotate90, CENTER);
        assert_eq!((flat.width(), flat.height()), (20, 10));
        assert_eq!((side.width(), side.height()), (10, 20));
        assert_eq!(side, Rect { x1: 15, y1: 5, x2: 25, y2: 25 });
    }

    #[test]
    fn test_field_floor_per_rotation() {
        // Field row 0 sits on a different rectangle edge per rotation.
        let r90 = field_rect(FieldRotation::Rotate90, CENTER);
        let (bx, _) = field_to_background(3, 0, FieldRotation::Rotate90, CENTER);
        assert_eq!(bx, r90.x2 - 1);

        let r180 = field_rect(FieldRotation::Rotate180, CENTER);
        let (_, by) = field_to_background(3, 0, FieldRotation::Rotate180, CENTER);
        assert_eq!(by, r180.y2 - 1);

        let r270 = field_rect(FieldRotation::Rotate270, CENTER);
        let (bx, _) = field_to_background(3, 0, FieldRotation::Rotate270, CENTER);
        assert_eq!(bx, r270.x1);
    }

    #[test]
    fn test_inverse_mapping_for_all_cells() {
        for rotation in FieldRotation::ALL {
            for y in 0..FIELD_HEIGHT as i32 {
                for x in 0..FIELD_WIDTH as i32 {
                    let (bx, by) = field_to_background(x, y, rotation, CENTER);
                    assert_eq!(background_to_field(bx, by, rotation, CENTER), (x, y));
                }
            }
        }
    }

    #[test]
    fn test_swept_band() {
        let rect = Rect { x1: 10, y1: 10, x2: 30, y2: 20 };
        let band = rect.swept_by(Edge::Bottom, 0, 2).unwrap();
        assert_eq!(band, Rect { x1: 10, y1: 10, x2: 30, y2: 12 });
        let band = rect.swept_by(Edge::Top, 0, 2).unwrap();
        assert_eq!(band, Rect { x1: 10, y1: 20, x2: 30, y2: 22 });
        let band = rect.swept_by(Edge::Left, -1, 0).unwrap();
        assert_eq!(band, Rect { x1: 9, y1: 10, x2: 10, y2: 20 });
        assert!(rect.swept_by(Edge::Left, 0, 1).is_none());
    }
}
