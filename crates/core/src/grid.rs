//! Grid module - fixed-size cell storage for the background and the field
//!
//! Both grids share one generic implementation sized by const parameters.
//! Coordinates: (x, y) where x grows to the right and y grows upward; row 0
//! is the bottom row. Storage is an array of rows so a row collapse is a
//! single `copy_within`.

use arrayvec::ArrayVec;

use crate::types::{Cell, BACKGROUND_HEIGHT, BACKGROUND_WIDTH, FIELD_HEIGHT, FIELD_WIDTH};

/// A W x H grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<const W: usize, const H: usize> {
    /// Rows bottom to top
    rows: [[Cell; W]; H],
}

/// The large fixed grid holding garbage and the bomb pickup.
pub type Background = Grid<BACKGROUND_WIDTH, BACKGROUND_HEIGHT>;

/// The small grid that moves and rotates inside the background.
pub type Field = Grid<FIELD_WIDTH, FIELD_HEIGHT>;

impl<const W: usize, const H: usize> Default for Grid<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Grid<W, H> {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; W]; H],
        }
    }

    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x >= W as i32 || y >= H as i32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    pub fn width(&self) -> usize {
        W
    }

    pub fn height(&self) -> usize {
        H
    }

    /// Whether (x, y) lies inside the grid
    pub fn contains(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some()
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and equal to `cell`
    pub fn is(&self, x: i32, y: i32, cell: Cell) -> bool {
        self.get(x, y) == Some(cell)
    }

    /// Row `y` as a slice, bottom row first
    pub fn row(&self, y: usize) -> Option<&[Cell; W]> {
        self.rows.get(y)
    }

    /// Check if every cell in row `y` equals `filled`
    pub fn is_row_full(&self, y: usize, filled: Cell) -> bool {
        match self.rows.get(y) {
            Some(row) => row.iter().all(|&cell| cell == filled),
            None => false,
        }
    }

    /// Clear row `y` and shift every row above it down by one
    /// Returns false if `y` is out of range
    pub fn clear_row(&mut self, y: usize) -> bool {
        if y >= H {
            return false;
        }
        self.rows.copy_within(y + 1..H, y);
        self.rows[H - 1] = [Cell::Empty; W];
        true
    }

    /// Clear the full rows among `rows`, scanning from the topmost down
    ///
    /// Clearing a row only moves rows above it, so handling the highest
    /// candidate first keeps the remaining indices valid. Returns the
    /// cleared row indices in the order they were cleared.
    pub fn clear_full_rows(&mut self, rows: &[usize], filled: Cell) -> ArrayVec<usize, 4> {
        let mut candidates: ArrayVec<usize, 4> = ArrayVec::new();
        for &row in rows {
            if row < H && !candidates.contains(&row) && !candidates.is_full() {
                candidates.push(row);
            }
        }
        candidates.sort_unstable_by(|a, b| b.cmp(a));

        let mut cleared = ArrayVec::new();
        for row in candidates {
            if self.is_row_full(row, filled) {
                self.clear_row(row);
                cleared.push(row);
            }
        }
        cleared
    }

    /// Indices of every full row, bottom first
    pub fn full_rows(&self, filled: Cell) -> impl Iterator<Item = usize> + '_ {
        (0..H).filter(move |&y| self.is_row_full(y, filled))
    }

    /// Number of cells equal to `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&c| c == cell).count())
            .sum()
    }

    /// Write the numeric cell codes into `out`
    pub fn write_codes(&self, out: &mut [[u8; W]; H]) {
        for (dst, src) in out.iter_mut().zip(self.rows.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = s.as_u8();
            }
        }
    }

    /// Create a grid from row strings, top row first (test helper)
    ///
    /// `.` empty, `s` soft, `#` locked, `*` bomb.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        let top = rows.len() as i32 - 1;
        for (i, line) in rows.iter().enumerate() {
            let y = top - i as i32;
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    's' => Cell::Soft,
                    '#' => Cell::Locked,
                    '*' => Cell::Bomb,
                    _ => Cell::Empty,
                };
                grid.set(x as i32, y, cell);
            }
        }
        grid
    }
}
