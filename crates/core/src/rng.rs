//! RNG module - weighted piece generation
//!
//! Piece kinds are drawn from a cumulative distribution built from the
//! tuning weights. One kind is always pre-drawn so the view can preview it.
//!
//! The generator does not own a random source; callers pass the game's
//! seeded [`Pcg32`] so piece draws and bomb placement share one stream.

use arrayvec::ArrayVec;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::{PieceKind, PieceWeight};

/// Build the deterministic random source for a seed
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Weighted piece generator with a one-ahead buffer
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    /// (kind, cumulative weight in (0, 1]); zero weights are left out
    table: ArrayVec<(PieceKind, f32), 7>,
    next: PieceKind,
}

impl PieceGenerator {
    /// Build the table and pre-draw the first kind
    ///
    /// Bomb entries and zero weights are skipped. With no usable weight the
    /// generator falls back to a uniform table over the regular kinds;
    /// validated configs never hit that path.
    pub fn new<R: Rng>(weights: &[PieceWeight], rng: &mut R) -> Self {
        let mut table = Self::cumulative(weights);
        if table.is_empty() {
            let uniform: ArrayVec<PieceWeight, 7> = PieceKind::REGULAR
                .iter()
                .map(|&kind| PieceWeight { kind, weight: 1 })
                .collect();
            table = Self::cumulative(&uniform);
        }

        let mut generator = Self {
            table,
            next: PieceKind::T,
        };
        generator.next = generator.sample(rng.random::<f32>());
        generator
    }

    fn cumulative(weights: &[PieceWeight]) -> ArrayVec<(PieceKind, f32), 7> {
        let total: u64 = weights
            .iter()
            .filter(|w| w.kind != PieceKind::Bomb)
            .map(|w| w.weight as u64)
            .sum();

        let mut table = ArrayVec::new();
        if total == 0 {
            return table;
        }

        let mut running = 0u64;
        for w in weights {
            if w.kind == PieceKind::Bomb || w.weight == 0 || table.is_full() {
                continue;
            }
            running += w.weight as u64;
            table.push((w.kind, running as f32 / total as f32));
        }
        table
    }

    /// Map a uniform sample in [0, 1) to a kind
    ///
    /// Returns the first kind whose cumulative weight reaches the sample.
    pub fn sample(&self, u: f32) -> PieceKind {
        self.table
            .iter()
            .find(|(_, cumulative)| u <= *cumulative)
            .or_else(|| self.table.last())
            .map(|(kind, _)| *kind)
            .unwrap_or(PieceKind::T)
    }

    /// Peek at the next kind without consuming it
    pub fn peek(&self) -> PieceKind {
        self.next
    }

    /// Consume the buffered kind and pre-draw its successor
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> PieceKind {
        let kind = self.next;
        self.next = self.sample(rng.random::<f32>());
        kind
    }

    /// Normalized probability of `kind`
    pub fn probability(&self, kind: PieceKind) -> f32 {
        let mut previous = 0.0;
        for &(k, cumulative) in &self.table {
            if k == kind {
                return cumulative - previous;
            }
            previous = cumulative;
        }
        0.0
    }
}
