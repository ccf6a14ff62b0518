//! Scoring module - score, speed level and the teleport (combo) counter
//!
//! - A cleared row pays the current level's `score`.
//! - A hard drop adds `teleportValueAdd`; every tick subtracts
//!   `teleportValueDecrease` (floored at zero).
//! - Reaching the next level's `teleportValue` promotes; dropping below the
//!   current level's own threshold demotes (never below level 1).
//! - A manual level decrease charges the current level's `scoreCost`.

use crate::config::GameConfig;

/// Score for `lines` rows cleared at `level`
pub fn calculate_line_score(lines: usize, config: &GameConfig, level: u32) -> u32 {
    config.level_row(level).score.saturating_mul(lines as u32)
}

/// Level reached after the counter grew to `teleport`
pub fn level_after_gain(level: u32, teleport: u32, config: &GameConfig) -> u32 {
    let mut level = level;
    while level < config.max_level() && teleport >= config.level_row(level + 1).teleport_value {
        level += 1;
    }
    level
}

/// Level left after the counter shrank to `teleport`
pub fn level_after_decay(level: u32, teleport: u32, config: &GameConfig) -> u32 {
    let mut level = level;
    while level > 1 && teleport < config.level_row(level).teleport_value {
        level -= 1;
    }
    level
}

/// Mutable progress of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    score: u32,
    level: u32,
    teleport: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            teleport: 0,
        }
    }
}

impl Progress {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current combo counter
    pub fn teleport_value(&self) -> u32 {
        self.teleport
    }

    /// Pay for `lines` cleared rows; returns the points added
    pub fn award_lines(&mut self, lines: usize, config: &GameConfig) -> u32 {
        let points = calculate_line_score(lines, config, self.level);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Hard-drop bonus; returns the new level if it changed
    pub fn on_hard_drop(&mut self, config: &GameConfig) -> Option<u32> {
        let add = config.level_row(self.level).teleport_value_add;
        self.teleport = self
            .teleport
            .saturating_add(add)
            .min(config.max_teleport_value);
        let level = level_after_gain(self.level, self.teleport, config);
        self.change_level(level)
    }

    /// Per-tick decay; returns the new level if it changed
    pub fn decay(&mut self, config: &GameConfig) -> Option<u32> {
        let decrease = config.level_row(self.level).teleport_value_decrease;
        self.teleport = self.teleport.saturating_sub(decrease);
        let level = level_after_decay(self.level, self.teleport, config);
        self.change_level(level)
    }

    /// Spend score to drop one level
    ///
    /// Rejected at level 1 or when the score cannot cover `scoreCost`.
    pub fn decrease_level(&mut self, config: &GameConfig) -> bool {
        if self.level <= 1 {
            return false;
        }
        let row = config.level_row(self.level);
        if self.score < row.score_cost {
            return false;
        }
        let below = config.level_row(self.level - 1);
        let delta = row.teleport_value.saturating_sub(below.teleport_value);

        self.score -= row.score_cost;
        self.teleport = self.teleport.saturating_sub(delta);
        self.level -= 1;
        true
    }

    fn change_level(&mut self, level: u32) -> Option<u32> {
        if level == self.level {
            return None;
        }
        self.level = level;
        Some(level)
    }
}
