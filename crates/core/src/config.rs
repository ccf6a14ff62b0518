//! Tuning tables and scalar tunables
//!
//! A [`GameConfig`] is loaded once before a session starts and then only
//! read. The simulation assumes it has passed [`GameConfig::validate`];
//! loaders surface a [`ConfigError`] instead of handing over a bad table.
//!
//! With the `serde` feature the config round-trips through JSON using
//! camelCase keys. Missing keys take their default values:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "weights": [{ "kind": "i", "weight": 2 }, { "kind": "t", "weight": 1 }],
//!   "bombLimit": 2
//! }
//! ```

use std::fmt;

use crate::types::{
    LevelRow, PieceKind, PieceWeight, DEFAULT_BOMB_LIMIT, DEFAULT_STUCK_LOCK_TICKS,
};

/// Everything the simulation reads from outside
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GameConfig {
    pub seed: u64,
    /// Ordered spawn weights; order breaks sampling ties
    pub weights: Vec<PieceWeight>,
    /// Level rows, level 1 first
    pub levels: Vec<LevelRow>,
    /// Most bombs the player may hold
    pub bomb_limit: u32,
    /// Ticks a piece may rest on a side wall before it becomes garbage
    pub stuck_lock_ticks: u32,
    /// Gap between the field rectangle and the bomb spawn annulus
    pub bomb_min_distance: i32,
    /// Thickness of the bomb spawn annulus
    pub bomb_spawn_band: i32,
    /// Upper bound of the combo counter
    pub max_teleport_value: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            weights: PieceKind::REGULAR
                .iter()
                .map(|&kind| PieceWeight { kind, weight: 1 })
                .collect(),
            levels: default_levels(),
            bomb_limit: DEFAULT_BOMB_LIMIT,
            stuck_lock_ticks: DEFAULT_STUCK_LOCK_TICKS,
            bomb_min_distance: 2,
            bomb_spawn_band: 4,
            max_teleport_value: 200,
        }
    }
}

/// Reference level table
pub fn default_levels() -> Vec<LevelRow> {
    // level, threshold, add, decrease, ticks/s, score, cost, bomb time
    const ROWS: [(u32, u32, u32, u32, f32, u32, u32, u32); 5] = [
        (1, 0, 10, 1, 1.0, 100, 0, 40),
        (2, 30, 8, 1, 1.5, 150, 200, 50),
        (3, 60, 6, 2, 2.0, 200, 400, 60),
        (4, 100, 5, 2, 3.0, 300, 600, 70),
        (5, 150, 4, 3, 4.0, 400, 800, 80),
    ];
    ROWS.iter()
        .map(
            |&(level, teleport_value, add, decrease, speed_time, score, score_cost, bomb)| {
                LevelRow {
                    level,
                    teleport_value,
                    teleport_value_add: add,
                    teleport_value_decrease: decrease,
                    speed_time,
                    score,
                    score_cost,
                    bomb_solid_time: bomb,
                }
            },
        )
        .collect()
}

impl GameConfig {
    /// Highest level in the table
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Row for `level`, clamped into the table
    ///
    /// Panics on an empty table; validated configs always have a row.
    pub fn level_row(&self, level: u32) -> &LevelRow {
        let index = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        &self.levels[index]
    }

    /// Check the tables before a session uses them
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        for (i, row) in self.levels.iter().enumerate() {
            let expected = i as u32 + 1;
            if row.level != expected {
                return Err(ConfigError::LevelOutOfOrder {
                    expected,
                    found: row.level,
                });
            }
            if !(row.speed_time > 0.0) {
                return Err(ConfigError::NonPositiveSpeed { level: row.level });
            }
            if i > 0 && row.teleport_value <= self.levels[i - 1].teleport_value {
                return Err(ConfigError::ThresholdsNotIncreasing { level: row.level });
            }
        }
        if self.weights.iter().any(|w| w.kind == PieceKind::Bomb) {
            return Err(ConfigError::BombWeight);
        }
        if self.weights.iter().map(|w| w.weight as u64).sum::<u64>() == 0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        let top = self.levels[self.levels.len() - 1].teleport_value;
        if self.max_teleport_value < top {
            return Err(ConfigError::TeleportCapTooLow {
                cap: self.max_teleport_value,
                top_threshold: top,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }
}

/// A tuning table the simulation cannot run with
#[derive(Debug)]
pub enum ConfigError {
    EmptyLevelTable,
    LevelOutOfOrder { expected: u32, found: u32 },
    ZeroTotalWeight,
    /// Bombs come from inventory, never from the weight table
    BombWeight,
    NonPositiveSpeed { level: u32 },
    ThresholdsNotIncreasing { level: u32 },
    TeleportCapTooLow { cap: u32, top_threshold: u32 },
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyLevelTable => write!(f, "level table is empty"),
            ConfigError::LevelOutOfOrder { expected, found } => {
                write!(f, "expected level {expected} in the level table, found {found}")
            }
            ConfigError::ZeroTotalWeight => write!(f, "piece weights sum to zero"),
            ConfigError::BombWeight => write!(f, "bomb cannot appear in the weight table"),
            ConfigError::NonPositiveSpeed { level } => {
                write!(f, "level {level} has a non-positive speedTime")
            }
            ConfigError::ThresholdsNotIncreasing { level } => {
                write!(f, "teleportValue of level {level} does not exceed the level below")
            }
            ConfigError::TeleportCapTooLow { cap, top_threshold } => write!(
                f,
                "maxTeleportValue {cap} is below the top level threshold {top_threshold}"
            ),
            #[cfg(feature = "serde")]
            ConfigError::Json(err) => write!(f, "invalid config json: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            ConfigError::Json(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_level(), 5);
        assert_eq!(config.level_row(1).teleport_value, 0);
    }

    #[test]
    fn test_level_row_clamps() {
        let config = GameConfig::default();
        assert_eq!(config.level_row(0).level, 1);
        assert_eq!(config.level_row(99).level, 5);
    }

    #[test]
    fn test_rejects_zero_weight() {
        let mut config = GameConfig::default();
        for w in &mut config.weights {
            w.weight = 0;
        }
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTotalWeight)));
    }

    #[test]
    fn test_rejects_missing_level_row() {
        let mut config = GameConfig::default();
        config.levels.remove(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LevelOutOfOrder { expected: 2, found: 3 })
        ));

        config.levels.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLevelTable)));
    }

    #[test]
    fn test_rejects_bomb_weight() {
        let mut config = GameConfig::default();
        config.weights.push(PieceWeight {
            kind: PieceKind::Bomb,
            weight: 1,
        });
        assert!(matches!(config.validate(), Err(ConfigError::BombWeight)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_partial_config_uses_defaults() {
        let json = r#"{ "seed": 9, "weights": [{ "kind": "i", "weight": 3 }] }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.weights.len(), 1);
        assert_eq!(config.levels, default_levels());
        assert_eq!(config.bomb_limit, DEFAULT_BOMB_LIMIT);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_level_rows_use_camel_case() {
        let json = r#"{
            "levels": [{
                "level": 1, "teleportValue": 0, "teleportValueAdd": 5,
                "teleportValueDecrease": 1, "speedTime": 2.0, "score": 50,
                "scoreCost": 0, "bombSolidTime": 10
            }],
            "maxTeleportValue": 10
        }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.max_level(), 1);
        assert_eq!(config.level_row(1).bomb_solid_time, 10);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_invalid_surfaces_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ \"levels\": [] }"),
            Err(ConfigError::EmptyLevelTable)
        ));
        assert!(matches!(
            GameConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
