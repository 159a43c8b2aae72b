//! Data-driven level table
//!
//! Read-only per-level configuration, indexed by level number (1-based).
//! The default table reproduces the stock five-level campaign; a replacement
//! can be loaded from JSON and is validated before use.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LEVEL;

/// Errors raised while loading a level table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read level table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level table is empty")]
    Empty,
    #[error("level table has {0} levels, at most {} are supported", MAX_LEVEL)]
    TooManyLevels(usize),
    #[error("levels {0} and {1} are both boss levels")]
    MultipleBossLevels(u32, u32),
    #[error("level {level}: {field} must be positive")]
    NonPositive { level: u32, field: &'static str },
}

/// Boss-level specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDescriptor {
    pub health: f32,
    /// Chase speed (units per tick)
    pub speed: f32,
    /// Base damage; other boss attacks scale from it
    pub attack_damage: f32,
    /// Seconds between attacks (informational, cooldowns are fixed per attack kind)
    pub attack_speed: f32,
    pub minion_count: u32,
    /// Seconds between minion reinforcements
    pub minion_spawn_interval: f32,
}

/// Static configuration for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Live regular enemy cap (0 on the boss level)
    #[serde(default)]
    pub enemy_count: u32,
    /// Base enemy speed (units per tick)
    pub speed: f32,
    /// Seconds between spawn waves
    #[serde(default)]
    pub spawn_interval: f32,
    /// Level score required to complete the level (0 on the boss level)
    #[serde(default)]
    pub score_to_next: u64,
    pub attack_range: f32,
    pub attack_damage: f32,
    /// Seconds between melee hits of one enemy
    pub attack_speed: f32,
    /// Present only on the boss level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss: Option<BossDescriptor>,
}

impl LevelDescriptor {
    fn regular(
        enemy_count: u32,
        speed: f32,
        spawn_interval: f32,
        score_to_next: u64,
        attack_range: f32,
        attack_damage: f32,
        attack_speed: f32,
    ) -> Self {
        Self {
            enemy_count,
            speed,
            spawn_interval,
            score_to_next,
            attack_range,
            attack_damage,
            attack_speed,
            boss: None,
        }
    }

    pub fn is_boss_level(&self) -> bool {
        self.boss.is_some()
    }
}

/// Ordered table of level descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelDescriptor>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelDescriptor::regular(15, 0.022, 2.0, 100, 10.0, 5.0, 2.0),
                LevelDescriptor::regular(30, 0.028, 1.5, 200, 12.0, 8.0, 1.8),
                LevelDescriptor {
                    enemy_count: 0,
                    speed: 0.035,
                    spawn_interval: 0.0,
                    score_to_next: 0,
                    attack_range: 15.0,
                    attack_damage: 10.0,
                    attack_speed: 1.5,
                    boss: Some(BossDescriptor {
                        health: 1000.0,
                        speed: 0.015,
                        attack_damage: 20.0,
                        attack_speed: 3.0,
                        minion_count: 5,
                        minion_spawn_interval: 5.0,
                    }),
                },
                LevelDescriptor::regular(80, 0.04, 1.0, 400, 18.0, 12.0, 1.2),
                LevelDescriptor::regular(120, 0.045, 0.8, 500, 20.0, 15.0, 1.0),
            ],
        }
    }
}

impl LevelTable {
    /// Parse and validate a table from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let table: LevelTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural and numeric sanity
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.levels.is_empty() {
            return Err(TuningError::Empty);
        }
        if self.levels.len() > MAX_LEVEL as usize {
            return Err(TuningError::TooManyLevels(self.levels.len()));
        }

        let mut boss_level: Option<u32> = None;
        for (idx, level) in self.levels.iter().enumerate() {
            let number = idx as u32 + 1;
            let positive = |value: f32, field: &'static str| {
                if value > 0.0 {
                    Ok(())
                } else {
                    Err(TuningError::NonPositive {
                        level: number,
                        field,
                    })
                }
            };
            positive(level.speed, "speed")?;
            positive(level.attack_speed, "attack_speed")?;

            match &level.boss {
                Some(boss) => {
                    if let Some(previous) = boss_level {
                        return Err(TuningError::MultipleBossLevels(previous, number));
                    }
                    boss_level = Some(number);
                    positive(boss.health, "boss.health")?;
                    positive(boss.speed, "boss.speed")?;
                    positive(boss.minion_spawn_interval, "boss.minion_spawn_interval")?;
                }
                None => {
                    positive(level.spawn_interval, "spawn_interval")?;
                    if level.score_to_next == 0 {
                        return Err(TuningError::NonPositive {
                            level: number,
                            field: "score_to_next",
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of playable levels
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Descriptor for a 1-based level number, clamped into the table
    pub fn get(&self, level: u32) -> &LevelDescriptor {
        let idx = (level.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[idx]
    }

    pub fn is_boss_level(&self, level: u32) -> bool {
        self.get(level).is_boss_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = LevelTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.max_level(), 5);
        assert!(table.is_boss_level(3));
        assert!(!table.is_boss_level(1));
        assert_eq!(table.get(1).score_to_next, 100);
        assert_eq!(table.get(5).enemy_count, 120);
    }

    #[test]
    fn test_json_roundtrip_preserves_boss() {
        let table = LevelTable::default();
        let json = table.to_json().unwrap();
        let parsed = LevelTable::from_json(&json).unwrap();
        assert_eq!(parsed, table);
        assert_eq!(parsed.get(3).boss.as_ref().unwrap().health, 1000.0);
    }

    #[test]
    fn test_rejects_two_boss_levels() {
        let mut table = LevelTable::default();
        table.levels[4] = table.levels[2].clone();
        assert!(matches!(
            table.validate(),
            Err(TuningError::MultipleBossLevels(3, 5))
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            LevelTable::from_json("{\"levels\": []}"),
            Err(TuningError::Empty)
        ));
        assert!(matches!(
            LevelTable::from_json("not json"),
            Err(TuningError::Parse(_))
        ));

        let mut table = LevelTable::default();
        table.levels[0].speed = 0.0;
        assert!(matches!(
            table.validate(),
            Err(TuningError::NonPositive { level: 1, field: "speed" })
        ));
    }

    #[test]
    fn test_get_clamps_out_of_range() {
        let table = LevelTable::default();
        assert_eq!(table.get(0), table.get(1));
        assert_eq!(table.get(9), table.get(5));
    }
}
