use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::CategorySet;

/// Tunables for one play session. All durations are in seconds and are
/// converted to whole tick counts once, at world construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed simulation ticks per second.
    pub tick_rate: u32,
    /// Seconds between bomb placement and natural detonation.
    pub fuse_secs: f32,
    /// Seconds a flame segment stays live.
    pub flame_secs: f32,
    /// Seconds a destructible entity spends dying before removal.
    pub dying_secs: f32,
    /// Blast arm length in cells.
    pub blast_range: u32,
    /// Simultaneous armed bombs the player may have out.
    pub max_bombs: u32,
    /// Seconds between enemy steps.
    pub enemy_step_secs: f32,
    /// Seconds between enemy heading re-rolls.
    pub enemy_turn_secs: f32,
    /// Score granted per enemy kill.
    pub enemy_score: u32,
    /// Categories that stop blast propagation.
    pub obstructs: CategorySet,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            fuse_secs: 4.0,
            flame_secs: 0.4,
            dying_secs: 0.6,
            blast_range: 3,
            max_bombs: 1,
            enemy_step_secs: 0.5,
            enemy_turn_secs: 2.0,
            enemy_score: 100,
            obstructs: CategorySet::WALL.union(CategorySet::BRICK),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick_rate must be nonzero")]
    ZeroTickRate,
    #[error("blast_range must be at least 1")]
    ZeroBlastRange,
    #[error("max_bombs must be at least 1")]
    ZeroMaxBombs,
    #[error("{name} must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },
    #[error("obstruction mask is empty; blast arms would never terminate early")]
    EmptyObstructionMask,
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable configuration before any entity exists. A world is
    /// never constructed from a config that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.blast_range == 0 {
            return Err(ConfigError::ZeroBlastRange);
        }
        if self.max_bombs == 0 {
            return Err(ConfigError::ZeroMaxBombs);
        }
        for (name, value) in [
            ("fuse_secs", self.fuse_secs),
            ("flame_secs", self.flame_secs),
            ("dying_secs", self.dying_secs),
            ("enemy_step_secs", self.enemy_step_secs),
            ("enemy_turn_secs", self.enemy_turn_secs),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }
        if self.obstructs.is_empty() {
            return Err(ConfigError::EmptyObstructionMask);
        }
        Ok(())
    }

    pub(crate) fn timing(&self) -> Timing {
        Timing {
            fuse: self.ticks(self.fuse_secs),
            flame: self.ticks(self.flame_secs),
            dying: self.ticks(self.dying_secs),
            enemy_step: self.ticks(self.enemy_step_secs),
            enemy_turn: self.ticks(self.enemy_turn_secs),
        }
    }

    fn ticks(&self, secs: f32) -> u32 {
        ((secs * self.tick_rate as f32).round() as u32).max(1)
    }
}

/// Second-valued config durations converted to whole tick countdowns.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Timing {
    pub(crate) fuse: u32,
    pub(crate) flame: u32,
    pub(crate) dying: u32,
    pub(crate) enemy_step: u32,
    pub(crate) enemy_turn: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let config = GameConfig {
            tick_rate: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTickRate)));
    }

    #[test]
    fn rejects_zero_blast_range() {
        let config = GameConfig {
            blast_range: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroBlastRange)
        ));
    }

    #[test]
    fn rejects_empty_obstruction_mask() {
        let config = GameConfig {
            obstructs: CategorySet::empty(),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyObstructionMask)
        ));
    }

    #[test]
    fn rejects_non_positive_durations() {
        let config = GameConfig {
            flame_secs: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration {
                name: "flame_secs",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{"blast_range": 5}"#).unwrap();
        assert_eq!(config.blast_range, 5);
        assert_eq!(config.tick_rate, GameConfig::default().tick_rate);
    }

    #[test]
    fn mask_round_trips_through_json() {
        let json = serde_json::to_string(&GameConfig::default()).unwrap();
        let config = GameConfig::from_json(&json).unwrap();
        assert_eq!(config.obstructs, CategorySet::WALL | CategorySet::BRICK);
    }

    #[test]
    fn durations_convert_to_whole_ticks() {
        let timing = GameConfig::default().timing();
        assert_eq!(timing.fuse, 240);
        assert_eq!(timing.flame, 24);
        assert_eq!(timing.dying, 36);
    }
}
