//! TOML-backed configuration for generation and run tuning. Every field has a default, so an
//! empty file is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::loadout::{PlayerStats, WeaponKind};
use crate::mapgen::GenerationOptions;

pub const DEFAULT_BOSS_HEALTH: i32 = 400;
pub const DEFAULT_ENEMY_HEALTH: i32 = 20;
pub const DEFAULT_CONSUMABLE_HEAL: i32 = 25;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardConfig {
    pub generation: GenerationOptions,
    pub run: RunConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub boss_health: i32,
    pub enemy_health: i32,
    pub consumable_heal: i32,
    /// Weapon key; unknown keys fall back to the default weapon.
    pub starting_weapon: String,
    /// Fixed trait keys instead of a seeded roll. Unknown keys are dropped.
    pub starting_traits: Option<Vec<String>>,
    pub base_stats: PlayerStats,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            boss_health: DEFAULT_BOSS_HEALTH,
            enemy_health: DEFAULT_ENEMY_HEALTH,
            consumable_heal: DEFAULT_CONSUMABLE_HEAL,
            starting_weapon: WeaponKind::default().key().to_string(),
            starting_traits: None,
            base_stats: PlayerStats::default(),
        }
    }
}

impl RunConfig {
    pub fn starting_weapon_kind(&self) -> WeaponKind {
        WeaponKind::from_key(&self.starting_weapon)
    }
}

impl WardConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded ward config");
        Ok(config)
    }
}
