//! # Configuration
//!
//! Game-wide constants and the serde-backed configuration documents.
//!
//! Every field of [`GameConfig`] has a default, so a JSON file only needs to
//! name the values it wants to change.

use crate::generation::GenerationConfig;
use crate::game::FovAlgorithm;
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default dungeon width in tiles
pub const DEFAULT_MAP_WIDTH: i32 = 80;

/// Default dungeon height in tiles
pub const DEFAULT_MAP_HEIGHT: i32 = 43;

/// Smallest room edge, walls included
pub const DEFAULT_ROOM_MIN_SIZE: i32 = 6;

/// Largest room edge, walls included
pub const DEFAULT_ROOM_MAX_SIZE: i32 = 10;

/// Hard ceiling on rooms attempted per level
pub const MAX_ROOMS_CEILING: u32 = 30;

/// Whole-level regeneration attempts before generation is declared hopeless
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 100;

/// Sight radius of the player
pub const DEFAULT_FOV_RADIUS: i32 = 10;

/// One inventory slot per letter of the alphabet
pub const INVENTORY_CAPACITY: usize = 26;

/// Menus can only offer as many options as there are selection letters
pub const MAX_MENU_OPTIONS: usize = 26;

/// Number of lines kept in the message log
pub const DEFAULT_MESSAGE_LINES: usize = 7;

/// Experience needed for the first level-up
pub const LEVEL_UP_BASE: i32 = 200;

/// Additional experience needed per character level
pub const LEVEL_UP_FACTOR: i32 = 150;

/// Tunable game rules that are not about level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Sight radius used for the player's field of view
    pub fov_radius: i32,
    /// Whether walls bordering lit floor are themselves visible
    pub light_walls: bool,
    /// Which FOV algorithm computes visibility
    pub fov_algorithm: FovAlgorithm,
    /// Scale every hit by a random 75%-125% factor
    pub damage_jitter: bool,
    /// Experience needed for the first level-up
    pub level_up_base: i32,
    /// Additional experience needed per character level
    pub level_up_factor: i32,
    /// Number of lines kept in the message log
    pub message_lines: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fov_radius: DEFAULT_FOV_RADIUS,
            light_walls: true,
            fov_algorithm: FovAlgorithm::Shadowcast,
            damage_jitter: false,
            level_up_base: LEVEL_UP_BASE,
            level_up_factor: LEVEL_UP_FACTOR,
            message_lines: DEFAULT_MESSAGE_LINES,
        }
    }
}

impl RulesConfig {
    /// Rejects rule sets that would make the game unplayable.
    pub fn validate(&self) -> DelveResult<()> {
        if self.fov_radius < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "fov_radius must be at least 1, got {}",
                self.fov_radius
            )));
        }
        if self.level_up_base < 1 || self.level_up_factor < 0 {
            return Err(DelveError::InvalidConfig(
                "level-up thresholds must be positive".to_string(),
            ));
        }
        if self.checked_level_up_threshold(1).is_none() {
            return Err(DelveError::InvalidConfig(format!(
                "level_up_base {} plus level_up_factor {} overflows",
                self.level_up_base, self.level_up_factor
            )));
        }
        if self.message_lines == 0 {
            return Err(DelveError::InvalidConfig(
                "message log needs at least one line".to_string(),
            ));
        }
        Ok(())
    }

    /// Experience required to advance from `level` to `level + 1`.
    ///
    /// Saturates at `i32::MAX` once the scaling overflows.
    pub fn level_up_threshold(&self, level: u32) -> i32 {
        self.checked_level_up_threshold(level).unwrap_or(i32::MAX)
    }

    fn checked_level_up_threshold(&self, level: u32) -> Option<i32> {
        i32::try_from(level)
            .ok()?
            .checked_mul(self.level_up_factor)?
            .checked_add(self.level_up_base)
    }
}

/// Complete configuration of a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Level layout parameters
    pub generation: GenerationConfig,
    /// Combat, sight and progression rules
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Loads a configuration document from a JSON file.
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load_from_path(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates both halves of the configuration.
    pub fn validate(&self) -> DelveResult<()> {
        self.generation
            .validate()
            .and_then(|()| self.rules.validate())
            .inspect_err(|e| log::warn!("Rejected configuration: {}", e))
    }
}
