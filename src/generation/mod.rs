//! # Generation Module
//!
//! Procedural content generation for dungeon levels and their inhabitants.
//!
//! This module provides the layout generator, the weighted archetype tables
//! used to pick monsters and items, and the configuration that drives both.
//! Generators never touch a live session: they take a random source and
//! return a [`GeneratedLevel`] that the session installs.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_MAX_GENERATION_ATTEMPTS,
    DEFAULT_ROOM_MAX_SIZE, DEFAULT_ROOM_MIN_SIZE, MAX_ROOMS_CEILING,
};
use crate::game::{is_occupied_or_blocked, Entity, Level, Position, Rect};
use crate::utils::Dice;
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the level dimensions, the room size range, how the room budget
/// grows with depth and how often a degenerate level may be regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Level width in tiles
    pub width: i32,
    /// Level height in tiles
    pub height: i32,
    /// Minimum room size, walls included
    pub room_min_size: i32,
    /// Maximum room size, walls included
    pub room_max_size: i32,
    /// Room placement attempts on the first level
    pub rooms_base: u32,
    /// Extra room placement attempts per level of depth
    pub rooms_per_depth: u32,
    /// Upper bound on room placement attempts
    pub rooms_ceiling: u32,
    /// Whole-level regenerations allowed before giving up
    pub max_generation_attempts: u32,
}

impl GenerationConfig {
    /// Creates a configuration for a level of the given size with default
    /// room parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(60, 30);
    /// assert!(config.room_min_size >= 3);
    /// assert!(config.room_max_size >= config.room_min_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            room_min_size: DEFAULT_ROOM_MIN_SIZE,
            room_max_size: DEFAULT_ROOM_MAX_SIZE,
            rooms_base: 3,
            rooms_per_depth: 3,
            rooms_ceiling: MAX_ROOMS_CEILING,
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }

    /// Creates a small configuration suitable for fast tests.
    pub fn for_testing() -> Self {
        Self {
            room_min_size: 4,
            room_max_size: 8,
            ..Self::new(40, 30)
        }
    }

    /// Number of room placement attempts at `depth`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::default();
    /// assert_eq!(config.max_rooms(1), 6);
    /// assert_eq!(config.max_rooms(4), 15);
    /// assert_eq!(config.max_rooms(50), 30);
    /// ```
    pub fn max_rooms(&self, depth: u32) -> u32 {
        self.checked_max_rooms(depth)
            .unwrap_or(self.rooms_ceiling)
            .min(self.rooms_ceiling)
    }

    /// Uncapped room attempts for `depth`, or `None` if the scaling
    /// overflows.
    fn checked_max_rooms(&self, depth: u32) -> Option<u32> {
        depth
            .checked_mul(self.rooms_per_depth)?
            .checked_add(self.rooms_base)
    }

    /// Rejects parameters that can never produce a level.
    pub fn validate(&self) -> DelveResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DelveError::InvalidConfig(format!(
                "level dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.room_min_size < 3 {
            return Err(DelveError::InvalidConfig(format!(
                "room_min_size must be at least 3, got {}",
                self.room_min_size
            )));
        }
        if self.room_min_size > self.room_max_size {
            return Err(DelveError::InvalidConfig(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            )));
        }
        if self.room_max_size > self.width - 2 || self.room_max_size > self.height - 2 {
            return Err(DelveError::InvalidConfig(format!(
                "rooms up to {} tiles do not fit a {}x{} level",
                self.room_max_size, self.width, self.height
            )));
        }
        if self.checked_max_rooms(1).is_none() {
            return Err(DelveError::InvalidConfig(format!(
                "rooms_base {} plus rooms_per_depth {} overflows",
                self.rooms_base, self.rooms_per_depth
            )));
        }
        if self.rooms_ceiling == 0 || self.max_rooms(1) == 0 {
            return Err(DelveError::InvalidConfig(
                "at least one room placement attempt is required".to_string(),
            ));
        }
        if self.max_generation_attempts == 0 {
            return Err(DelveError::InvalidConfig(
                "max_generation_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT)
    }
}

/// A freshly generated level and the entities that start on it.
///
/// The player is not part of `spawns`; the session places its own player at
/// `level.player_start`.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub level: Level,
    pub spawns: Vec<Entity>,
}

/// Trait for procedural generators.
///
/// All generation systems implement this trait, so levels can be produced,
/// checked and logged through one interface.
pub trait Generator<T> {
    /// Generates content for the given depth.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng)
        -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// One row of a weighted archetype table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEntry<T> {
    pub value: T,
    pub weight: u32,
    /// Shallowest depth at which this entry can be drawn
    pub min_depth: u32,
}

/// Depth-gated weighted table.
///
/// Only entries whose `min_depth` has been reached take part in a draw, and
/// the draw is a cumulative-weight roll over those entries alone.
///
/// # Examples
///
/// ```
/// use delve::WeightedTable;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let table = WeightedTable::new(vec![("rat", 10, 1), ("dragon", 1, 20)]);
/// let mut rng = StdRng::seed_from_u64(1);
/// assert_eq!(table.total_weight(1), 10);
/// assert_eq!(table.pick(1, &mut rng), Some("rat"));
/// assert_eq!(table.total_weight(20), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTable<T> {
    entries: Vec<WeightedEntry<T>>,
}

impl<T: Copy> WeightedTable<T> {
    /// Builds a table from `(value, weight, min_depth)` rows.
    pub fn new(rows: Vec<(T, u32, u32)>) -> Self {
        Self {
            entries: rows
                .into_iter()
                .map(|(value, weight, min_depth)| WeightedEntry {
                    value,
                    weight,
                    min_depth,
                })
                .collect(),
        }
    }

    /// Entries available at `depth`, in table order.
    pub fn eligible(&self, depth: u32) -> impl Iterator<Item = &WeightedEntry<T>> {
        self.entries
            .iter()
            .filter(move |entry| entry.min_depth <= depth && entry.weight > 0)
    }

    pub fn total_weight(&self, depth: u32) -> u32 {
        self.eligible(depth).map(|entry| entry.weight).sum()
    }

    /// Draws one value, or `None` when nothing is eligible yet.
    pub fn pick<R: Rng + ?Sized>(&self, depth: u32, rng: &mut R) -> Option<T> {
        let total = self.total_weight(depth);
        if total == 0 {
            return None;
        }
        let mut roll = rng.random_int(1, total as i32) as u32;
        for entry in self.eligible(depth) {
            if roll <= entry.weight {
                return Some(entry.value);
            }
            roll -= entry.weight;
        }
        None
    }
}

/// Tiles that population must treat as taken besides terrain and spawns.
#[derive(Debug, Clone, Copy)]
pub struct Reserved {
    pub player_start: Position,
}

/// Picks a random interior tile of `room`, or `None` if the tile drawn is
/// already taken. A taken tile is skipped rather than redrawn.
pub fn random_free_tile(
    room: &Rect,
    level: &Level,
    spawns: &[Entity],
    reserved: Reserved,
    rng: &mut StdRng,
) -> Option<Position> {
    let pos = Position::new(
        rng.random_int(room.x1 + 1, room.x2 - 1),
        rng.random_int(room.y1 + 1, room.y2 - 1),
    );
    if pos == reserved.player_start || is_occupied_or_blocked(level, spawns, pos) {
        None
    } else {
        Some(pos)
    }
}
