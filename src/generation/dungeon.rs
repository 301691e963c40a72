//! # Dungeon Generation
//!
//! Rooms-and-corridors level layout with whole-level retries.
//!
//! Each attempt scatters rooms at random, keeps the ones that do not touch
//! an earlier room and joins every new room to the previous one with an
//! L-shaped corridor. Rooms are populated the moment they are accepted. An
//! attempt that ends without a free room center for the stairs is thrown
//! away and the level is generated again from scratch.

use crate::game::{is_occupied_or_blocked, Color, Entity, Level, Position, Rect};
use crate::generation::{
    EncounterGenerator, GeneratedLevel, GenerationConfig, Generator, ItemGenerator, Reserved,
};
use crate::utils::{reachable_from, Dice};
use crate::{DelveError, DelveResult};
use log::{debug, error};
use rand::{rngs::StdRng, Rng};

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// This generator creates levels by:
/// 1. Placing rooms randomly, skipping any that intersect an earlier room
/// 2. Connecting each room to the previous one with an L-shaped corridor
/// 3. Populating each room with monsters and items as it is accepted
/// 4. Placing the stairs at the last room center that is still free
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    pub encounters: EncounterGenerator,
    pub items: ItemGenerator,
}

impl DungeonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples a room that fits inside the level.
    fn room_candidate(&self, config: &GenerationConfig, rng: &mut StdRng) -> Rect {
        let w = rng.random_int(config.room_min_size, config.room_max_size);
        let h = rng.random_int(config.room_min_size, config.room_max_size);
        let x = rng.random_int(0, config.width - w - 1);
        let y = rng.random_int(0, config.height - h - 1);
        Rect::new(x, y, w, h)
    }

    /// Joins two room centers with one horizontal and one vertical run.
    fn connect(level: &mut Level, from: Position, to: Position, rng: &mut StdRng) {
        if rng.gen_bool(0.5) {
            level.create_h_corridor(from.x, to.x, from.y);
            level.create_v_corridor(from.y, to.y, to.x);
        } else {
            level.create_v_corridor(from.y, to.y, from.x);
            level.create_h_corridor(from.x, to.x, to.y);
        }
    }

    /// Runs a single layout attempt. `None` means the attempt produced no
    /// usable stairs position and must be discarded.
    fn try_generate(
        &self,
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> Option<GeneratedLevel> {
        let mut level = Level::new(config.width, config.height);
        let mut spawns: Vec<Entity> = Vec::new();

        for _ in 0..config.max_rooms(depth) {
            let room = self.room_candidate(config, rng);
            if level.rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            level.create_room(&room);
            let center = room.center();
            match level.rooms.last() {
                None => level.player_start = center,
                Some(previous) => {
                    let previous = previous.center();
                    Self::connect(&mut level, previous, center, rng);
                }
            }
            level.rooms.push(room);

            let reserved = Reserved {
                player_start: level.player_start,
            };
            self.encounters
                .populate_room(&room, depth, &level, reserved, &mut spawns, rng);
            self.items
                .populate_room(&room, depth, &level, reserved, &mut spawns, rng);
        }

        let player_start = level.player_start;
        let stairs = level
            .rooms
            .iter()
            .rev()
            .map(Rect::center)
            .find(|&center| center != player_start && !is_occupied_or_blocked(&level, &spawns, center))?;
        level.stairs = stairs;
        spawns.push(stairs_entity(stairs));

        Some(GeneratedLevel { level, spawns })
    }
}

/// The marker object drawn on the stairs tile.
pub fn stairs_entity(position: Position) -> Entity {
    let mut stairs = Entity::new(position, '>', "stairs", Color::WHITE, false).always_visible();
    stairs.layer = -2;
    stairs
}

impl Generator<GeneratedLevel> for DungeonGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> DelveResult<GeneratedLevel> {
        config.validate()?;

        for attempt in 1..=config.max_generation_attempts {
            match self.try_generate(config, depth, rng) {
                Some(generated) => {
                    debug!(
                        "{} built depth {} on attempt {}: {} rooms, {} spawns",
                        self.generator_type(),
                        depth,
                        attempt,
                        generated.level.rooms.len(),
                        generated.spawns.len()
                    );
                    #[cfg(debug_assertions)]
                    self.validate(&generated, config)?;
                    return Ok(generated);
                }
                None => debug!(
                    "Depth {} attempt {} left no free room center for the stairs, regenerating",
                    depth, attempt
                ),
            }
        }

        error!(
            "Giving up on depth {} after {} attempts",
            depth, config.max_generation_attempts
        );
        Err(DelveError::GenerationExhausted {
            attempts: config.max_generation_attempts,
        })
    }

    fn validate(&self, generated: &GeneratedLevel, config: &GenerationConfig) -> DelveResult<()> {
        let level = &generated.level;
        if level.width != config.width || level.height != config.height {
            return Err(DelveError::InvalidState(format!(
                "level is {}x{} but {}x{} was requested",
                level.width, level.height, config.width, config.height
            )));
        }
        if level.rooms.is_empty() {
            return Err(DelveError::InvalidState("level has no rooms".to_string()));
        }

        for (i, room) in level.rooms.iter().enumerate() {
            if let Some(other) = level.rooms.iter().skip(i + 1).find(|other| room.intersects(other)) {
                return Err(DelveError::InvalidState(format!(
                    "rooms {:?} and {:?} overlap",
                    room, other
                )));
            }
        }

        if !level.rooms.iter().any(|room| room.center() == level.stairs)
            || level.stairs == level.player_start
            || level.is_blocked(level.stairs)
            || generated
                .spawns
                .iter()
                .any(|entity| entity.blocks_movement && entity.position == level.stairs)
        {
            return Err(DelveError::InvalidState(format!(
                "stairs at {:?} are not on a free room center",
                level.stairs
            )));
        }

        let reachable = reachable_from(level, level.player_start);
        if let Some(room) = level
            .rooms
            .iter()
            .find(|room| !reachable.contains(&room.center()))
        {
            return Err(DelveError::InvalidState(format!(
                "room {:?} is not connected to the player start",
                room
            )));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generate(seed: u64, depth: u32) -> GeneratedLevel {
        let generator = DungeonGenerator::new();
        let mut rng = StdRng::seed_from_u64(seed);
        generator
            .generate(&GenerationConfig::default(), depth, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_generation_is_valid() {
        let generator = DungeonGenerator::new();
        let config = GenerationConfig::default();
        for seed in 0..20 {
            let generated = generate(seed, 1 + (seed as u32 % 6));
            assert!(generator.validate(&generated, &config).is_ok());
            assert!(generated.level.floor_count() > 0);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(1234, 3);
        let b = generate(1234, 3);
        assert_eq!(a.level, b.level);
        assert_eq!(a.spawns, b.spawns);
    }

    #[test]
    fn test_player_start_is_first_room_center() {
        let generated = generate(77, 2);
        assert_eq!(
            generated.level.player_start,
            generated.level.rooms[0].center()
        );
        assert!(!generated
            .spawns
            .iter()
            .any(|entity| entity.position == generated.level.player_start));
    }

    #[test]
    fn test_exactly_one_stairs_marker() {
        let generated = generate(5, 1);
        let stairs: Vec<_> = generated
            .spawns
            .iter()
            .filter(|entity| entity.name == "stairs")
            .collect();
        assert_eq!(stairs.len(), 1);
        assert_eq!(stairs[0].position, generated.level.stairs);
        assert!(stairs[0].always_visible);
    }

    #[test]
    fn test_invalid_config_fails_before_generating() {
        let generator = DungeonGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = GenerationConfig {
            room_min_size: 12,
            room_max_size: 10,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            generator.generate(&config, 1, &mut rng),
            Err(DelveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_retry_cap_exhausted() {
        // Only one room fits, so the stairs can never leave the player start
        let generator = DungeonGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = GenerationConfig {
            width: 12,
            height: 12,
            room_min_size: 10,
            room_max_size: 10,
            max_generation_attempts: 5,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            generator.generate(&config, 1, &mut rng),
            Err(DelveError::GenerationExhausted { attempts: 5 })
        ));
    }

    #[test]
    fn test_validate_rejects_disconnected_rooms() {
        let generator = DungeonGenerator::new();
        let config = GenerationConfig::for_testing();
        let mut level = Level::new(config.width, config.height);
        let first = Rect::new(1, 1, 5, 5);
        let second = Rect::new(20, 20, 5, 5);
        level.create_room(&first);
        level.create_room(&second);
        level.rooms = vec![first, second];
        level.player_start = first.center();
        level.stairs = second.center();

        let mut generated = GeneratedLevel {
            level,
            spawns: Vec::new(),
        };
        assert!(generator.validate(&generated, &config).is_err());

        let (from, to) = (first.center(), second.center());
        generated.level.create_h_corridor(from.x, to.x, from.y);
        generated.level.create_v_corridor(from.y, to.y, to.x);
        assert!(generator.validate(&generated, &config).is_ok());
    }
}
