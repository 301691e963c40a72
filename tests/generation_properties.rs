//! Property tests for level generation.

use delve::{reachable_from, DungeonGenerator, GeneratedLevel, GenerationConfig, Generator};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn generate(seed: u64, depth: u32) -> GeneratedLevel {
    let mut rng = StdRng::seed_from_u64(seed);
    DungeonGenerator::new()
        .generate(&GenerationConfig::default(), depth, &mut rng)
        .expect("default config generates")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_rooms_never_overlap(seed in any::<u64>(), depth in 1u32..12) {
        let generated = generate(seed, depth);
        let rooms = &generated.level.rooms;
        prop_assert!(!rooms.is_empty());
        prop_assert!(rooms.len() as u32 <= GenerationConfig::default().max_rooms(depth));
        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                prop_assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_every_room_is_reachable(seed in any::<u64>(), depth in 1u32..12) {
        let generated = generate(seed, depth);
        let level = &generated.level;
        let reachable = reachable_from(level, level.player_start);
        for room in &level.rooms {
            for pos in room.floor_positions() {
                prop_assert!(reachable.contains(&pos), "{:?} unreachable", pos);
            }
        }
        prop_assert!(reachable.contains(&level.stairs));
    }

    #[test]
    fn test_stairs_on_free_room_center(seed in any::<u64>(), depth in 1u32..12) {
        let generated = generate(seed, depth);
        let level = &generated.level;
        prop_assert_eq!(level.player_start, level.rooms[0].center());
        prop_assert_ne!(level.stairs, level.player_start);
        prop_assert!(level.rooms.iter().any(|room| room.center() == level.stairs));
        prop_assert!(!generated
            .spawns
            .iter()
            .any(|entity| entity.blocks_movement && entity.position == level.stairs));
        let markers = generated.spawns.iter().filter(|entity| entity.glyph == '>').count();
        prop_assert_eq!(markers, 1);
    }

    #[test]
    fn test_spawns_stay_in_rooms(seed in any::<u64>(), depth in 1u32..12) {
        let generated = generate(seed, depth);
        let level = &generated.level;
        for entity in &generated.spawns {
            prop_assert!(level.rooms.iter().any(|room| room.contains_floor(entity.position)));
            prop_assert_ne!(entity.position, level.player_start);
        }
        let blockers: Vec<_> = generated
            .spawns
            .iter()
            .filter(|entity| entity.blocks_movement)
            .map(|entity| entity.position)
            .collect();
        let mut unique = blockers.clone();
        unique.sort_by_key(|pos| (pos.x, pos.y));
        unique.dedup();
        prop_assert_eq!(unique.len(), blockers.len());
    }

    #[test]
    fn test_depth_gates_spawn_tables(seed in any::<u64>(), depth in 1u32..5) {
        let generated = generate(seed, depth);
        for entity in &generated.spawns {
            if depth < 2 {
                prop_assert_ne!(entity.name.as_str(), "goblin archer");
                prop_assert_ne!(entity.name.as_str(), "scroll of confusion");
            }
            if depth < 3 {
                prop_assert_ne!(entity.name.as_str(), "troll");
            }
            if depth < 4 {
                prop_assert_ne!(entity.name.as_str(), "scroll of lightning bolt");
            }
            prop_assert_ne!(entity.name.as_str(), "ogre chieftain");
            prop_assert_ne!(entity.name.as_str(), "scroll of fireball");
        }
    }

    #[test]
    fn test_same_seed_same_level(seed in any::<u64>()) {
        let a = generate(seed, 3);
        let b = generate(seed, 3);
        prop_assert_eq!(a.level, b.level);
        prop_assert_eq!(a.spawns, b.spawns);
    }
}
