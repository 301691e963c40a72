//! # Encounter Generation
//!
//! Monster archetypes and the per-room monster population pass.

use crate::game::{Ai, Color, DeathKind, Entity, Fighter, Level, Position, Rect};
use crate::generation::{random_free_tile, Reserved, WeightedTable};
use crate::utils::Dice;
use rand::rngs::StdRng;

/// Named monster templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    Orc,
    GoblinArcher,
    Troll,
    OgreChieftain,
}

impl MonsterKind {
    pub fn name(self) -> &'static str {
        match self {
            MonsterKind::Orc => "orc",
            MonsterKind::GoblinArcher => "goblin archer",
            MonsterKind::Troll => "troll",
            MonsterKind::OgreChieftain => "ogre chieftain",
        }
    }

    /// Builds a fresh monster of this kind standing at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Ai, MonsterKind, Position};
    ///
    /// let troll = MonsterKind::Troll.spawn(Position::new(4, 2));
    /// assert_eq!(troll.name, "troll");
    /// assert!(troll.blocks_movement);
    /// assert_eq!(troll.ai, Some(Ai::Basic));
    /// ```
    pub fn spawn(self, position: Position) -> Entity {
        let (glyph, color, fighter, ai) = match self {
            MonsterKind::Orc => (
                'o',
                Color::DESATURATED_GREEN,
                Fighter::new(20, 0, 4, 35, DeathKind::Monster),
                Ai::Basic,
            ),
            MonsterKind::GoblinArcher => (
                'a',
                Color::DARK_ORANGE,
                Fighter::new(12, 0, 3, 50, DeathKind::Monster),
                Ai::ranged(2.0, 6.0, 2),
            ),
            MonsterKind::Troll => (
                'T',
                Color::DARKER_GREEN,
                Fighter::new(30, 2, 8, 100, DeathKind::Monster),
                Ai::Basic,
            ),
            MonsterKind::OgreChieftain => (
                'O',
                Color::CRIMSON,
                Fighter::new(60, 3, 9, 400, DeathKind::Monster),
                Ai::Boss { charged: false },
            ),
        };
        Entity::new(position, glyph, self.name(), color, true)
            .with_fighter(fighter)
            .with_ai(ai)
    }
}

/// Places monsters into freshly carved rooms.
#[derive(Debug, Clone)]
pub struct EncounterGenerator {
    pub table: WeightedTable<MonsterKind>,
}

impl EncounterGenerator {
    pub fn new() -> Self {
        Self {
            table: WeightedTable::new(vec![
                (MonsterKind::Orc, 80, 1),
                (MonsterKind::GoblinArcher, 25, 2),
                (MonsterKind::Troll, 20, 3),
                (MonsterKind::OgreChieftain, 5, 5),
            ]),
        }
    }

    /// Most monsters a single room can receive at `depth`.
    pub fn max_per_room(depth: u32) -> i32 {
        (depth / 3 + 2) as i32
    }

    /// Rolls the monsters of one room and appends them to `spawns`.
    /// Returns how many were placed.
    pub fn populate_room(
        &self,
        room: &Rect,
        depth: u32,
        level: &Level,
        reserved: Reserved,
        spawns: &mut Vec<Entity>,
        rng: &mut StdRng,
    ) -> usize {
        let count = rng.random_int(0, Self::max_per_room(depth));
        let mut placed = 0;
        for _ in 0..count {
            let Some(pos) = random_free_tile(room, level, spawns, reserved, rng) else {
                continue;
            };
            if let Some(kind) = self.table.pick(depth, rng) {
                spawns.push(kind.spawn(pos));
                placed += 1;
            }
        }
        placed
    }
}

impl Default for EncounterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_only_orcs_on_first_level() {
        let generator = EncounterGenerator::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..300 {
            assert_eq!(generator.table.pick(1, &mut rng), Some(MonsterKind::Orc));
        }
    }

    #[test]
    fn test_boss_only_deep() {
        let generator = EncounterGenerator::new();
        let mut rng = StdRng::seed_from_u64(12);
        let shallow: Vec<_> = (0..500).filter_map(|_| generator.table.pick(4, &mut rng)).collect();
        assert!(!shallow.contains(&MonsterKind::OgreChieftain));
        assert!(shallow.contains(&MonsterKind::Troll));
        assert!(shallow.contains(&MonsterKind::GoblinArcher));

        let deep: Vec<_> = (0..2000).filter_map(|_| generator.table.pick(5, &mut rng)).collect();
        assert!(deep.contains(&MonsterKind::OgreChieftain));
    }

    #[test]
    fn test_populate_room_never_stacks_monsters() {
        let generator = EncounterGenerator::new();
        let mut level = Level::new(20, 20);
        let room = Rect::new(1, 1, 4, 4);
        level.create_room(&room);
        let reserved = Reserved {
            player_start: room.center(),
        };
        let mut rng = StdRng::seed_from_u64(21);
        let mut spawns = Vec::new();
        for _ in 0..20 {
            generator.populate_room(&room, 9, &level, reserved, &mut spawns, &mut rng);
        }

        assert!(spawns.len() <= 8);
        for (i, a) in spawns.iter().enumerate() {
            assert!(room.contains_floor(a.position));
            assert_ne!(a.position, reserved.player_start);
            for b in spawns.iter().skip(i + 1) {
                assert_ne!(a.position, b.position);
            }
        }
    }

    #[test]
    fn test_archer_starts_loaded() {
        let archer = MonsterKind::GoblinArcher.spawn(Position::new(0, 0));
        match archer.ai {
            Some(Ai::Ranged { ammo, capacity, .. }) => assert_eq!(ammo, capacity),
            other => panic!("unexpected ai {:?}", other),
        }
    }
}
