//! # Item Generation
//!
//! Item archetypes and the per-room item population pass.

use crate::game::{Color, Entity, Item, ItemEffect, Level, Position, Rect};
use crate::generation::{random_free_tile, Reserved, WeightedTable};
use crate::utils::Dice;
use rand::rngs::StdRng;

pub const HEAL_AMOUNT: i32 = 40;
pub const LIGHTNING_DAMAGE: i32 = 40;
pub const LIGHTNING_RANGE: f32 = 5.0;
pub const CONFUSE_TURNS: u32 = 10;
pub const CONFUSE_RANGE: f32 = 8.0;
pub const FIREBALL_DAMAGE: i32 = 25;
pub const FIREBALL_RADIUS: f32 = 3.0;

/// Named item templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    HealingPotion,
    LightningScroll,
    ConfusionScroll,
    FireballScroll,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::HealingPotion => "healing potion",
            ItemKind::LightningScroll => "scroll of lightning bolt",
            ItemKind::ConfusionScroll => "scroll of confusion",
            ItemKind::FireballScroll => "scroll of fireball",
        }
    }

    pub fn effect(self) -> ItemEffect {
        match self {
            ItemKind::HealingPotion => ItemEffect::Heal {
                amount: HEAL_AMOUNT,
            },
            ItemKind::LightningScroll => ItemEffect::LightningBolt {
                damage: LIGHTNING_DAMAGE,
                range: LIGHTNING_RANGE,
            },
            ItemKind::ConfusionScroll => ItemEffect::Confuse {
                turns: CONFUSE_TURNS,
                range: CONFUSE_RANGE,
            },
            ItemKind::FireballScroll => ItemEffect::Fireball {
                damage: FIREBALL_DAMAGE,
                radius: FIREBALL_RADIUS,
            },
        }
    }

    /// Builds an item of this kind lying at `position`.
    pub fn spawn(self, position: Position) -> Entity {
        let (glyph, color) = match self {
            ItemKind::HealingPotion => ('!', Color::VIOLET),
            ItemKind::LightningScroll => ('#', Color::YELLOW),
            ItemKind::ConfusionScroll => ('#', Color::LIGHT_VIOLET),
            ItemKind::FireballScroll => ('#', Color::ORANGE),
        };
        let mut entity = Entity::new(position, glyph, self.name(), color, false)
            .with_item(Item::new(self.effect()));
        entity.layer = -1;
        entity
    }
}

/// Places items into freshly carved rooms.
#[derive(Debug, Clone)]
pub struct ItemGenerator {
    pub table: WeightedTable<ItemKind>,
}

impl ItemGenerator {
    pub fn new() -> Self {
        Self {
            table: WeightedTable::new(vec![
                (ItemKind::HealingPotion, 70, 1),
                (ItemKind::ConfusionScroll, 10, 2),
                (ItemKind::LightningScroll, 25, 4),
                (ItemKind::FireballScroll, 25, 6),
            ]),
        }
    }

    /// Most items a single room can receive at `depth`.
    pub fn max_per_room(depth: u32) -> i32 {
        (depth / 4 + 1) as i32
    }

    /// Rolls the items of one room and appends them to `spawns`.
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

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}
