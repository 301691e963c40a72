//! # Entities
//!
//! The universal game object and its Fighter capability.
//!
//! Every interactive thing on a level is an [`Entity`]: the player, monsters,
//! items lying on the floor, corpses. What an entity can *do* is decided by
//! which optional capability records it carries. Capabilities never point back
//! at their owner; code that needs the owner receives its [`EntityId`]
//! explicitly.
//!
//! [`EntityId`]: crate::EntityId

use crate::game::{Ai, Color, Item, Position};

/// What happens when a fighter's hit points run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathKind {
    /// Game over
    Player,
    /// The body stays behind as harmless remains
    Monster,
}

/// Combat capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    /// Experience awarded on death for monsters, accumulated experience for
    /// the player
    pub xp: i32,
    pub on_death: DeathKind,
}

impl Fighter {
    /// Creates a fighter at full health.
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, on_death: DeathKind) -> Self {
        Self {
            max_hp: hp,
            hp,
            defense,
            power,
            xp,
            on_death,
        }
    }

    /// Removes hit points. Returns true when this hit is the one that drops
    /// the fighter to zero or below.
    ///
    /// Non-positive amounts are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{DeathKind, Fighter};
    ///
    /// let mut fighter = Fighter::new(10, 0, 3, 0, DeathKind::Monster);
    /// assert!(!fighter.apply_damage(4));
    /// assert!(fighter.apply_damage(6));
    /// assert!(!fighter.apply_damage(1)); // already down
    /// assert_eq!(fighter.hp, -1);
    /// ```
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return false;
        }
        let was_alive = self.hp > 0;
        self.hp -= amount;
        was_alive && self.hp <= 0
    }

    /// Restores hit points without exceeding the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp).max(self.hp);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// A game object on the level or in the player's pack.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    /// Whether other blocking entities can share this tile
    pub blocks_movement: bool,
    /// Drawn once its tile is explored, even outside the field of view
    pub always_visible: bool,
    /// Draw priority; higher layers are drawn on top
    pub layer: i32,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
}

impl Entity {
    /// Creates a plain entity with no capabilities.
    pub fn new(
        position: Position,
        glyph: char,
        name: impl Into<String>,
        color: Color,
        blocks_movement: bool,
    ) -> Self {
        Self {
            position,
            glyph,
            color,
            name: name.into(),
            blocks_movement,
            always_visible: false,
            layer: 0,
            fighter: None,
            ai: None,
            item: None,
        }
    }

    /// Creates the player character.
    pub fn player(position: Position) -> Self {
        Self::new(position, '@', "player", Color::WHITE, true)
            .with_fighter(Fighter::new(100, 1, 4, 0, DeathKind::Player))
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    /// Euclidean distance to a point.
    pub fn distance(&self, x: i32, y: i32) -> f32 {
        self.position.distance(Position::new(x, y))
    }

    /// Euclidean distance to another entity.
    pub fn distance_to(&self, other: &Entity) -> f32 {
        self.position.distance(other.position)
    }

    /// Whether this entity can still fight.
    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().map(Fighter::is_alive).unwrap_or(false)
    }
}
