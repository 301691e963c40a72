//! # Game State Module
//!
//! Central game state management and coordination between all game systems.
//!
//! [`GameSession`] owns the active level, the entity arena, the inventory,
//! the message log, the random source and the player's view. Every
//! operation that changes the simulation goes through it; capabilities
//! receive the session and the [`EntityId`] they act for.

use crate::config::GameConfig;
use crate::game::{
    is_occupied_or_blocked, Entity, EntityId, Fighter, Level, MessageLog, MessageTone, Position,
    Visibility,
};
use crate::generation::{DungeonGenerator, GeneratedLevel, Generator};
use crate::utils::{step_towards, Dice};
use crate::DelveResult;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use slotmap::SlotMap;

/// Whether the session still accepts gameplay intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Terminal. Start a new session to play again.
    Dead,
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatistics {
    /// Number of monsters killed
    pub monsters_killed: u32,
    /// Number of items consumed
    pub items_used: u32,
    /// Number of successful player steps
    pub steps_taken: u64,
    /// Deepest level reached
    pub max_depth_reached: u32,
}

/// The single owner of all mutable game state.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    /// The active level
    pub level: Level,
    /// Every entity, on the level or in the pack
    pub entities: SlotMap<EntityId, Entity>,
    /// Entities on the level in turn order, player first
    pub objects: Vec<EntityId>,
    /// Entities carried by the player, in pick-up order
    pub inventory: Vec<EntityId>,
    pub player: EntityId,
    /// Character level, starting at 1
    pub player_level: u32,
    /// Dungeon depth, starting at 1
    pub depth: u32,
    /// Number of turns the player has taken
    pub turn: u64,
    pub status: GameStatus,
    pub messages: MessageLog,
    pub visibility: Visibility,
    pub stats: GameStatistics,
    /// Seed the session was started from
    pub seed: u64,
    rng: StdRng,
    generator: DungeonGenerator,
}

impl GameSession {
    /// Starts a new game on a freshly generated first level.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameConfig, GameSession, GameStatus};
    ///
    /// let session = GameSession::new(GameConfig::default(), 42).unwrap();
    /// assert_eq!(session.depth, 1);
    /// assert_eq!(session.status, GameStatus::Playing);
    /// assert_eq!(session.player_position(), session.level.player_start);
    /// ```
    pub fn new(config: GameConfig, seed: u64) -> DelveResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = DungeonGenerator::new();
        let generated = generator.generate(&config.generation, 1, &mut rng)?;
        Ok(Self::assemble(config, seed, rng, generator, generated))
    }

    /// Starts a new game on a prepared level instead of a generated one.
    pub fn with_level(config: GameConfig, seed: u64, generated: GeneratedLevel) -> DelveResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(seed);
        Ok(Self::assemble(
            config,
            seed,
            rng,
            DungeonGenerator::new(),
            generated,
        ))
    }

    fn assemble(
        config: GameConfig,
        seed: u64,
        rng: StdRng,
        generator: DungeonGenerator,
        generated: GeneratedLevel,
    ) -> Self {
        let GeneratedLevel { level, spawns } = generated;
        let mut entities = SlotMap::with_key();
        let player = entities.insert(Entity::player(level.player_start));
        let mut session = Self {
            visibility: Visibility::new(&level, &config.rules),
            messages: MessageLog::new(config.rules.message_lines),
            config,
            level,
            entities,
            objects: vec![player],
            inventory: Vec::new(),
            player,
            player_level: 1,
            depth: 1,
            turn: 0,
            status: GameStatus::Playing,
            stats: GameStatistics {
                max_depth_reached: 1,
                ..GameStatistics::default()
            },
            seed,
            rng,
            generator,
        };
        for entity in spawns {
            session.spawn(entity);
        }
        info!("New game started with seed {}", seed);
        session.message(
            "Welcome stranger! Prepare to perish in the Tombs of the Ancient Kings.",
            MessageTone::Warning,
        );
        session
    }

    /// Rests, then replaces the level with a freshly generated deeper one.
    ///
    /// On a generation failure the session keeps its current level.
    pub fn next_level(&mut self) -> DelveResult<()> {
        let generated = self
            .generator
            .generate(&self.config.generation, self.depth + 1, &mut self.rng)?;

        self.message(
            "You take a moment to rest, and recover your strength.",
            MessageTone::Magic,
        );
        let half = self.player_fighter().map(|f| f.max_hp / 2).unwrap_or(0);
        self.heal(self.player, half);
        self.message(
            "After a rare moment of peace, you descend deeper into the heart of the dungeon...",
            MessageTone::Danger,
        );

        self.depth += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(self.depth);
        self.install_level(generated);
        info!("Descended to depth {}", self.depth);
        Ok(())
    }

    /// Swaps in a new level. Everything on the old level is discarded; the
    /// player and the inventory carry over.
    fn install_level(&mut self, generated: GeneratedLevel) {
        let GeneratedLevel { level, spawns } = generated;
        for id in std::mem::take(&mut self.objects) {
            if id != self.player {
                self.entities.remove(id);
            }
        }
        self.level = level;
        self.objects.push(self.player);
        let start = self.level.player_start;
        if let Some(player) = self.entity_mut(self.player) {
            player.position = start;
        }
        for entity in spawns {
            self.spawn(entity);
        }
        self.visibility.reset_for_level(&self.level);
    }

    /// Adds an entity to the level, after everything already there.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        self.objects.push(id);
        id
    }

    /// Takes an entity off the level without destroying it.
    pub fn remove_object(&mut self, id: EntityId) {
        self.objects.retain(|&other| other != id);
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Display name of an entity, or an empty string for a stale handle.
    pub fn name_of(&self, id: EntityId) -> String {
        self.entity(id)
            .map(|entity| entity.name.clone())
            .unwrap_or_default()
    }

    pub fn player_fighter(&self) -> Option<&Fighter> {
        self.entity(self.player)
            .and_then(|entity| entity.fighter.as_ref())
    }

    pub fn player_position(&self) -> Position {
        self.entity(self.player)
            .map(|entity| entity.position)
            .unwrap_or(self.level.player_start)
    }

    pub fn player_is_alive(&self) -> bool {
        self.status == GameStatus::Playing
            && self.entity(self.player).is_some_and(Entity::is_alive)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Rolls an integer in `min..=max` from the session's random source.
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.random_int(min, max)
    }

    pub fn message(&mut self, text: impl Into<String>, tone: MessageTone) {
        self.messages.add(text, tone);
    }

    /// Whether terrain or a blocking object on the level occupies `pos`.
    pub fn is_occupied_or_blocked(&self, pos: Position) -> bool {
        is_occupied_or_blocked(
            &self.level,
            self.objects.iter().filter_map(|&id| self.entities.get(id)),
            pos,
        )
    }

    /// The living fighter standing on `pos`, if any.
    pub fn fighter_at(&self, pos: Position) -> Option<EntityId> {
        self.objects.iter().copied().find(|&id| {
            self.entity(id)
                .is_some_and(|entity| entity.position == pos && entity.fighter.is_some())
        })
    }

    /// The first item lying on `pos`, in collection order.
    pub fn item_at(&self, pos: Position) -> Option<EntityId> {
        self.objects.iter().copied().find(|&id| {
            self.entity(id)
                .is_some_and(|entity| entity.position == pos && entity.item.is_some())
        })
    }

    /// Moves an entity by a delta if the destination is free. Returns
    /// whether it moved.
    pub fn move_by(&mut self, id: EntityId, dx: i32, dy: i32) -> bool {
        let Some(from) = self.entity(id).map(|entity| entity.position) else {
            return false;
        };
        let to = from + Position::new(dx, dy);
        if self.is_occupied_or_blocked(to) {
            return false;
        }
        if let Some(entity) = self.entity_mut(id) {
            entity.position = to;
        }
        if id == self.player {
            self.visibility.mark_dirty();
        }
        true
    }

    /// Takes one step along the rounded unit vector towards `target`.
    pub fn move_towards(&mut self, id: EntityId, target: Position) -> bool {
        let Some(from) = self.entity(id).map(|entity| entity.position) else {
            return false;
        };
        let step = step_towards(from, target);
        if step == Position::default() {
            return false;
        }
        self.move_by(id, step.x, step.y)
    }

    /// The step directly away from `target`, or `None` if that cell is
    /// taken or the entity is standing on `target`.
    pub fn evade_vector(&self, id: EntityId, target: Position) -> Option<Position> {
        let from = self.entity(id)?.position;
        let toward = step_towards(from, target);
        if toward == Position::default() {
            return None;
        }
        let away = Position::new(-toward.x, -toward.y);
        if self.is_occupied_or_blocked(from + away) {
            None
        } else {
            Some(away)
        }
    }

    /// Euclidean distance between two entities; infinite for a stale handle.
    pub fn distance_between(&self, a: EntityId, b: EntityId) -> f32 {
        match (self.entity(a), self.entity(b)) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => f32::INFINITY,
        }
    }

    /// Draws the entity beneath every other object.
    pub fn send_to_back(&mut self, id: EntityId) {
        let lowest = self.layer_bound(id, std::cmp::min).unwrap_or(0);
        if let Some(entity) = self.entity_mut(id) {
            entity.layer = lowest - 1;
        }
    }

    /// Draws the entity above every other object.
    pub fn bring_to_front(&mut self, id: EntityId) {
        let highest = self.layer_bound(id, std::cmp::max).unwrap_or(0);
        if let Some(entity) = self.entity_mut(id) {
            entity.layer = highest + 1;
        }
    }

    fn layer_bound(&self, except: EntityId, pick: fn(i32, i32) -> i32) -> Option<i32> {
        self.objects
            .iter()
            .filter(|&&id| id != except)
            .filter_map(|&id| self.entity(id))
            .map(|entity| entity.layer)
            .reduce(pick)
    }

    /// Displayable objects from bottom to top. Ties keep collection order.
    pub fn draw_order(&self) -> Vec<EntityId> {
        let mut order: Vec<EntityId> = self
            .objects
            .iter()
            .copied()
            .filter(|&id| {
                self.entity(id)
                    .is_some_and(|entity| self.visibility.can_display(&self.level, entity))
            })
            .collect();
        order.sort_by_key(|&id| self.entity(id).map(|entity| entity.layer).unwrap_or(0));
        order
    }

    /// Recomputes the field of view if the player moved or the level
    /// changed.
    pub fn refresh_visibility(&mut self) -> bool {
        let observer = self.player_position();
        self.visibility.refresh(&mut self.level, observer)
    }
}
