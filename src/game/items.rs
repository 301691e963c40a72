//! # Items
//!
//! The Item capability, inventory handling and item effects.

use crate::config::INVENTORY_CAPACITY;
use crate::game::{Ai, EntityId, GameSession, MessageTone, PlayerAction};
use crate::input::{menu, Frontend};
use crate::DelveResult;
use log::debug;

/// What an item does when used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemEffect {
    /// Restore the player's hit points
    Heal { amount: i32 },
    /// Strike the closest visible monster within range
    LightningBolt { damage: i32, range: f32 },
    /// Confuse a chosen monster within range
    Confuse { turns: u32, range: f32 },
    /// Burn every fighter around a chosen tile, the player included
    Fireball { damage: i32, radius: f32 },
}

/// Item capability. Items without an effect can be carried but not used.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub effect: Option<ItemEffect>,
}

impl Item {
    pub fn new(effect: ItemEffect) -> Self {
        Self {
            effect: Some(effect),
        }
    }

    /// An item with no use.
    pub fn inert() -> Self {
        Self { effect: None }
    }
}

/// Outcome of applying an item effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseResult {
    Consumed,
    Cancelled,
}

impl GameSession {
    /// Moves an item from the level into the inventory.
    ///
    /// Returns false, leaving the item where it is, when the inventory is
    /// full or `item` is not a pick-up-able object on the level.
    pub fn pick_up(&mut self, item: EntityId) -> bool {
        let Some(name) = self
            .entity(item)
            .filter(|entity| entity.item.is_some())
            .map(|entity| entity.name.clone())
        else {
            return false;
        };
        if !self.objects.contains(&item) {
            return false;
        }
        if self.inventory.len() >= INVENTORY_CAPACITY {
            self.message(
                format!("Your inventory is full, cannot pick up {}.", name),
                MessageTone::Danger,
            );
            return false;
        }
        self.remove_object(item);
        self.inventory.push(item);
        self.message(format!("You picked up a {}!", name), MessageTone::Success);
        true
    }

    /// Puts the item in inventory `slot` down on the player's tile.
    pub fn drop_item(&mut self, slot: usize) -> bool {
        if slot >= self.inventory.len() {
            return false;
        }
        let item = self.inventory.remove(slot);
        let position = self.player_position();
        let Some(entity) = self.entity_mut(item) else {
            return false;
        };
        entity.position = position;
        let name = entity.name.clone();
        self.objects.push(item);
        self.send_to_back(item);
        self.message(format!("You dropped a {}.", name), MessageTone::Warning);
        true
    }

    /// Uses the item in inventory `slot`. Consumed items leave the game.
    pub fn use_item(&mut self, slot: usize, frontend: &mut dyn Frontend) -> PlayerAction {
        let Some(&item) = self.inventory.get(slot) else {
            return PlayerAction::DidntTakeTurn;
        };
        let Some(entity) = self.entity(item) else {
            return PlayerAction::DidntTakeTurn;
        };
        let name = entity.name.clone();
        let Some(effect) = entity.item.as_ref().and_then(|item| item.effect) else {
            self.message(format!("The {} cannot be used.", name), MessageTone::Warning);
            return PlayerAction::DidntTakeTurn;
        };

        match self.apply_effect(effect, frontend) {
            UseResult::Consumed => {
                self.inventory.remove(slot);
                self.entities.remove(item);
                self.stats.items_used += 1;
                debug!("Consumed {}", name);
                PlayerAction::TookTurn
            }
            UseResult::Cancelled => PlayerAction::DidntTakeTurn,
        }
    }

    /// Shows the inventory and lets the frontend pick a slot.
    ///
    /// An empty inventory reports so and returns `None` without prompting.
    pub fn inventory_menu(
        &mut self,
        header: &str,
        frontend: &mut dyn Frontend,
    ) -> DelveResult<Option<usize>> {
        if self.inventory.is_empty() {
            self.message("Your inventory is empty.", MessageTone::Info);
            return Ok(None);
        }
        let options: Vec<String> = self.inventory.iter().map(|&id| self.name_of(id)).collect();
        menu(frontend, header, &options)
    }

    /// Resolves one item effect on behalf of the player.
    pub fn apply_effect(&mut self, effect: ItemEffect, frontend: &mut dyn Frontend) -> UseResult {
        let player = self.player;
        match effect {
            ItemEffect::Heal { amount } => {
                let full = self
                    .player_fighter()
                    .map(|fighter| fighter.hp >= fighter.max_hp)
                    .unwrap_or(true);
                if full {
                    self.message("You are already at full health.", MessageTone::Danger);
                    return UseResult::Cancelled;
                }
                self.message("Your wounds start to feel better!", MessageTone::Magic);
                self.heal(player, amount);
                UseResult::Consumed
            }
            ItemEffect::LightningBolt { damage, range } => {
                let Some(target) = self.closest_monster(range) else {
                    self.message("No enemy is close enough to strike.", MessageTone::Danger);
                    return UseResult::Cancelled;
                };
                let name = self.name_of(target);
                self.message(
                    format!(
                        "A lightning bolt strikes the {} with a loud thunder! The damage is {} hit points.",
                        name, damage
                    ),
                    MessageTone::Magic,
                );
                self.take_damage(target, damage);
                UseResult::Consumed
            }
            ItemEffect::Confuse { turns, range } => {
                self.message(
                    "Choose an enemy to confuse, or cancel.",
                    MessageTone::Magic,
                );
                let Some(target) = self.target_monster(frontend, Some(range)) else {
                    return UseResult::Cancelled;
                };
                let name = self.name_of(target);
                let Some(entity) = self.entity_mut(target) else {
                    return UseResult::Cancelled;
                };
                let Some(previous) = entity.ai.take() else {
                    self.message(format!("The {} is unaffected.", name), MessageTone::Info);
                    return UseResult::Cancelled;
                };
                entity.ai = Some(Ai::confused(previous, turns));
                self.message(
                    format!(
                        "The eyes of the {} look vacant, as it starts to stumble around!",
                        name
                    ),
                    MessageTone::Magic,
                );
                UseResult::Consumed
            }
            ItemEffect::Fireball { damage, radius } => {
                self.message(
                    "Choose a target tile for the fireball, or cancel.",
                    MessageTone::Magic,
                );
                let Some(center) = self.target_tile(frontend, None) else {
                    return UseResult::Cancelled;
                };
                self.message(
                    format!(
                        "The fireball explodes, burning everything within {} tiles!",
                        radius
                    ),
                    MessageTone::Warning,
                );
                let victims: Vec<EntityId> = self
                    .objects
                    .iter()
                    .copied()
                    .filter(|&id| {
                        self.entity(id).is_some_and(|entity| {
                            entity.fighter.is_some() && entity.distance(center.x, center.y) <= radius
                        })
                    })
                    .collect();
                for id in victims {
                    let name = self.name_of(id);
                    self.message(
                        format!("The {} gets burned for {} hit points.", name, damage),
                        MessageTone::Warning,
                    );
                    self.take_damage(id, damage);
                }
                UseResult::Consumed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Color, Entity, Position};
    use crate::input::ScriptedFrontend;
    use crate::testing::arena_session;
    use crate::{ItemKind, MonsterKind};

    fn carry(session: &mut GameSession, entity: Entity) -> EntityId {
        let id = session.spawn(entity);
        assert!(session.pick_up(id));
        id
    }

    fn hp_of(session: &GameSession, id: EntityId) -> Option<i32> {
        session.entity(id)?.fighter.as_ref().map(|fighter| fighter.hp)
    }

    #[test]
    fn test_inert_item_has_no_effect() {
        assert_eq!(Item::inert().effect, None);
        assert_eq!(
            Item::new(ItemEffect::Heal { amount: 4 }).effect,
            Some(ItemEffect::Heal { amount: 4 })
        );
    }

    #[test]
    fn test_inert_item_cannot_be_used() {
        let mut session = arena_session(1);
        let here = session.player_position();
        let rock = Entity::new(here, '*', "rock", Color::WHITE, false).with_item(Item::inert());
        carry(&mut session, rock);

        let action = session.use_item(0, &mut ScriptedFrontend::new());
        assert_eq!(action, PlayerAction::DidntTakeTurn);
        assert_eq!(session.inventory.len(), 1);
        assert!(session.messages.contains("The rock cannot be used."));
        assert_eq!(session.stats.items_used, 0);
    }

    #[test]
    fn test_heal_at_full_health_keeps_potion() {
        let mut session = arena_session(1);
        let here = session.player_position();
        let potion = carry(&mut session, ItemKind::HealingPotion.spawn(here));

        let action = session.use_item(0, &mut ScriptedFrontend::new());
        assert_eq!(action, PlayerAction::DidntTakeTurn);
        assert_eq!(session.inventory, vec![potion]);
        assert!(session.messages.contains("You are already at full health."));
    }

    #[test]
    fn test_lightning_strikes_nearest_visible_monster() {
        let mut session = arena_session(2);
        let near = session.spawn(MonsterKind::Orc.spawn(Position::new(8, 5)));
        let far = session.spawn(MonsterKind::Orc.spawn(Position::new(10, 5)));
        let here = session.player_position();
        carry(&mut session, ItemKind::LightningScroll.spawn(here));
        session.refresh_visibility();

        let action = session.use_item(0, &mut ScriptedFrontend::new());
        assert_eq!(action, PlayerAction::TookTurn);
        assert!(session.inventory.is_empty());
        assert_eq!(hp_of(&session, near), None);
        assert_eq!(session.name_of(near), "remains of orc");
        assert_eq!(hp_of(&session, far), Some(20));
        assert_eq!(session.player_fighter().unwrap().xp, 35);
        assert_eq!(session.stats.items_used, 1);
    }

    #[test]
    fn test_lightning_without_target_keeps_scroll() {
        let mut session = arena_session(2);
        let orc = session.spawn(MonsterKind::Orc.spawn(Position::new(12, 5)));
        let here = session.player_position();
        carry(&mut session, ItemKind::LightningScroll.spawn(here));
        session.refresh_visibility();

        let action = session.use_item(0, &mut ScriptedFrontend::new());
        assert_eq!(action, PlayerAction::DidntTakeTurn);
        assert_eq!(session.inventory.len(), 1);
        assert_eq!(hp_of(&session, orc), Some(20));
        assert!(session.messages.contains("No enemy is close enough to strike."));
    }

    #[test]
    fn test_fireball_burns_everything_in_radius() {
        let mut session = arena_session(3);
        let orc = session.spawn(MonsterKind::Orc.spawn(Position::new(7, 5)));
        let troll = session.spawn(MonsterKind::Troll.spawn(Position::new(12, 5)));
        let here = session.player_position();
        carry(&mut session, ItemKind::FireballScroll.spawn(here));
        session.refresh_visibility();

        let mut frontend = ScriptedFrontend::new().with_tiles([Some(Position::new(6, 5))]);
        assert_eq!(session.use_item(0, &mut frontend), PlayerAction::TookTurn);
        assert_eq!(frontend.tile_prompts, 1);

        assert_eq!(session.player_fighter().unwrap().hp, 75);
        assert!(session.messages.contains("The player gets burned for 25 hit points."));
        assert_eq!(hp_of(&session, orc), None);
        assert_eq!(session.stats.monsters_killed, 1);
        assert_eq!(hp_of(&session, troll), Some(30));
        assert!(session.inventory.is_empty());
    }

    #[test]
    fn test_fireball_rejects_unseen_tile() {
        let mut session = arena_session(3);
        let here = session.player_position();
        carry(&mut session, ItemKind::FireballScroll.spawn(here));
        session.refresh_visibility();

        let mut frontend =
            ScriptedFrontend::new().with_tiles([Some(Position::new(-3, -3)), None]);
        assert_eq!(session.use_item(0, &mut frontend), PlayerAction::DidntTakeTurn);
        assert_eq!(frontend.tile_prompts, 2);
        assert_eq!(session.player_fighter().unwrap().hp, 100);
        assert_eq!(session.inventory.len(), 1);
    }
}
