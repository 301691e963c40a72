//! # Autoexplore Module
//!
//! A self-playing frontend that explores levels, fights what it meets,
//! collects items and takes the stairs once a level is fully explored.
//!
//! It sees only what the player sees: paths run over explored tiles and
//! targets are picked from the current field of view.

use crate::config::INVENTORY_CAPACITY;
use crate::game::{Direction, EntityId, GameSession, ItemEffect, Position};
use crate::input::{Frontend, Intent};
use crate::generation::FIREBALL_RADIUS;
use crate::utils::{find_nearest, find_path};
use log::debug;

/// Drink a potion below this fraction of max hp.
const HEAL_BELOW: f32 = 0.4;

/// Autoexplore state and decision making.
#[derive(Debug, Clone, Default)]
pub struct AutoExplorer {
    /// Current target position, for debugging
    pub target: Option<Position>,
    /// Inventory slot to answer the next item menu with
    pending_slot: Option<usize>,
    /// Ticks decided so far
    pub decisions: u64,
}

impl AutoExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the direction from one position to an adjacent position.
    fn direction_to(from: Position, to: Position) -> Option<Direction> {
        Direction::from_delta(to - from)
    }

    /// Tiles the player knows to be walkable.
    fn known_walkable(session: &GameSession, pos: Position) -> bool {
        session.level.is_explored(pos) && !session.level.is_blocked(pos)
    }

    /// Visible monsters, nearest first.
    fn visible_monsters(session: &GameSession) -> Vec<(EntityId, Position, f32)> {
        let origin = session.player_position();
        let mut monsters: Vec<_> = session
            .objects
            .iter()
            .copied()
            .filter(|&id| id != session.player)
            .filter_map(|id| {
                let entity = session.entity(id)?;
                (entity.fighter.is_some() && session.visibility.is_visible(entity.position))
                    .then(|| (id, entity.position, origin.distance(entity.position)))
            })
            .collect();
        monsters.sort_by(|a, b| a.2.total_cmp(&b.2));
        monsters
    }

    /// First inventory slot holding an item whose effect matches.
    fn slot_with(session: &GameSession, wanted: impl Fn(&ItemEffect) -> bool) -> Option<usize> {
        session.inventory.iter().position(|&id| {
            session
                .entity(id)
                .and_then(|entity| entity.item.as_ref())
                .and_then(|item| item.effect.as_ref())
                .is_some_and(&wanted)
        })
    }

    fn use_slot(&mut self, slot: usize) -> Intent {
        self.pending_slot = Some(slot);
        Intent::UseItem
    }

    /// Steps along a path over known tiles towards `goal`.
    fn walk_to(&mut self, session: &GameSession, goal: Position) -> Option<Intent> {
        let start = session.player_position();
        let path = find_path(start, goal, |pos| Self::known_walkable(session, pos))?;
        let next = *path.first()?;
        self.target = Some(goal);
        Self::direction_to(start, next).map(Intent::Move)
    }

    fn should_heal(session: &GameSession) -> Option<usize> {
        let fighter = session.player_fighter()?;
        if fighter.hp as f32 >= fighter.max_hp as f32 * HEAL_BELOW {
            return None;
        }
        Self::slot_with(session, |effect| matches!(effect, ItemEffect::Heal { .. }))
    }

    fn offensive_scroll(session: &GameSession, monsters: &[(EntityId, Position, f32)]) -> Option<usize> {
        let &(_, _, nearest) = monsters.first()?;
        Self::slot_with(session, |effect| match *effect {
            ItemEffect::LightningBolt { range, .. } => nearest <= range,
            ItemEffect::Confuse { range, .. } => nearest <= range && monsters.len() > 1,
            ItemEffect::Fireball { .. } => nearest > FIREBALL_RADIUS + 1.0 && nearest <= 8.0,
            ItemEffect::Heal { .. } => false,
        })
    }

    /// Decides the next intent for the player.
    pub fn decide(&mut self, session: &GameSession) -> Intent {
        self.decisions += 1;
        if !session.is_playing() {
            return Intent::Quit;
        }
        let here = session.player_position();

        if let Some(slot) = Self::should_heal(session) {
            debug!("Autoexplore drinks from slot {}", slot);
            return self.use_slot(slot);
        }

        let monsters = Self::visible_monsters(session);
        if let Some(slot) = Self::offensive_scroll(session, &monsters) {
            debug!("Autoexplore reads scroll in slot {}", slot);
            return self.use_slot(slot);
        }
        if let Some(&(_, pos, distance)) = monsters.first() {
            if distance < 1.5 {
                if let Some(direction) = Self::direction_to(here, pos) {
                    return Intent::Move(direction);
                }
            }
            if let Some(intent) = self.walk_to(session, pos) {
                return intent;
            }
        }

        let room_in_pack = session.inventory.len() < INVENTORY_CAPACITY;
        if room_in_pack && session.item_at(here).is_some() {
            return Intent::PickUp;
        }
        if room_in_pack {
            let item = session.draw_order().into_iter().find_map(|id| {
                let entity = session.entity(id)?;
                entity.item.as_ref()?;
                Some(entity.position)
            });
            if let Some(intent) = item.and_then(|pos| self.walk_to(session, pos)) {
                return intent;
            }
        }

        let frontier = find_nearest(
            here,
            |pos| Self::known_walkable(session, pos),
            |pos| {
                pos.adjacent_positions()
                    .into_iter()
                    .any(|next| session.level.in_bounds(next) && !session.level.is_explored(next))
            },
        );
        if let Some(next) = frontier.and_then(|path| path.first().copied()) {
            self.target = Some(next);
            if let Some(direction) = Self::direction_to(here, next) {
                return Intent::Move(direction);
            }
        }

        if here == session.level.stairs {
            return Intent::Descend;
        }
        if session.level.is_explored(session.level.stairs) {
            if let Some(intent) = self.walk_to(session, session.level.stairs) {
                return intent;
            }
        }
        Intent::Cancel
    }
}

impl Frontend for AutoExplorer {
    fn next_intent(&mut self, session: &GameSession) -> Intent {
        self.decide(session)
    }

    fn prompt_choice(&mut self, header: &str, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        if let Some(slot) = self.pending_slot.take() {
            return Some(slot);
        }
        // Level-up and any other mandatory menu: first option
        debug!("Autoexplore answers '{}' with the first option", header);
        Some(0)
    }

    fn prompt_tile(&mut self, session: &GameSession, max_range: Option<f32>) -> Option<Position> {
        Self::visible_monsters(session)
            .into_iter()
            .find(|&(_, _, distance)| max_range.map_or(true, |range| distance <= range))
            .map(|(_, pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::arena_session;
    use crate::{GameConfig, GameStatus, ItemKind, MonsterKind};

    #[test]
    fn test_direction_calculation() {
        let from = Position::new(5, 5);
        assert_eq!(AutoExplorer::direction_to(from, Position::new(5, 4)), Some(Direction::North));
        assert_eq!(AutoExplorer::direction_to(from, Position::new(4, 6)), Some(Direction::Southwest));
        assert_eq!(AutoExplorer::direction_to(from, Position::new(7, 5)), None);
    }

    #[test]
    fn test_attacks_adjacent_monster() {
        let mut session = arena_session(1);
        session.spawn(MonsterKind::Orc.spawn(Position::new(6, 6)));
        session.refresh_visibility();
        let mut explorer = AutoExplorer::new();
        assert_eq!(explorer.decide(&session), Intent::Move(Direction::Southeast));
    }

    #[test]
    fn test_picks_up_and_drinks() {
        let mut session = arena_session(1);
        let here = session.player_position();
        session.spawn(ItemKind::HealingPotion.spawn(here));
        session.refresh_visibility();
        let mut explorer = AutoExplorer::new();
        assert_eq!(explorer.decide(&session), Intent::PickUp);

        let mut session_frontend = explorer.clone();
        session.play_tick(&mut session_frontend).unwrap();
        assert_eq!(session.inventory.len(), 1);

        let player = session.player;
        session.take_damage(player, 70);
        assert_eq!(explorer.decide(&session), Intent::UseItem);
        assert_eq!(explorer.prompt_choice("use", &["healing potion".to_string()]), Some(0));
    }

    #[test]
    fn test_targets_nearest_monster_in_range() {
        let mut session = arena_session(1);
        let _near = session.spawn(MonsterKind::Orc.spawn(Position::new(8, 5)));
        session.spawn(MonsterKind::Orc.spawn(Position::new(12, 5)));
        session.refresh_visibility();
        let mut explorer = AutoExplorer::new();
        assert_eq!(explorer.prompt_tile(&session, Some(5.0)), Some(Position::new(8, 5)));
        assert_eq!(explorer.prompt_tile(&session, Some(2.0)), None);
    }

    #[test]
    fn test_autoexplore_plays_a_game() {
        let mut session = GameSession::new(GameConfig::default(), 2024).unwrap();
        let mut explorer = AutoExplorer::new();
        let summary = session.run(&mut explorer, Some(400)).unwrap();
        assert!(summary.ticks <= 400);
        assert!(session.stats.steps_taken > 0);
        assert!(session.level.tiles.iter().flatten().filter(|t| t.explored).count() > 20);
        if summary.status == GameStatus::Dead {
            assert!(summary.quit);
        }
    }
}
