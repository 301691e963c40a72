//! # Monster AI
//!
//! Monster behaviors as a closed set of variants with a single dispatch.
//!
//! A behavior is taken out of its monster for the duration of a turn and
//! [`Ai::take_turn`] returns the behavior the monster should carry next.
//! Swapping behaviors (confusion wearing off, a boss charging up) is just a
//! matter of returning a different value.

use crate::game::{Direction, EntityId, GameSession, MessageTone, Position};
use crate::utils::capitalize;
use log::debug;

/// Boss rolls at or below this only taunt.
pub const BOSS_IDLE_ROLL: i32 = 10;
/// An uncharged boss rolling above this starts charging.
pub const BOSS_CHARGE_ROLL: i32 = 60;
/// A charged boss rolling above this (and close enough) smashes.
pub const BOSS_STRIKE_ROLL: i32 = 50;
/// A charged boss must be closer than this to smash.
pub const BOSS_STRIKE_RANGE: f32 = 3.0;

/// Monster behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Ai {
    /// Walk up to the player and hit them
    Basic,
    /// Keep the player between `min_range` and `max_range` and shoot
    Ranged {
        min_range: f32,
        max_range: f32,
        ammo: u32,
        capacity: u32,
    },
    /// Stumble around at random, then fall back to `previous`
    Confused { previous: Box<Ai>, turns_left: u32 },
    /// Charge up and deliver an oversized blow
    Boss { charged: bool },
}

impl Ai {
    /// A ranged behavior that starts fully loaded.
    pub fn ranged(min_range: f32, max_range: f32, capacity: u32) -> Self {
        Ai::Ranged {
            min_range,
            max_range,
            ammo: capacity,
            capacity,
        }
    }

    /// Wraps `previous` in a confusion lasting `turns` random steps.
    pub fn confused(previous: Ai, turns: u32) -> Self {
        Ai::Confused {
            previous: Box::new(previous),
            turns_left: turns,
        }
    }

    /// Acts for `monster` once and returns its next behavior.
    ///
    /// Everything but confusion is inert while the monster is outside the
    /// player's field of view.
    pub fn take_turn(self, monster: EntityId, session: &mut GameSession) -> Ai {
        match self {
            Ai::Basic => {
                basic_turn(monster, session);
                Ai::Basic
            }
            Ai::Ranged {
                min_range,
                max_range,
                ammo,
                capacity,
            } => {
                let ammo = ranged_turn(monster, session, min_range, max_range, ammo, capacity);
                Ai::Ranged {
                    min_range,
                    max_range,
                    ammo,
                    capacity,
                }
            }
            Ai::Confused {
                previous,
                turns_left,
            } => {
                if turns_left > 0 {
                    stumble(monster, session);
                    Ai::Confused {
                        previous,
                        turns_left: turns_left - 1,
                    }
                } else {
                    if visible_position(monster, session).is_some() {
                        let name = session.name_of(monster);
                        session.message(
                            format!("The {} is no longer confused!", name),
                            MessageTone::Danger,
                        );
                    }
                    previous.take_turn(monster, session)
                }
            }
            Ai::Boss { charged } => Ai::Boss {
                charged: boss_turn(monster, session, charged),
            },
        }
    }
}

/// Position of a monster the player can currently see.
fn visible_position(monster: EntityId, session: &GameSession) -> Option<Position> {
    let pos = session.entity(monster)?.position;
    session.visibility.is_visible(pos).then_some(pos)
}

fn basic_turn(monster: EntityId, session: &mut GameSession) {
    if visible_position(monster, session).is_none() {
        return;
    }
    let player = session.player;
    if session.distance_between(monster, player) >= 2.0 {
        let target = session.player_position();
        session.move_towards(monster, target);
    } else if session.player_is_alive() {
        session.attack(monster, player);
    }
}

/// Returns the ammunition left after the turn.
fn ranged_turn(
    monster: EntityId,
    session: &mut GameSession,
    min_range: f32,
    max_range: f32,
    ammo: u32,
    capacity: u32,
) -> u32 {
    if visible_position(monster, session).is_none() {
        return ammo;
    }
    let player = session.player;
    let player_pos = session.player_position();
    let distance = session.distance_between(monster, player);

    if distance < min_range {
        if let Some(step) = session.evade_vector(monster, player_pos) {
            debug!("{:?} backs away to keep its distance", monster);
            session.move_by(monster, step.x, step.y);
            return ammo;
        }
        return if ammo > 0 {
            shoot(monster, session);
            ammo - 1
        } else {
            reload(monster, session);
            ammo + 1
        };
    }

    if ammo < capacity {
        reload(monster, session);
        ammo + 1
    } else if distance > max_range {
        session.move_towards(monster, player_pos);
        ammo
    } else {
        shoot(monster, session);
        ammo - 1
    }
}

fn shoot(monster: EntityId, session: &mut GameSession) {
    let name = capitalize(&session.name_of(monster));
    session.message(format!("{} looses an arrow!", name), MessageTone::Info);
    if session.player_is_alive() {
        let player = session.player;
        session.attack(monster, player);
    }
}

fn reload(monster: EntityId, session: &mut GameSession) {
    let name = capitalize(&session.name_of(monster));
    session.message(format!("{} nocks another arrow.", name), MessageTone::Info);
}

fn stumble(monster: EntityId, session: &mut GameSession) {
    let dx = session.random_int(-1, 1);
    let dy = session.random_int(-1, 1);
    if Direction::from_delta(Position::new(dx, dy)).is_some() {
        session.move_by(monster, dx, dy);
    }
}

/// Returns whether the boss is charged after the turn.
fn boss_turn(monster: EntityId, session: &mut GameSession, charged: bool) -> bool {
    if visible_position(monster, session).is_none() {
        return charged;
    }
    let name = capitalize(&session.name_of(monster));
    let roll = session.random_int(1, 100);

    if roll <= BOSS_IDLE_ROLL {
        session.message(
            format!("{} bellows a challenge that echoes through the halls.", name),
            MessageTone::Warning,
        );
        return charged;
    }

    if !charged && roll > BOSS_CHARGE_ROLL {
        session.message(
            format!("{} raises its club high above its head!", name),
            MessageTone::Warning,
        );
        return true;
    }

    let player = session.player;
    if charged
        && session.distance_between(monster, player) < BOSS_STRIKE_RANGE
        && roll > BOSS_STRIKE_ROLL
    {
        let power = session
            .entity(monster)
            .and_then(|entity| entity.fighter.as_ref())
            .map(|fighter| fighter.power)
            .unwrap_or(0);
        let damage = power + session.random_int(0, power);
        session.message(
            format!("{} smashes you for {} hit points!", name, damage),
            MessageTone::Danger,
        );
        session.take_damage(player, damage);
        return false;
    }

    basic_turn(monster, session);
    charged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::arena_session;
    use crate::MonsterKind;

    fn archer_at(session: &mut GameSession, pos: Position) -> EntityId {
        session.spawn(MonsterKind::GoblinArcher.spawn(pos))
    }

    #[test]
    fn test_ranged_starts_full() {
        assert_eq!(
            Ai::ranged(2.0, 6.0, 3),
            Ai::Ranged {
                min_range: 2.0,
                max_range: 6.0,
                ammo: 3,
                capacity: 3
            }
        );
    }

    #[test]
    fn test_confusion_wraps_previous() {
        let ai = Ai::confused(Ai::Boss { charged: true }, 4);
        match ai {
            Ai::Confused {
                previous,
                turns_left,
            } => {
                assert_eq!(*previous, Ai::Boss { charged: true });
                assert_eq!(turns_left, 4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_basic_approaches_only_when_seen() {
        let mut session = arena_session(1);
        let near = session.spawn(MonsterKind::Orc.spawn(Position::new(10, 5)));
        let far = session.spawn(MonsterKind::Orc.spawn(Position::new(17, 17)));
        session.refresh_visibility();

        assert_eq!(Ai::Basic.take_turn(near, &mut session), Ai::Basic);
        assert_eq!(session.entity(near).unwrap().position, Position::new(9, 5));

        Ai::Basic.take_turn(far, &mut session);
        assert_eq!(session.entity(far).unwrap().position, Position::new(17, 17));
    }

    #[test]
    fn test_ranged_fires_then_reloads() {
        let mut session = arena_session(1);
        let archer = archer_at(&mut session, Position::new(9, 5));
        session.refresh_visibility();

        let ai = Ai::ranged(2.0, 6.0, 2).take_turn(archer, &mut session);
        assert!(matches!(ai, Ai::Ranged { ammo: 1, .. }));
        assert!(session.messages.contains("Goblin archer looses an arrow!"));
        assert_eq!(session.player_fighter().unwrap().hp, 98);

        let ai = ai.take_turn(archer, &mut session);
        assert!(matches!(ai, Ai::Ranged { ammo: 2, .. }));
        assert!(session.messages.contains("Goblin archer nocks another arrow."));
    }

    #[test]
    fn test_ranged_backs_away_when_crowded() {
        let mut session = arena_session(1);
        let archer = archer_at(&mut session, Position::new(6, 5));
        session.refresh_visibility();

        let ai = Ai::ranged(2.0, 6.0, 2).take_turn(archer, &mut session);
        assert!(matches!(ai, Ai::Ranged { ammo: 2, .. }));
        assert_eq!(session.entity(archer).unwrap().position, Position::new(7, 5));
    }

    #[test]
    fn test_cornered_archer_shoots_point_blank() {
        let mut session = arena_session(1);
        let archer = archer_at(&mut session, Position::new(6, 5));
        session.spawn(MonsterKind::Troll.spawn(Position::new(7, 5)));
        session.refresh_visibility();

        let ai = Ai::ranged(2.0, 6.0, 2).take_turn(archer, &mut session);
        assert!(matches!(ai, Ai::Ranged { ammo: 1, .. }));
        assert_eq!(session.entity(archer).unwrap().position, Position::new(6, 5));
    }

    #[test]
    fn test_unseen_boss_keeps_its_charge() {
        let mut session = arena_session(1);
        let boss = session.spawn(MonsterKind::OgreChieftain.spawn(Position::new(17, 17)));
        session.refresh_visibility();
        for _ in 0..20 {
            assert_eq!(
                Ai::Boss { charged: true }.take_turn(boss, &mut session),
                Ai::Boss { charged: true }
            );
        }
        assert_eq!(session.player_fighter().unwrap().hp, 100);
    }

    #[test]
    fn test_boss_never_smashes_from_afar() {
        let mut session = arena_session(9);
        let boss = session.spawn(MonsterKind::OgreChieftain.spawn(Position::new(12, 5)));
        session.refresh_visibility();
        let mut ai = Ai::Boss { charged: false };
        for _ in 0..3 {
            ai = ai.take_turn(boss, &mut session);
        }
        // Three steps at most brings it to distance 4
        assert_eq!(session.player_fighter().unwrap().hp, 100);
    }

    #[test]
    fn test_ranged_advances_when_out_of_range() {
        let mut session = arena_session(1);
        let archer = archer_at(&mut session, Position::new(14, 5));
        session.refresh_visibility();

        let ai = Ai::ranged(2.0, 6.0, 2).take_turn(archer, &mut session);
        assert!(matches!(ai, Ai::Ranged { ammo: 2, .. }));
        assert_eq!(session.entity(archer).unwrap().position, Position::new(13, 5));
        assert_eq!(session.player_fighter().unwrap().hp, 100);
    }

    #[test]
    fn test_unseen_confusion_ends_quietly() {
        let mut session = arena_session(1);
        let orc = session.spawn(MonsterKind::Orc.spawn(Position::new(17, 17)));
        session.refresh_visibility();

        let ai = Ai::confused(Ai::Basic, 0).take_turn(orc, &mut session);
        assert_eq!(ai, Ai::Basic);
        assert!(!session.messages.contains("no longer confused"));
    }

    #[test]
    fn test_boss_taunts_charges_and_smashes() {
        let mut session = arena_session(5);
        let player = session.player;
        if let Some(fighter) = session.entity_mut(player).and_then(|e| e.fighter.as_mut()) {
            fighter.max_hp = 100_000;
            fighter.hp = 100_000;
        }
        let boss = session.spawn(MonsterKind::OgreChieftain.spawn(Position::new(6, 5)));
        session.refresh_visibility();

        let (mut taunts, mut charges, mut smashes) = (0, 0, 0);
        let mut ai = Ai::Boss { charged: false };
        for _ in 0..400 {
            let was_charged = matches!(ai, Ai::Boss { charged: true });
            let hp_before = session.player_fighter().unwrap().hp;
            ai = ai.take_turn(boss, &mut session);
            let hp_after = session.player_fighter().unwrap().hp;
            let text = session.messages.last().unwrap().text.clone();

            if text.contains("bellows a challenge") {
                taunts += 1;
                assert_eq!(ai, Ai::Boss { charged: was_charged });
            } else if text.contains("raises its club") {
                charges += 1;
                assert!(!was_charged);
                assert_eq!(ai, Ai::Boss { charged: true });
            } else if text.contains("smashes you for") {
                smashes += 1;
                assert!(was_charged);
                assert_eq!(ai, Ai::Boss { charged: false });
                let damage = hp_before - hp_after;
                assert!((9..=18).contains(&damage), "smash for {}", damage);
                assert!(text.contains(&format!("for {} hit points", damage)));
            } else {
                // Plain melee: power 9 against defense 1
                assert_eq!(hp_before - hp_after, 8);
                assert_eq!(ai, Ai::Boss { charged: was_charged });
            }
        }
        assert!(taunts > 0);
        assert!(charges > 0);
        assert!(smashes > 0);
        assert_eq!(session.entity(boss).unwrap().position, Position::new(6, 5));
    }
}
