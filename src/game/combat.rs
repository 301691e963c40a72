//! # Combat
//!
//! Attacks, damage, healing and the death transitions of the Fighter
//! capability.

use crate::game::{Color, DeathKind, EntityId, GameSession, GameStatus, MessageTone};
use crate::utils::capitalize;
use log::info;

impl GameSession {
    /// Resolves a melee or ranged hit of `attacker` on `target`.
    ///
    /// Damage is the attacker's power minus the target's defense. With
    /// damage jitter enabled a positive hit is scaled by a random 75%-125%.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) {
        let (Some(a), Some(t)) = (self.entity(attacker), self.entity(target)) else {
            return;
        };
        let (Some(attacker_fighter), Some(target_fighter)) = (&a.fighter, &t.fighter) else {
            return;
        };
        let mut damage = attacker_fighter.power - target_fighter.defense;
        let attacker_name = capitalize(&a.name);
        let target_name = t.name.clone();

        if damage > 0 && self.config.rules.damage_jitter {
            let percent = self.random_int(75, 125);
            damage = ((damage * percent + 50) / 100).max(1);
        }

        let tone = if target == self.player {
            MessageTone::Danger
        } else {
            MessageTone::Info
        };
        if damage > 0 {
            self.message(
                format!(
                    "{} attacks {} for {} hit points.",
                    attacker_name, target_name, damage
                ),
                tone,
            );
            self.take_damage(target, damage);
        } else {
            self.message(
                format!("{} attacks {} but it has no effect!", attacker_name, target_name),
                tone,
            );
        }
    }

    /// Removes hit points from a fighter.
    ///
    /// The hit that drops the fighter to zero runs its death transition and,
    /// for anything but the player, awards its experience to the player.
    /// Non-positive amounts do nothing.
    pub fn take_damage(&mut self, target: EntityId, amount: i32) {
        let Some(fighter) = self
            .entity_mut(target)
            .and_then(|entity| entity.fighter.as_mut())
        else {
            return;
        };
        if !fighter.apply_damage(amount) {
            return;
        }
        let xp = fighter.xp;
        self.kill(target);
        if target != self.player {
            if let Some(player) = self
                .entity_mut(self.player)
                .and_then(|entity| entity.fighter.as_mut())
            {
                player.xp += xp;
            }
        }
    }

    /// Restores hit points, never beyond the maximum.
    pub fn heal(&mut self, target: EntityId, amount: i32) {
        if let Some(fighter) = self
            .entity_mut(target)
            .and_then(|entity| entity.fighter.as_mut())
        {
            fighter.heal(amount);
        }
    }

    /// Runs the death transition of a fighter. Calling it again on an
    /// entity that already died changes nothing.
    pub fn kill(&mut self, target: EntityId) {
        let Some(kind) = self
            .entity(target)
            .and_then(|entity| entity.fighter.as_ref())
            .map(|fighter| fighter.on_death)
        else {
            return;
        };
        match kind {
            DeathKind::Player => self.player_death(target),
            DeathKind::Monster => self.monster_death(target),
        }
    }

    fn player_death(&mut self, player: EntityId) {
        if self.status == GameStatus::Dead {
            return;
        }
        self.status = GameStatus::Dead;
        if let Some(entity) = self.entity_mut(player) {
            entity.glyph = '%';
            entity.color = Color::DARK_RED;
        }
        info!("Player died on depth {} after {} turns", self.depth, self.turn);
        self.message("You died!", MessageTone::Danger);
    }

    fn monster_death(&mut self, monster: EntityId) {
        let Some(entity) = self.entity_mut(monster) else {
            return;
        };
        let Some(fighter) = entity.fighter.take() else {
            return;
        };
        let name = entity.name.clone();
        entity.glyph = '%';
        entity.color = Color::DARK_RED;
        entity.blocks_movement = false;
        entity.ai = None;
        entity.name = format!("remains of {}", name);
        self.send_to_back(monster);
        self.stats.monsters_killed += 1;
        info!("{} died on depth {}", name, self.depth);
        self.message(
            format!(
                "{} is dead! You gain {} experience points.",
                capitalize(&name),
                fighter.xp
            ),
            MessageTone::Success,
        );
    }
}
