//! # Targeting
//!
//! Tile and monster selection for scrolls and other ranged effects.
//!
//! The frontend proposes tiles; the session only accepts tiles the player
//! can see and, when a range is given, that lie within it. Rejected picks
//! re-prompt until the frontend cancels.

use crate::game::{EntityId, GameSession, Position};
use crate::input::Frontend;
use log::debug;

impl GameSession {
    /// Whether the player could target `pos` right now.
    pub fn is_valid_target(&self, pos: Position, max_range: Option<f32>) -> bool {
        if !self.visibility.is_visible(pos) {
            return false;
        }
        match max_range {
            Some(range) => self.player_position().distance(pos) <= range,
            None => true,
        }
    }

    /// Asks the frontend for a visible tile within `max_range`, or `None`
    /// if the player cancels.
    pub fn target_tile(
        &self,
        frontend: &mut dyn Frontend,
        max_range: Option<f32>,
    ) -> Option<Position> {
        loop {
            let pos = frontend.prompt_tile(self, max_range)?;
            if self.is_valid_target(pos, max_range) {
                return Some(pos);
            }
            debug!("Rejected target {:?}", pos);
        }
    }

    /// Asks the frontend for a monster within `max_range`, or `None` if the
    /// player cancels.
    pub fn target_monster(
        &self,
        frontend: &mut dyn Frontend,
        max_range: Option<f32>,
    ) -> Option<EntityId> {
        loop {
            let pos = self.target_tile(frontend, max_range)?;
            if let Some(id) = self.fighter_at(pos).filter(|&id| id != self.player) {
                return Some(id);
            }
        }
    }

    /// The nearest monster the player can see within `max_range`.
    pub fn closest_monster(&self, max_range: f32) -> Option<EntityId> {
        let origin = self.player_position();
        let mut closest = None;
        let mut closest_distance = max_range + 1.0;
        for &id in &self.objects {
            if id == self.player {
                continue;
            }
            let Some(entity) = self.entity(id) else {
                continue;
            };
            if entity.fighter.is_none() || !self.visibility.is_visible(entity.position) {
                continue;
            }
            let distance = origin.distance(entity.position);
            if distance <= max_range && distance < closest_distance {
                closest = Some(id);
                closest_distance = distance;
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use crate::game::Position;
    use crate::input::ScriptedFrontend;
    use crate::testing::arena_session;
    use crate::MonsterKind;

    #[test]
    fn test_target_tile_rejects_out_of_range() {
        let mut session = arena_session(1);
        session.refresh_visibility();
        let mut frontend = ScriptedFrontend::new()
            .with_tiles(vec![Some(Position::new(14, 5)), Some(Position::new(8, 5))]);

        let picked = session.target_tile(&mut frontend, Some(4.0));
        assert_eq!(picked, Some(Position::new(8, 5)));
        assert_eq!(frontend.tile_prompts, 2);
    }

    #[test]
    fn test_target_tile_rejects_unseen() {
        let mut session = arena_session(1);
        session.refresh_visibility();
        let mut frontend = ScriptedFrontend::new()
            .with_tiles(vec![Some(Position::new(17, 17)), None]);

        assert_eq!(session.target_tile(&mut frontend, None), None);
        assert_eq!(frontend.tile_prompts, 2);
    }

    #[test]
    fn test_target_monster_skips_empty_tiles() {
        let mut session = arena_session(1);
        let orc = session.spawn(MonsterKind::Orc.spawn(Position::new(7, 6)));
        session.refresh_visibility();
        let mut frontend = ScriptedFrontend::new().with_tiles(vec![
            Some(Position::new(5, 5)),
            Some(Position::new(6, 6)),
            Some(Position::new(7, 6)),
        ]);

        assert_eq!(session.target_monster(&mut frontend, Some(8.0)), Some(orc));
        assert_eq!(frontend.tile_prompts, 3);
    }

    #[test]
    fn test_closest_monster() {
        let mut session = arena_session(1);
        let near = session.spawn(MonsterKind::Orc.spawn(Position::new(8, 5)));
        let _far = session.spawn(MonsterKind::Orc.spawn(Position::new(9, 9)));
        session.refresh_visibility();

        assert_eq!(session.closest_monster(5.0), Some(near));
        assert_eq!(session.closest_monster(2.0), None);
    }
}
