//! Fixtures shared by unit tests.

use crate::game::{Level, Position, Rect};
use crate::generation::GeneratedLevel;
use crate::{GameConfig, GameSession};

/// A 20x20 level holding one open room with floor from 1 to 18, the
/// player at (5, 5) and the stairs at (15, 15). Nothing else is spawned.
pub fn arena_session(seed: u64) -> GameSession {
    let mut level = Level::new(20, 20);
    let room = Rect::new(0, 0, 19, 19);
    level.create_room(&room);
    level.rooms.push(room);
    level.player_start = Position::new(5, 5);
    level.stairs = Position::new(15, 15);
    GameSession::with_level(
        GameConfig::default(),
        seed,
        GeneratedLevel {
            level,
            spawns: Vec::new(),
        },
    )
    .expect("default config is valid")
}
