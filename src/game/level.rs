//! # Level Representation
//!
//! Tiles, rooms and the single active dungeon level.
//!
//! A level starts out as solid rock. The generator carves rooms and corridors
//! into it, which clears both the movement and the sight blocking of the
//! affected tiles.

use crate::game::{Entity, Position};
use serde::{Deserialize, Serialize};

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Whether movement through this tile is impossible
    pub blocked: bool,
    /// Whether this tile stops line of sight
    pub blocks_sight: bool,
    /// Whether the player has ever seen this tile
    pub explored: bool,
}

impl Tile {
    /// Creates a tile. Sight blocking follows movement blocking unless
    /// given explicitly.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Tile;
    ///
    /// let window = Tile::new(true, Some(false));
    /// assert!(window.blocked);
    /// assert!(!window.blocks_sight);
    ///
    /// let wall = Tile::new(true, None);
    /// assert!(wall.blocks_sight);
    /// ```
    pub fn new(blocked: bool, blocks_sight: Option<bool>) -> Self {
        Self {
            blocked,
            blocks_sight: blocks_sight.unwrap_or(blocked),
            explored: false,
        }
    }

    /// Solid rock.
    pub fn wall() -> Self {
        Self::new(true, None)
    }

    /// Open floor.
    pub fn floor() -> Self {
        Self::new(false, None)
    }
}

/// A rectangle on the map, used to describe rooms.
///
/// The far edge is exclusive: a room built with `Rect::new(x, y, w, h)`
/// has its walls on `x1`/`x2` and its floor strictly between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    /// Gets the center position of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Rect};
    ///
    /// let room = Rect::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// ```
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Checks if this rectangle touches or overlaps another one.
    ///
    /// Bounds are inclusive, so rooms sharing a wall line also intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Checks if a position lies on the carved floor of this room.
    pub fn contains_floor(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in (self.y1 + 1)..self.y2 {
            for x in (self.x1 + 1)..self.x2 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

/// The active dungeon level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Level width in tiles
    pub width: i32,
    /// Level height in tiles
    pub height: i32,
    /// 2D array of tiles, indexed as `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    /// Rooms in the order they were accepted by the generator
    pub rooms: Vec<Rect>,
    /// Where the player enters this level
    pub player_start: Position,
    /// The tile that leads one level deeper
    pub stairs: Position,
}

impl Level {
    /// Creates a level of solid rock.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Level, Position};
    ///
    /// let level = Level::new(20, 10);
    /// assert!(level.is_blocked(Position::new(3, 3)));
    /// assert!(level.is_blocked(Position::new(-1, 3)));
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::wall(); width.max(0) as usize]; height.max(0) as usize],
            rooms: Vec::new(),
            player_start: Position::default(),
            stairs: Position::default(),
        }
    }

    /// Checks if a position is within the level bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Gets a tile at the specified position.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets a mutable tile at the specified position.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Whether terrain stops movement here. Out-of-bounds counts as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.blocked).unwrap_or(true)
    }

    /// Whether terrain stops sight here. Out-of-bounds counts as opaque.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.blocks_sight).unwrap_or(true)
    }

    /// Whether the player has ever seen this tile.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.explored).unwrap_or(false)
    }

    fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.blocked = false;
            tile.blocks_sight = false;
        }
    }

    /// Carves the floor of a room, leaving its outline as wall.
    pub fn create_room(&mut self, room: &Rect) {
        for pos in room.floor_positions() {
            self.carve(pos);
        }
    }

    /// Carves a horizontal corridor covering both endpoints.
    pub fn create_h_corridor(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.carve(Position::new(x, y));
        }
    }

    /// Carves a vertical corridor covering both endpoints.
    pub fn create_v_corridor(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.carve(Position::new(x, y));
        }
    }

    /// Counts the walkable tiles of the level.
    pub fn floor_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| !tile.blocked)
            .count()
    }
}

/// Checks whether terrain or a movement-blocking entity occupies `pos`.
///
/// This is the one rule for both level generation and runtime movement.
pub fn is_occupied_or_blocked<'a>(
    level: &Level,
    entities: impl IntoIterator<Item = &'a Entity>,
    pos: Position,
) -> bool {
    level.is_blocked(pos)
        || entities
            .into_iter()
            .any(|entity| entity.blocks_movement && entity.position == pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Color;

    #[test]
    fn test_tile_sight_defaults_to_blocked() {
        assert!(Tile::wall().blocks_sight);
        assert!(!Tile::floor().blocks_sight);
        assert!(!Tile::new(false, Some(true)).blocked);
        assert!(Tile::new(false, Some(true)).blocks_sight);
        assert!(!Tile::wall().explored);
    }

    #[test]
    fn test_rect_geometry() {
        let room = Rect::new(5, 5, 10, 8);
        assert_eq!((room.x2, room.y2), (15, 13));
        assert_eq!(room.center(), Position::new(10, 9));

        assert!(room.contains_floor(Position::new(6, 6)));
        assert!(!room.contains_floor(Position::new(5, 6)));
        assert!(!room.contains_floor(Position::new(15, 6)));

        // 10x8 outline leaves a 9x7 floor
        assert_eq!(room.floor_positions().len(), 9 * 7);
    }

    #[test]
    fn test_rect_intersection_is_inclusive() {
        let room1 = Rect::new(0, 0, 5, 5);
        let sharing_edge = Rect::new(5, 0, 5, 5);
        let apart = Rect::new(6, 0, 5, 5);
        let below = Rect::new(0, 10, 3, 3);

        assert!(room1.intersects(&sharing_edge));
        assert!(sharing_edge.intersects(&room1));
        assert!(!room1.intersects(&apart));
        assert!(!room1.intersects(&below));
        assert!(room1.intersects(&room1));
    }

    #[test]
    fn test_create_room_carves_interior_only() {
        let mut level = Level::new(20, 20);
        let room = Rect::new(2, 2, 5, 4);
        level.create_room(&room);

        assert!(!level.is_blocked(Position::new(3, 3)));
        assert!(!level.is_blocked(Position::new(6, 5)));
        assert!(level.is_blocked(Position::new(2, 3)));
        assert!(level.is_blocked(Position::new(7, 3)));
        assert!(level.is_blocked(Position::new(3, 6)));
        assert_eq!(level.floor_count(), 4 * 3);
    }

    #[test]
    fn test_corridor_carving_scenario() {
        let mut level = Level::new(30, 20);
        level.create_h_corridor(10, 20, 5);
        level.create_v_corridor(5, 15, 20);

        for y in 0..20 {
            for x in 0..30 {
                let pos = Position::new(x, y);
                let carved = (y == 5 && (10..=20).contains(&x)) || (x == 20 && (5..=15).contains(&y));
                assert_eq!(level.is_blocked(pos), !carved, "tile {:?}", pos);
                assert_eq!(level.blocks_sight(pos), !carved, "tile {:?}", pos);
            }
        }
    }

    #[test]
    fn test_corridor_argument_order_irrelevant() {
        let mut forward = Level::new(10, 10);
        let mut backward = Level::new(10, 10);
        forward.create_h_corridor(2, 7, 3);
        backward.create_h_corridor(7, 2, 3);
        assert_eq!(forward, backward);

        // Carving twice changes nothing
        backward.create_h_corridor(2, 7, 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_occupied_or_blocked() {
        let mut level = Level::new(10, 10);
        level.create_room(&Rect::new(0, 0, 9, 9));

        let orc = Entity::new(Position::new(3, 3), 'o', "orc", Color::DESATURATED_GREEN, true);
        let potion = Entity::new(Position::new(4, 4), '!', "potion", Color::VIOLET, false);
        let entities = [orc, potion];

        assert!(is_occupied_or_blocked(&level, &entities, Position::new(3, 3)));
        assert!(!is_occupied_or_blocked(&level, &entities, Position::new(4, 4)));
        assert!(!is_occupied_or_blocked(&level, &entities, Position::new(5, 5)));
        assert!(is_occupied_or_blocked(&level, &entities, Position::new(0, 0)));
        assert!(is_occupied_or_blocked(&level, &entities, Position::new(50, 50)));
    }
}
