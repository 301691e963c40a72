//! # Visibility
//!
//! Field-of-view computation and exploration memory.
//!
//! The FOV primitive computes which tiles an observer can see. The
//! [`Visibility`] layer on top of it decides *when* to recompute (only after
//! the observer moved or the level changed), stamps every seen tile as
//! explored, and answers the display questions the renderer and the AI ask.
//! It owns no entities.

use crate::config::RulesConfig;
use crate::game::{Entity, Level, Position};
use serde::{Deserialize, Serialize};

/// Available field-of-view algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FovAlgorithm {
    /// Recursive shadowcasting over eight octants
    Shadowcast,
    /// Straight rays from the observer to every cell on the radius box
    RayCast,
}

/// The set of tiles currently in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FovMap {
    width: i32,
    height: i32,
    visible: Vec<bool>,
}

impl FovMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            visible: vec![false; (width.max(0) * height.max(0)) as usize],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    fn set_visible(&mut self, pos: Position) {
        if let Some(idx) = self.index(pos) {
            self.visible[idx] = true;
        }
    }

    pub fn is_in_fov(&self, pos: Position) -> bool {
        self.index(pos).map(|idx| self.visible[idx]).unwrap_or(false)
    }

    /// Iterates over every visible position.
    pub fn visible_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(move |(idx, _)| Position::new(idx as i32 % width, idx as i32 / width))
    }
}

/// Computes the field of view of an observer standing at `origin`.
///
/// Opaque tiles are included in the result only when `light_walls` is set.
///
/// # Examples
///
/// ```
/// use delve::{compute_fov, FovAlgorithm, Level, Position, Rect};
///
/// let mut level = Level::new(20, 20);
/// level.create_room(&Rect::new(0, 0, 19, 19));
/// let fov = compute_fov(&level, Position::new(9, 9), 4, true, FovAlgorithm::Shadowcast);
/// assert!(fov.is_in_fov(Position::new(9, 9)));
/// assert!(fov.is_in_fov(Position::new(12, 9)));
/// assert!(!fov.is_in_fov(Position::new(15, 9)));
/// ```
pub fn compute_fov(
    level: &Level,
    origin: Position,
    radius: i32,
    light_walls: bool,
    algorithm: FovAlgorithm,
) -> FovMap {
    let mut fov = FovMap::new(level.width, level.height);
    if !level.in_bounds(origin) {
        return fov;
    }
    fov.set_visible(origin);

    match algorithm {
        FovAlgorithm::Shadowcast => {
            let scan = Shadowcast {
                level,
                origin,
                radius,
                light_walls,
            };
            for octant in 0..8 {
                scan.cast_light(&mut fov, 1, 1.0, 0.0, OCTANTS[octant]);
            }
        }
        FovAlgorithm::RayCast => cast_rays(&mut fov, level, origin, radius, light_walls),
    }

    fov
}

/// Octant transforms as `[xx, xy, yx, yy]`.
const OCTANTS: [[i32; 4]; 8] = [
    [1, 0, 0, 1],
    [0, 1, 1, 0],
    [0, -1, 1, 0],
    [-1, 0, 0, 1],
    [-1, 0, 0, -1],
    [0, -1, -1, 0],
    [0, 1, -1, 0],
    [1, 0, 0, -1],
];

struct Shadowcast<'a> {
    level: &'a Level,
    origin: Position,
    radius: i32,
    light_walls: bool,
}

impl Shadowcast<'_> {
    fn cast_light(&self, fov: &mut FovMap, row: i32, mut start: f32, end: f32, t: [i32; 4]) {
        if start < end {
            return;
        }
        let [xx, xy, yx, yy] = t;
        let radius_sq = self.radius * self.radius;
        let mut new_start = 0.0;

        for j in row..=self.radius {
            let dy = -j;
            let mut blocked = false;

            for dx in -j..=0 {
                let l_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
                let r_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);
                if start < r_slope {
                    continue;
                } else if end > l_slope {
                    break;
                }

                let pos = Position::new(
                    self.origin.x + dx * xx + dy * xy,
                    self.origin.y + dx * yx + dy * yy,
                );
                let opaque = self.level.blocks_sight(pos);

                if dx * dx + dy * dy <= radius_sq && (self.light_walls || !opaque) {
                    fov.set_visible(pos);
                }

                if blocked {
                    if opaque {
                        new_start = r_slope;
                        continue;
                    }
                    blocked = false;
                    start = new_start;
                } else if opaque && j < self.radius {
                    blocked = true;
                    self.cast_light(fov, j + 1, start, l_slope, t);
                    new_start = r_slope;
                }
            }

            if blocked {
                break;
            }
        }
    }
}

fn cast_rays(fov: &mut FovMap, level: &Level, origin: Position, radius: i32, light_walls: bool) {
    let radius_sq = radius * radius;
    let mut targets = Vec::new();
    for d in -radius..=radius {
        targets.push(Position::new(origin.x + d, origin.y - radius));
        targets.push(Position::new(origin.x + d, origin.y + radius));
        targets.push(Position::new(origin.x - radius, origin.y + d));
        targets.push(Position::new(origin.x + radius, origin.y + d));
    }

    for target in targets {
        for pos in line(origin, target).into_iter().skip(1) {
            let offset = pos - origin;
            if offset.x * offset.x + offset.y * offset.y > radius_sq || !level.in_bounds(pos) {
                break;
            }
            if level.blocks_sight(pos) {
                if light_walls {
                    fov.set_visible(pos);
                }
                break;
            }
            fov.set_visible(pos);
        }
    }
}

/// Bresenham line from `from` to `to`, both ends included.
pub(crate) fn line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut points = vec![current];

    while current != to {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
        points.push(current);
    }
    points
}

/// How a tile should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileView {
    /// In view right now
    Visible,
    /// Seen before, remembered
    Remembered,
    /// Never seen
    Unknown,
}

/// The player's view of the active level.
#[derive(Debug, Clone)]
pub struct Visibility {
    fov: FovMap,
    dirty: bool,
    reveal_map: bool,
    radius: i32,
    light_walls: bool,
    algorithm: FovAlgorithm,
}

impl Visibility {
    pub fn new(level: &Level, rules: &RulesConfig) -> Self {
        Self {
            fov: FovMap::new(level.width, level.height),
            dirty: true,
            reveal_map: false,
            radius: rules.fov_radius,
            light_walls: rules.light_walls,
            algorithm: rules.fov_algorithm,
        }
    }

    /// Requests a recompute on the next refresh.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drops the old field of view after a level change.
    pub fn reset_for_level(&mut self, level: &Level) {
        self.fov = FovMap::new(level.width, level.height);
        self.dirty = true;
    }

    /// Recomputes the field of view if it is stale and marks every visible
    /// tile as explored. Returns whether a recompute happened.
    pub fn refresh(&mut self, level: &mut Level, observer: Position) -> bool {
        if !self.dirty {
            return false;
        }
        self.fov = compute_fov(level, observer, self.radius, self.light_walls, self.algorithm);
        for pos in self.fov.visible_positions() {
            if let Some(tile) = level.tile_mut(pos) {
                tile.explored = true;
            }
        }
        self.dirty = false;
        true
    }

    /// Whether a tile is in the observer's current field of view.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.fov.is_in_fov(pos)
    }

    /// How the renderer should show a tile.
    pub fn tile_view(&self, level: &Level, pos: Position) -> TileView {
        if self.reveal_map || self.is_visible(pos) {
            TileView::Visible
        } else if level.is_explored(pos) {
            TileView::Remembered
        } else {
            TileView::Unknown
        }
    }

    /// Whether an entity may be drawn: it is in view, or it is marked always
    /// visible and stands on an explored tile.
    pub fn can_display(&self, level: &Level, entity: &Entity) -> bool {
        self.reveal_map
            || self.is_visible(entity.position)
            || (entity.always_visible && level.is_explored(entity.position))
    }

    /// Debug switch that shows the whole map. Returns the new state.
    pub fn toggle_reveal(&mut self) -> bool {
        self.reveal_map = !self.reveal_map;
        self.reveal_map
    }
}
