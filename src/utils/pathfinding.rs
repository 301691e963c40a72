//! # Pathfinding Algorithms
//!
//! Reachability and shortest paths over the tile grid, built on the
//! `pathfinding` crate. Movement is eight-directional with uniform cost.

use crate::game::{Level, Position};
use ::pathfinding::prelude::{astar, bfs, dijkstra_all};
use std::collections::HashSet;

fn neighbours<'a>(
    pos: Position,
    passable: &'a impl Fn(Position) -> bool,
) -> impl Iterator<Item = (Position, u32)> + 'a {
    pos.adjacent_positions()
        .into_iter()
        .filter(move |next| passable(*next))
        .map(|next| (next, 1))
}

/// Every walkable tile reachable from `start`, `start` included.
pub fn reachable_from(level: &Level, start: Position) -> HashSet<Position> {
    reachable_with(start, |pos| !level.is_blocked(pos))
}

/// Every position reachable from `start` through tiles accepted by
/// `passable`, `start` included.
pub fn reachable_with(start: Position, passable: impl Fn(Position) -> bool) -> HashSet<Position> {
    let mut reachable: HashSet<Position> = dijkstra_all(&start, |pos| {
        neighbours(*pos, &passable).collect::<Vec<_>>()
    })
    .into_keys()
    .collect();
    reachable.insert(start);
    reachable
}

/// Shortest path from `start` to `goal`, excluding `start`.
///
/// The goal itself does not need to pass `passable`, so a path can end on a
/// monster or an unexplored tile.
pub fn find_path(
    start: Position,
    goal: Position,
    passable: impl Fn(Position) -> bool,
) -> Option<Vec<Position>> {
    let (path, _cost) = astar(
        &start,
        |pos| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|next| *next == goal || passable(*next))
                .map(|next| (next, 1))
                .collect::<Vec<_>>()
        },
        |pos| {
            let dx = (pos.x - goal.x).unsigned_abs();
            let dy = (pos.y - goal.y).unsigned_abs();
            dx.max(dy)
        },
        |pos| *pos == goal,
    )?;
    Some(path.into_iter().skip(1).collect())
}

/// Shortest path from `start` to the nearest position accepted by
/// `is_goal`, excluding `start`. An empty path means `start` is a goal.
pub fn find_nearest(
    start: Position,
    passable: impl Fn(Position) -> bool,
    is_goal: impl Fn(Position) -> bool,
) -> Option<Vec<Position>> {
    let path = bfs(
        &start,
        |pos| neighbours(*pos, &passable).map(|(next, _)| next).collect::<Vec<_>>(),
        |pos| is_goal(*pos),
    )?;
    Some(path.into_iter().skip(1).collect())
}
