//! # Game Mathematics
//!
//! Dice rolls and small geometry helpers shared by generation and the AI.

use crate::game::Position;
use rand::Rng;

/// Uniform integer source over a closed range.
///
/// Implemented for every [`rand::Rng`], so a session's `StdRng` and a test's
/// seeded generator both roll the same way.
pub trait Dice {
    /// Rolls an integer in `min..=max`. A degenerate range returns `min`.
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

impl<R: Rng + ?Sized> Dice for R {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..=max)
    }
}

/// The single king's-move step that best approximates the direction from
/// `from` to `to`: the unit vector, rounded per axis.
///
/// # Examples
///
/// ```
/// use delve::{step_towards, Position};
///
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(10, 1)), Position::new(1, 0));
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(-4, 4)), Position::new(-1, 1));
/// assert_eq!(step_towards(Position::new(2, 2), Position::new(2, 2)), Position::new(0, 0));
/// ```
pub fn step_towards(from: Position, to: Position) -> Position {
    let dx = (to.x - from.x) as f32;
    let dy = (to.y - from.y) as f32;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return Position::new(0, 0);
    }
    Position::new((dx / distance).round() as i32, (dy / distance).round() as i32)
}

/// Uppercases the first letter of a name for the start of a sentence.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
