//! # Utilities Module
//!
//! Utility functions for randomness, geometry and pathfinding.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
