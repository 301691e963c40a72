//! # Delve
//!
//! The simulation core of a turn-based, grid-dungeon exploration game.
//!
//! ## Architecture Overview
//!
//! Delve owns everything that decides what happens in the dungeon and leaves
//! drawing, windows and raw input to whoever embeds it:
//!
//! - **Generation**: rooms-and-corridors levels with whole-level retries, and
//!   depth-gated population of monsters and items
//! - **Visibility**: field-of-view computation and per-tile exploration memory
//! - **Entities**: an arena of game objects with optional Fighter, AI and Item
//!   capabilities
//! - **Turn Engine**: the `GameSession` state machine that resolves one player
//!   intent, lets every monster act and applies combat, death and leveling
//! - **Targeting**: tile and monster selection for ranged and area effects
//!
//! ## Collaborators
//!
//! The embedding application implements [`Frontend`] to supply player intents,
//! menu choices and targeted tiles. [`ScriptedFrontend`] and [`AutoExplorer`]
//! are bundled implementations for tests and headless runs.

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{GameConfig, RulesConfig};
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation or rules parameters can never produce a playable game
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Level generation kept producing degenerate levels
    #[error("Level generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// A menu was asked to show more options than there are selection keys
    #[error("Menu has {count} options but at most {max} can be shown")]
    TooManyMenuOptions { count: usize, max: usize },

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
