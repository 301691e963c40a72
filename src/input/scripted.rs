//! # Scripted Frontend
//!
//! A frontend that replays queued answers. Used by tests and for replaying
//! recorded key sequences.

use crate::game::{GameSession, Position};
use crate::input::{Frontend, Intent, KeyBindings};
use std::collections::VecDeque;

/// Replays queued intents, menu choices and tiles in order.
///
/// Once the intent queue runs dry it answers `Quit`; empty choice and tile
/// queues answer with a cancel. Information boxes (menus without options)
/// are recorded but never consume a queued choice.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFrontend {
    intents: VecDeque<Intent>,
    choices: VecDeque<Option<usize>>,
    tiles: VecDeque<Option<Position>>,
    /// Headers of every menu shown so far
    pub menu_headers: Vec<String>,
    /// Number of tile prompts answered so far
    pub tile_prompts: usize,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a script from a key string using the default bindings.
    /// Unbound keys are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::ScriptedFrontend;
    ///
    /// let frontend = ScriptedFrontend::from_keys("llg?q");
    /// assert_eq!(frontend.remaining_intents(), 4);
    /// ```
    pub fn from_keys(keys: &str) -> Self {
        let bindings = KeyBindings::new();
        Self::new().with_intents(keys.chars().filter_map(|key| bindings.intent_for_key(key)))
    }

    pub fn with_intents(mut self, intents: impl IntoIterator<Item = Intent>) -> Self {
        self.intents.extend(intents);
        self
    }

    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Option<usize>>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn with_tiles(mut self, tiles: impl IntoIterator<Item = Option<Position>>) -> Self {
        self.tiles.extend(tiles);
        self
    }

    pub fn remaining_intents(&self) -> usize {
        self.intents.len()
    }
}

impl Frontend for ScriptedFrontend {
    fn next_intent(&mut self, _session: &GameSession) -> Intent {
        self.intents.pop_front().unwrap_or(Intent::Quit)
    }

    fn prompt_choice(&mut self, header: &str, options: &[String]) -> Option<usize> {
        self.menu_headers.push(header.to_string());
        if options.is_empty() {
            return None;
        }
        self.choices.pop_front().flatten()
    }

    fn prompt_tile(&mut self, _session: &GameSession, _max_range: Option<f32>) -> Option<Position> {
        self.tile_prompts += 1;
        self.tiles.pop_front().flatten()
    }
}
