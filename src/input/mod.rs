//! # Input Module
//!
//! Player intents and the frontend boundary of the turn engine.
//!
//! The session never reads a keyboard. It asks a [`Frontend`] for the next
//! [`Intent`], for menu choices and for targeted tiles, and every one of
//! those requests may be cancelled.

pub mod scripted;

pub use scripted::*;

use crate::config::MAX_MENU_OPTIONS;
use crate::game::{Direction, GameSession, Position};
use crate::{DelveError, DelveResult};

/// One player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Step or attack in a direction
    Move(Direction),
    /// Pick up the item under the player
    PickUp,
    /// Choose and use an inventory item
    UseItem,
    /// Choose and drop an inventory item
    DropItem,
    /// Take the stairs down
    Descend,
    /// Show level and stats
    ShowCharacterSheet,
    /// Debug: show the whole map
    ToggleFullMapReveal,
    /// Do nothing
    Cancel,
    /// Leave the game
    Quit,
}

/// Supplies decisions to a running session.
///
/// Implementations are expected to render whatever they need before
/// answering; the session calls these at its suspension points only.
pub trait Frontend {
    /// The player's next intent.
    fn next_intent(&mut self, session: &GameSession) -> Intent;

    /// Picks one of `options` by index, or `None` to cancel. An empty
    /// option list is an informational box that only needs acknowledging.
    fn prompt_choice(&mut self, header: &str, options: &[String]) -> Option<usize>;

    /// Picks a map tile, or `None` to cancel.
    fn prompt_tile(&mut self, session: &GameSession, max_range: Option<f32>) -> Option<Position>;
}

/// Shows a menu and returns the chosen index.
///
/// Menus are keyed by the letters a-z, so more than 26 options is an
/// error. Out-of-range answers from the frontend count as a cancel.
pub fn menu(
    frontend: &mut dyn Frontend,
    header: &str,
    options: &[String],
) -> DelveResult<Option<usize>> {
    if options.len() > MAX_MENU_OPTIONS {
        return Err(DelveError::TooManyMenuOptions {
            count: options.len(),
            max: MAX_MENU_OPTIONS,
        });
    }
    Ok(frontend
        .prompt_choice(header, options)
        .filter(|&index| index < options.len()))
}

/// The letter that selects menu option `index`.
///
/// # Examples
///
/// ```
/// use delve::option_key;
///
/// assert_eq!(option_key(0), Some('a'));
/// assert_eq!(option_key(25), Some('z'));
/// assert_eq!(option_key(26), None);
/// ```
pub fn option_key(index: usize) -> Option<char> {
    if index < MAX_MENU_OPTIONS {
        Some((b'a' + index as u8) as char)
    } else {
        None
    }
}

/// Keyboard layout for character-based frontends.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Whether to enable Vi-style movement keys (hjklyubn)
    pub vi_keys_enabled: bool,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Creates the default bindings with Vi keys enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Intent, KeyBindings};
    ///
    /// let keys = KeyBindings::new();
    /// assert_eq!(keys.intent_for_key('k'), Some(Intent::Move(Direction::North)));
    /// assert_eq!(keys.intent_for_key('g'), Some(Intent::PickUp));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Translates one key into an intent.
    pub fn intent_for_key(&self, key: char) -> Option<Intent> {
        let movement = |direction| Some(Intent::Move(direction));
        match key {
            '8' => return movement(Direction::North),
            '2' => return movement(Direction::South),
            '4' => return movement(Direction::West),
            '6' => return movement(Direction::East),
            '7' => return movement(Direction::Northwest),
            '9' => return movement(Direction::Northeast),
            '1' => return movement(Direction::Southwest),
            '3' => return movement(Direction::Southeast),
            _ => {}
        }

        if self.vi_keys_enabled {
            match key {
                'k' => return movement(Direction::North),
                'j' => return movement(Direction::South),
                'h' => return movement(Direction::West),
                'l' => return movement(Direction::East),
                'y' => return movement(Direction::Northwest),
                'u' => return movement(Direction::Northeast),
                'b' => return movement(Direction::Southwest),
                'n' => return movement(Direction::Southeast),
                _ => {}
            }
        }

        match key {
            'g' | ',' => Some(Intent::PickUp),
            'i' => Some(Intent::UseItem),
            'd' => Some(Intent::DropItem),
            '>' => Some(Intent::Descend),
            'c' => Some(Intent::ShowCharacterSheet),
            'R' => Some(Intent::ToggleFullMapReveal),
            '.' | '5' | ' ' => Some(Intent::Cancel),
            'q' => Some(Intent::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedChoice(Option<usize>);

    impl Frontend for FixedChoice {
        fn next_intent(&mut self, _session: &GameSession) -> Intent {
            Intent::Quit
        }

        fn prompt_choice(&mut self, _header: &str, _options: &[String]) -> Option<usize> {
            self.0
        }

        fn prompt_tile(&mut self, _session: &GameSession, _max_range: Option<f32>) -> Option<Position> {
            None
        }
    }

    #[test]
    fn test_menu_rejects_too_many_options() {
        let options: Vec<String> = (0..27).map(|i| format!("option {}", i)).collect();
        let result = menu(&mut FixedChoice(Some(0)), "pick", &options);
        assert!(matches!(
            result,
            Err(DelveError::TooManyMenuOptions { count: 27, max: 26 })
        ));

        assert_eq!(menu(&mut FixedChoice(Some(25)), "pick", &options[..26]).unwrap(), Some(25));
    }

    #[test]
    fn test_menu_out_of_range_is_cancel() {
        let options = vec!["one".to_string(), "two".to_string()];
        assert_eq!(menu(&mut FixedChoice(Some(2)), "pick", &options).unwrap(), None);
        assert_eq!(menu(&mut FixedChoice(None), "pick", &options).unwrap(), None);
        assert_eq!(menu(&mut FixedChoice(Some(1)), "pick", &options).unwrap(), Some(1));
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let mut keys = KeyBindings::new();
        assert_eq!(keys.intent_for_key('h'), Some(Intent::Move(Direction::West)));
        keys.vi_keys_enabled = false;
        assert_eq!(keys.intent_for_key('h'), None);
        assert_eq!(keys.intent_for_key('4'), Some(Intent::Move(Direction::West)));
        assert_eq!(keys.intent_for_key('q'), Some(Intent::Quit));
        assert_eq!(keys.intent_for_key('x'), None);
    }
}
