//! # Message Log
//!
//! The append-only sink for player-facing text.

use crate::game::Color;
use std::collections::VecDeque;

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTone {
    /// Ordinary narration
    Info,
    /// Something the player should not miss
    Warning,
    /// The player is hurt or dying
    Danger,
    /// Good news: kills, healing, level-ups
    Success,
    /// Spell and scroll effects
    Magic,
}

impl MessageTone {
    /// Default display color for the tone.
    pub fn color(self) -> Color {
        match self {
            MessageTone::Info => Color::WHITE,
            MessageTone::Warning => Color::YELLOW,
            MessageTone::Danger => Color::RED,
            MessageTone::Success => Color::LIGHT_GREEN,
            MessageTone::Magic => Color::LIGHT_CYAN,
        }
    }
}

/// A single line in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: MessageTone,
}

/// Bounded message history; the oldest line falls off when full.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends a message, dropping the oldest one if the log is full.
    pub fn add(&mut self, text: impl Into<String>, tone: MessageTone) {
        let text = text.into();
        log::debug!("message: {}", text);
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message { text, tone });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// Whether any retained line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|message| message.text.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_drops_oldest() {
        let mut log = MessageLog::new(2);
        log.add("one", MessageTone::Info);
        log.add("two", MessageTone::Warning);
        log.add("three", MessageTone::Danger);

        let texts: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(log.last().unwrap().tone, MessageTone::Danger);
        assert!(!log.contains("one"));
    }

    #[test]
    fn test_tone_colors() {
        assert_eq!(MessageTone::Danger.color(), Color::RED);
        assert_ne!(MessageTone::Info.color(), MessageTone::Magic.color());
    }
}
