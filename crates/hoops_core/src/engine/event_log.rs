//! Append-only play-by-play log.
//!
//! Unbounded inside the engine; presentation layers truncate for display
//! and poll with [`EventLog::since`] to stream only what is new.

use crate::models::{EventCategory, GameEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(event = %event, "play-by-play");
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Events appended after `cursor` (a previous `len()`).
    pub fn since(&self, cursor: usize) -> &[GameEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn by_category(&self, category: EventCategory) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.category == category)
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn into_vec(self) -> Vec<GameEvent> {
        self.events
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a GameEvent;
    type IntoIter = std::slice::Iter<'a, GameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_streams_incrementally() {
        let mut log = EventLog::new();
        log.push(GameEvent::info(1, 720, "tip-off"));
        let cursor = log.len();
        assert!(log.since(cursor).is_empty());

        log.push(GameEvent::new(1, 708, EventCategory::Score, None, "two"));
        log.push(GameEvent::new(1, 696, EventCategory::Foul, None, "foul"));
        let new = log.since(cursor);
        assert_eq!(new.len(), 2);
        assert_eq!(new[0].text, "two");
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn test_by_category_and_order() {
        let mut log = EventLog::new();
        for (i, category) in [EventCategory::Info, EventCategory::Score, EventCategory::Score]
            .into_iter()
            .enumerate()
        {
            log.push(GameEvent::new(1, 720 - i as u16, category, None, format!("e{}", i)));
        }
        let scores: Vec<_> = log.by_category(EventCategory::Score).map(|e| e.text.as_str()).collect();
        assert_eq!(scores, vec!["e1", "e2"]);
        assert_eq!(log.last().map(|e| e.text.as_str()), Some("e2"));
    }
}
