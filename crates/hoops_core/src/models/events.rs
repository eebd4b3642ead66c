use super::team::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One play-by-play line.
///
/// `category` only drives presentation (colour, icon); resolution logic never
/// reads it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    pub quarter: u8,
    /// Seconds left in the quarter when the event happened.
    pub clock_secs: u16,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Info,
    Score,
    Turnover,
    Foul,
    Defense,
    Timeout,
}

impl GameEvent {
    pub fn new(
        quarter: u8,
        clock_secs: u16,
        category: EventCategory,
        side: Option<Side>,
        text: impl Into<String>,
    ) -> Self {
        Self { quarter, clock_secs, category, side, text: text.into() }
    }

    pub fn info(quarter: u8, clock_secs: u16, text: impl Into<String>) -> Self {
        Self::new(quarter, clock_secs, EventCategory::Info, None, text)
    }

    /// In-game timestamp, e.g. `Q2 07:48`.
    pub fn timestamp(&self) -> String {
        format!("Q{} {:02}:{:02}", self.quarter, self.clock_secs / 60, self.clock_secs % 60)
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp(), self.text)
    }
}
