pub mod box_score;
pub mod events;
pub mod player;
pub mod team;

pub use box_score::{BoxScore, MatchupResult, PlayerGameStat, PlayerLine, TeamTotals};
pub use events::{EventCategory, GameEvent};
pub use player::{Player, PlayerAttributes, PlayerId, Position};
pub use team::{Lineup, Roster, Side};
