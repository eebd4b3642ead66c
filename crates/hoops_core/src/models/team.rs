use super::player::{Player, PlayerId, Position};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which bench a team occupies in a matchup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

/// A team's full roster (starters and bench).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    pub name: String,
    pub players: Vec<Player>,
}

impl Roster {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self { name: name.into(), players }
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Remove a player (release, injury). Returns the removed player.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    /// Up to `cap` players, highest overall first (ties broken by id).
    pub fn rotation(&self, cap: usize) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| b.overall.cmp(&a.overall).then(a.id.cmp(&b.id)));
        sorted.truncate(cap);
        sorted
    }
}

/// Starting five: one player per position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Lineup {
    #[serde(default)]
    pub pg: Option<PlayerId>,
    #[serde(default)]
    pub sg: Option<PlayerId>,
    #[serde(default)]
    pub sf: Option<PlayerId>,
    #[serde(default)]
    pub pf: Option<PlayerId>,
    #[serde(default)]
    pub c: Option<PlayerId>,
}

impl Lineup {
    pub fn new(ids: [u32; 5]) -> Self {
        Self {
            pg: Some(PlayerId(ids[0])),
            sg: Some(PlayerId(ids[1])),
            sf: Some(PlayerId(ids[2])),
            pf: Some(PlayerId(ids[3])),
            c: Some(PlayerId(ids[4])),
        }
    }

    pub fn get(&self, position: Position) -> Option<PlayerId> {
        match position {
            Position::PG => self.pg,
            Position::SG => self.sg,
            Position::SF => self.sf,
            Position::PF => self.pf,
            Position::C => self.c,
        }
    }

    pub fn set(&mut self, position: Position, id: Option<PlayerId>) {
        let slot = match position {
            Position::PG => &mut self.pg,
            Position::SG => &mut self.sg,
            Position::SF => &mut self.sf,
            Position::PF => &mut self.pf,
            Position::C => &mut self.c,
        };
        *slot = id;
    }

    /// `(position, player)` for every filled slot, in lineup order.
    pub fn filled(&self) -> impl Iterator<Item = (Position, PlayerId)> + '_ {
        Position::ALL.into_iter().filter_map(|pos| self.get(pos).map(|id| (pos, id)))
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.filled().any(|(_, p)| p == id)
    }

    pub fn position_of(&self, id: PlayerId) -> Option<Position> {
        self.filled().find(|(_, p)| *p == id).map(|(pos, _)| pos)
    }

    /// Fail fast on an unfilled slot, an off-roster player or a duplicate.
    pub fn validate(&self, side: Side, roster: &Roster) -> Result<(), GameError> {
        if roster.is_empty() {
            return Err(GameError::EmptyRoster { side });
        }
        let mut seen: Vec<PlayerId> = Vec::with_capacity(5);
        for position in Position::ALL {
            let Some(id) = self.get(position) else {
                return Err(GameError::IncompleteLineup { side, position });
            };
            if !roster.contains(id) {
                return Err(GameError::UnknownLineupPlayer { side, player: id });
            }
            if seen.contains(&id) {
                return Err(GameError::DuplicateLineupPlayer { side, player: id });
            }
            seen.push(id);
        }
        Ok(())
    }

    /// Best-rated starter for each position, falling back to anyone left.
    pub fn auto_pick(roster: &Roster) -> Self {
        let mut lineup = Lineup::default();
        let mut taken: Vec<PlayerId> = Vec::with_capacity(5);
        for position in Position::ALL {
            let pick = roster
                .rotation(roster.len())
                .into_iter()
                .find(|p| p.position == position && !taken.contains(&p.id));
            if let Some(player) = pick {
                lineup.set(position, Some(player.id));
                taken.push(player.id);
            }
        }
        for position in Position::ALL {
            if lineup.get(position).is_some() {
                continue;
            }
            let pick = roster.rotation(roster.len()).into_iter().find(|p| !taken.contains(&p.id));
            if let Some(player) = pick {
                lineup.set(position, Some(player.id));
                taken.push(player.id);
            }
        }
        lineup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_test_roster;

    #[test]
    fn test_rotation_orders_by_overall_and_caps() {
        let roster = create_test_roster("Home", 1, 70);
        let rotation = roster.rotation(8);
        assert_eq!(rotation.len(), 8);
        for pair in rotation.windows(2) {
            assert!(pair[0].overall >= pair[1].overall);
        }
    }

    #[test]
    fn test_validate_rejects_missing_slot() {
        let roster = create_test_roster("Home", 1, 70);
        let mut lineup = Lineup::auto_pick(&roster);
        lineup.set(Position::C, None);
        let err = lineup.validate(Side::Home, &roster).unwrap_err();
        assert!(matches!(err, GameError::IncompleteLineup { position: Position::C, .. }));
    }

    #[test]
    fn test_validate_rejects_unknown_and_duplicate_players() {
        let roster = create_test_roster("Home", 1, 70);
        let mut lineup = Lineup::auto_pick(&roster);
        lineup.set(Position::SF, Some(PlayerId(999)));
        assert!(matches!(
            lineup.validate(Side::Away, &roster),
            Err(GameError::UnknownLineupPlayer { side: Side::Away, .. })
        ));

        let mut lineup = Lineup::auto_pick(&roster);
        lineup.set(Position::SF, lineup.get(Position::PG));
        assert!(matches!(
            lineup.validate(Side::Home, &roster),
            Err(GameError::DuplicateLineupPlayer { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_roster() {
        let roster = Roster::new("Nobody", Vec::new());
        assert!(matches!(
            Lineup::new([1, 2, 3, 4, 5]).validate(Side::Home, &roster),
            Err(GameError::EmptyRoster { side: Side::Home })
        ));
    }

    #[test]
    fn test_auto_pick_fills_every_position() {
        let roster = create_test_roster("Home", 1, 70);
        let lineup = Lineup::auto_pick(&roster);
        assert!(lineup.validate(Side::Home, &roster).is_ok());
        assert_eq!(lineup.filled().count(), 5);
    }

    #[test]
    fn test_remove_player() {
        let mut roster = create_test_roster("Home", 1, 70);
        let before = roster.len();
        assert!(roster.remove_player(PlayerId(1)).is_some());
        assert!(roster.remove_player(PlayerId(1)).is_none());
        assert_eq!(roster.len(), before - 1);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Home.opponent(), Side::Away);
        assert_eq!(Side::Away.opponent().opponent(), Side::Away);
    }
}
