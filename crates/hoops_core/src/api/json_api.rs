use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

use crate::engine::config::GameConfig;
use crate::engine::playback::run_fast_forward;
use crate::engine::session::{GameSession, GameSetup, TeamSetup};
use crate::error::GameError;
use crate::models::{BoxScore, GameEvent, Lineup, Player, PlayerAttributes, Position, Roster, Side};
use crate::tactics::Tactic;
use crate::SCHEMA_VERSION;

pub mod error_codes {
    pub const INVALID_JSON: &str = "E_INVALID_JSON";
    pub const UNSUPPORTED_SCHEMA: &str = "E_UNSUPPORTED_SCHEMA";
    pub const INVALID_REQUEST: &str = "E_INVALID_REQUEST";
    pub const INVALID_LINEUP: &str = "E_INVALID_LINEUP";
    pub const INVALID_CONFIG: &str = "E_INVALID_CONFIG";
    pub const SERIALIZATION: &str = "E_SERIALIZATION";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn default_rating() -> u8 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home: TeamData,
    pub away: TeamData,
    /// "balanced" | "inside" | "outside" | "fast-break" | "defense"
    #[serde(default)]
    pub home_tactic: Option<String>,
    #[serde(default)]
    pub away_tactic: Option<String>,
    /// "home" | "away"; the other side re-rolls its tactic between quarters
    #[serde(default)]
    pub controlled_side: Option<String>,
    /// Engine tuning; falls back to `HOOPS_CONFIG_PATH`, then defaults
    #[serde(default)]
    #[schemars(with = "Option<serde_json::Value>")]
    pub config: Option<GameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TeamData {
    pub name: String,
    pub players: Vec<PlayerData>,
    /// Player ids for PG, SG, SF, PF, C. Picked by rating when absent.
    #[serde(default)]
    pub lineup: Option<[u32; 5]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlayerData {
    pub id: u32,
    pub name: String,
    /// "PG" | "SG" | "SF" | "PF" | "C"
    pub position: String,
    pub overall: u8,
    #[serde(default = "default_rating")]
    pub three_point: u8,
    #[serde(default = "default_rating")]
    pub free_throw: u8,
    #[serde(default = "default_rating")]
    pub rebounding: u8,
    #[serde(default = "default_rating")]
    pub speed: u8,
    #[serde(default = "default_rating")]
    pub defense: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub home_score: u16,
    pub away_score: u16,
    pub box_score: BoxScore,
    pub events: Vec<GameEvent>,
    /// SHA-256 of the serialized event stream
    pub fingerprint: String,
}

fn convert_player(data: PlayerData) -> Result<Player, GameError> {
    let position = Position::from_str(&data.position).map_err(GameError::InvalidRequest)?;
    let ratings = [data.overall, data.three_point, data.free_throw, data.rebounding, data.speed, data.defense];
    if ratings.iter().any(|r| *r > 100) {
        return Err(GameError::InvalidRequest(format!(
            "player {} has a rating above 100",
            data.id
        )));
    }
    Ok(Player::new(data.id, data.name, position, data.overall).with_attributes(PlayerAttributes {
        three_point: data.three_point,
        free_throw: data.free_throw,
        rebounding: data.rebounding,
        speed: data.speed,
        defense: data.defense,
    }))
}

fn convert_team(data: TeamData, tactic: Option<&str>) -> Result<TeamSetup, GameError> {
    let players = data.players.into_iter().map(convert_player).collect::<Result<Vec<_>, _>>()?;
    let roster = Roster::new(data.name, players);
    let lineup = match data.lineup {
        Some(ids) => Lineup::new(ids),
        None => Lineup::auto_pick(&roster),
    };
    let tactic = match tactic {
        Some(name) => Tactic::from_str(name)?,
        None => Tactic::default(),
    };
    Ok(TeamSetup { roster, lineup, tactic })
}

fn parse_side(value: &str) -> Result<Side, GameError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "home" => Ok(Side::Home),
        "away" => Ok(Side::Away),
        other => Err(GameError::InvalidRequest(format!("unknown side: {other}"))),
    }
}

impl GameRequest {
    pub fn into_setup(self) -> Result<(GameSetup, GameConfig, u64), GameError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(GameError::InvalidRequest(format!(
                "Unsupported schema version: {}",
                self.schema_version
            )));
        }
        let controlled_side = self.controlled_side.as_deref().map(parse_side).transpose()?;
        let home = convert_team(self.home, self.home_tactic.as_deref())?;
        let away = convert_team(self.away, self.away_tactic.as_deref())?;
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => GameConfig::from_env()?,
        };
        Ok((GameSetup { home, away, controlled_side }, config, self.seed))
    }
}

/// SHA-256 over the JSON event stream, lowercase hex.
pub fn events_fingerprint(events: &[GameEvent]) -> Result<String, GameError> {
    let bytes = serde_json::to_vec(events)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Typed entry point: validate, play the whole game headless, report.
pub fn simulate_game(request: GameRequest) -> Result<GameResponse, GameError> {
    let (setup, config, seed) = request.into_setup()?;
    let mut session = GameSession::with_seed(setup, config, seed)?;
    run_fast_forward(&mut session);

    let box_score = session.box_score();
    let events = session.events().as_slice().to_vec();
    let fingerprint = events_fingerprint(&events)?;
    tracing::debug!(seed, home = box_score.home_score, away = box_score.away_score, "headless game simulated");

    Ok(GameResponse {
        schema_version: SCHEMA_VERSION,
        home_score: box_score.home_score,
        away_score: box_score.away_score,
        box_score,
        events,
        fingerprint,
    })
}

fn error_code_for(err: &GameError) -> &'static str {
    match err {
        GameError::InvalidRequest(msg) if msg.starts_with("Unsupported schema") => error_codes::UNSUPPORTED_SCHEMA,
        GameError::EmptyRoster { .. }
        | GameError::IncompleteLineup { .. }
        | GameError::UnknownLineupPlayer { .. }
        | GameError::DuplicateLineupPlayer { .. } => error_codes::INVALID_LINEUP,
        GameError::InvalidConfig(_) => error_codes::INVALID_CONFIG,
        GameError::Serialization(_) => error_codes::SERIALIZATION,
        _ => error_codes::INVALID_REQUEST,
    }
}

/// JSON in, JSON out, for hosts that only speak strings.
pub fn simulate_game_json(request_json: &str) -> Result<String, String> {
    let request: GameRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("Invalid JSON request: {}", e)))?;
    let response = simulate_game(request).map_err(|e| err_code(error_code_for(&e), e))?;
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

/// JSON Schema of [`GameRequest`].
pub fn game_request_schema() -> Result<String, GameError> {
    let schema = schemars::schema_for!(GameRequest);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_json(name: &str, first_id: u32, overall: u8) -> serde_json::Value {
        let positions = ["PG", "SG", "SF", "PF", "C", "PG", "SG", "SF", "PF", "C"];
        let players: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let rating = if i < 5 { overall } else { overall - 5 };
                json!({
                    "id": first_id + i as u32,
                    "name": format!("{} {}", name, i + 1),
                    "position": pos,
                    "overall": rating,
                    "three_point": 60,
                    "rebounding": 55
                })
            })
            .collect();
        json!({ "name": name, "players": players })
    }

    fn request(seed: u64) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": seed,
            "home": team_json("Harbor", 1, 72),
            "away": team_json("Summit", 101, 68),
            "home_tactic": "outside",
            "away_tactic": "fast-break",
            "controlled_side": "home",
            "config": {}
        })
    }

    #[test]
    fn test_basic_simulation() {
        let result = simulate_game_json(&request(42).to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["home_score"].is_number());
        assert_eq!(parsed["box_score"]["quarter_scores"].as_array().unwrap().len(), 4);
        assert_eq!(parsed["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_determinism() {
        let a = simulate_game_json(&request(999).to_string()).unwrap();
        let b = simulate_game_json(&request(999).to_string()).unwrap();
        assert_eq!(a, b);

        let c: GameResponse = serde_json::from_str(&simulate_game_json(&request(1000).to_string()).unwrap()).unwrap();
        let a: GameResponse = serde_json::from_str(&a).unwrap();
        assert_ne!(a.fingerprint, c.fingerprint);
    }

    #[test]
    fn test_unsupported_schema_version() {
        let mut req = request(1);
        req["schema_version"] = json!(2);
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.starts_with(error_codes::UNSUPPORTED_SCHEMA), "{}", err);
    }

    #[test]
    fn test_unknown_tactic_is_rejected() {
        let mut req = request(1);
        req["away_tactic"] = json!("zone");
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.contains("zone"), "{}", err);
    }

    #[test]
    fn test_explicit_lineup_with_unknown_player_fails_fast() {
        let mut req = request(1);
        req["home"]["lineup"] = json!([1, 2, 3, 4, 999]);
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.starts_with(error_codes::INVALID_LINEUP), "{}", err);
    }

    #[test]
    fn test_short_roster_fails_fast() {
        let mut req = request(1);
        req["away"]["players"].as_array_mut().unwrap().truncate(4);
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.starts_with(error_codes::INVALID_LINEUP), "{}", err);
    }

    #[test]
    fn test_bad_rating_and_position() {
        let mut req = request(1);
        req["home"]["players"][0]["overall"] = json!(140);
        assert!(simulate_game_json(&req.to_string()).unwrap_err().starts_with(error_codes::INVALID_REQUEST));

        let mut req = request(1);
        req["home"]["players"][0]["position"] = json!("GK");
        assert!(simulate_game_json(&req.to_string()).unwrap_err().contains("GK"));
    }

    #[test]
    fn test_invalid_json() {
        let err = simulate_game_json("{not json").unwrap_err();
        assert!(err.starts_with(error_codes::INVALID_JSON));
    }

    #[test]
    fn test_schema_lists_request_fields() {
        let schema: serde_json::Value = serde_json::from_str(&game_request_schema().unwrap()).unwrap();
        let props = &schema["properties"];
        for field in ["schema_version", "seed", "home", "away", "home_tactic", "config"] {
            assert!(props.get(field).is_some(), "missing {}", field);
        }
    }
}
