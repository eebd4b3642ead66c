pub mod config_env;
pub mod json_api;

pub use config_env::CONFIG_PATH_ENV;
pub use json_api::{
    events_fingerprint, game_request_schema, simulate_game, simulate_game_json, GameRequest, GameResponse,
    PlayerData, TeamData,
};
