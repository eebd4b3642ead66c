use crate::engine::config::GameConfig;
use crate::error::GameError;
use std::env;

pub const CONFIG_PATH_ENV: &str = "HOOPS_CONFIG_PATH";

impl GameConfig {
    /// Config file named by `HOOPS_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self, GameError> {
        config_from_path_var(env::var(CONFIG_PATH_ENV).ok().as_deref())
    }
}

fn config_from_path_var(value: Option<&str>) -> Result<GameConfig, GameError> {
    let Some(path) = value.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(GameConfig::default());
    };
    GameConfig::load(path).map_err(|e| match e {
        GameError::InvalidConfig(msg) => {
            GameError::InvalidConfig(format!("{CONFIG_PATH_ENV}='{path}': {msg}"))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unset_or_blank_means_defaults() {
        assert_eq!(config_from_path_var(None).unwrap(), GameConfig::default());
        assert_eq!(config_from_path_var(Some("  ")).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_reads_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"playback": {{"speed": 4}}}}"#).unwrap();
        let cfg = config_from_path_var(file.path().to_str()).unwrap();
        assert_eq!(cfg.playback.speed, 4);
    }

    #[test]
    fn test_missing_file_names_the_variable() {
        let err = config_from_path_var(Some("/nonexistent/hoops.yaml")).unwrap_err();
        assert!(err.to_string().contains(CONFIG_PATH_ENV));
    }
}
