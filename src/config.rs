use serde::{Deserialize, Serialize};
use crate::error::CoupError;

pub const NUM_PLAYERS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Index of the player taking the first turn. They start with one coin less.
    pub first_player: usize,
    /// Seed for the deck shuffles. `None` seeds from entropy once, when the environment is built.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_player: 0,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CoupError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoupError> {
        if self.first_player >= NUM_PLAYERS {
            return Err(CoupError::InvalidConfig(format!(
                "first_player must be below {NUM_PLAYERS}, got {}",
                self.first_player
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::error::CoupError;

    #[test]
    fn partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 12 }"#).unwrap();
        assert_eq!(config, GameConfig { first_player: 0, seed: Some(12) });

        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn rejects_third_player() {
        let err = GameConfig::from_json(r#"{ "first_player": 2 }"#).unwrap_err();
        assert!(matches!(err, CoupError::InvalidConfig(_)));

        let err = GameConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, CoupError::ConfigFormat(_)));
    }
}
