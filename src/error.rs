use thiserror::Error;
use crate::action::Action;
use crate::card::Character;

#[derive(Debug, Error)]
pub enum CoupError {
    #[error("action {0} is not legal in the current state")]
    IllegalAction(Action),

    #[error("the game is over")]
    GameOver,

    #[error("no game in progress, reset the environment first")]
    NotStarted,

    #[error("unknown action {0:?}")]
    UnknownAction(String),

    #[error("no player with index {0}")]
    UnknownPlayer(usize),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config")]
    ConfigFormat(#[from] serde_json::Error),

    // the variants below are engine defects, the match is corrupted if one surfaces
    #[error("player {player} has no concealed {character} to replace")]
    MissingCharacter { player: usize, character: Character },

    #[error("tried to draw from an empty deck")]
    DeckExhausted,

    #[error("player {player} cannot pay {needed} coins")]
    InsufficientCoins { player: usize, needed: u8 },
}

impl CoupError {
    /// True for programming defects rather than caller mistakes.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            CoupError::MissingCharacter { .. } | CoupError::DeckExhausted | CoupError::InsufficientCoins { .. }
        )
    }
}
