//! Driver-facing adapter around [`Coup`].

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use crate::action::Action;
use crate::card::{Card, Character, NUM_CHARACTERS};
use crate::config::{GameConfig, NUM_PLAYERS};
use crate::error::CoupError;
use crate::{opponent_of, Coup};

/// Index of an unordered pair of characters, 0..15. `r1*5 + r2 - r1*(r1+1)/2` with `r1 <= r2`.
pub fn hand_index(first: Character, second: Character) -> u8 {
    let (r1, r2) = if first <= second {
        (first as u8, second as u8)
    } else {
        (second as u8, first as u8)
    };
    r1 * NUM_CHARACTERS as u8 + r2 - r1 * (r1 + 1) / 2
}

/// Which of two cards are face up, 0..4.
pub fn visibility_index(first: &Card, second: &Card) -> u8 {
    first.face_up as u8 * 2 + second.face_up as u8
}

/// The game as seen by one player. `own_*` fields describe that player, `opponent_*` the other.
///
/// A player who has not acted yet reports `PassForeignAid` as their last action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub own_cards: u8,
    pub opponent_cards: u8,
    pub own_visibility: u8,
    pub opponent_visibility: u8,
    pub own_coins: u8,
    pub opponent_coins: u8,
    pub own_last_action: u8,
    pub opponent_last_action: u8,
    /// Absolute index of the player who acts next.
    pub acting_player: u8,
}

impl Observation {
    pub fn new(game: &Coup, perspective: usize) -> Result<Self, CoupError> {
        if perspective >= NUM_PLAYERS {
            return Err(CoupError::UnknownPlayer(perspective));
        }

        let own = game.player(perspective);
        let opponent = game.player(opponent_of(perspective));

        let cards = |hand: &[Card]| hand_index(hand[0].character, hand[1].character);
        let visibility = |hand: &[Card]| visibility_index(&hand[0], &hand[1]);
        let last_action = |action: Option<Action>| action.unwrap_or(Action::PassForeignAid).index();

        Ok(Self {
            own_cards: cards(&own.hand),
            opponent_cards: cards(&opponent.hand),
            own_visibility: visibility(&own.hand),
            opponent_visibility: visibility(&opponent.hand),
            own_coins: own.coins,
            opponent_coins: opponent.coins,
            own_last_action: last_action(own.last_action),
            opponent_last_action: last_action(opponent.last_action),
            acting_player: game.acting_player() as u8,
        })
    }

    pub fn to_array(&self) -> [u8; 9] {
        [
            self.own_cards,
            self.opponent_cards,
            self.own_visibility,
            self.opponent_visibility,
            self.own_coins,
            self.opponent_coins,
            self.own_last_action,
            self.opponent_last_action,
            self.acting_player,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: i32,
    pub game_over: bool,
    pub info: Map<String, Value>,
}

pub struct CoupEnv {
    config: GameConfig,
    rng: Pcg64,
    game: Option<Coup>,
    // rewards not yet handed to their player
    rewards: [i32; NUM_PLAYERS],
}

impl CoupEnv {
    pub fn new(config: GameConfig) -> Result<Self, CoupError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            game: None,
            rewards: [0; NUM_PLAYERS],
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game(&self) -> Option<&Coup> {
        self.game.as_ref()
    }

    /// Starts a new match with a fresh shuffle and deal. Seeded environments stay deterministic
    /// across resets.
    pub fn reset(&mut self) -> Result<(), CoupError> {
        self.game = Some(Coup::new(&self.config, &mut self.rng)?);
        self.rewards = [0; NUM_PLAYERS];
        Ok(())
    }

    pub fn step(&mut self, action: Action) -> Result<Step, CoupError> {
        let game = self.game.as_ref().ok_or(CoupError::NotStarted)?;
        let actor = game.acting_player();

        let revealed_before: Vec<usize> = game.players().iter().map(|p| p.num_revealed()).collect();
        let next = game.apply_action(action, &mut self.rng)?;
        let observation = Observation::new(&next, actor)?;

        for (player_idx, player) in next.players().iter().enumerate() {
            let lost = player.num_revealed() as i32 - revealed_before[player_idx] as i32;
            if lost != 0 {
                self.rewards[player_idx] -= lost;
                self.rewards[opponent_of(player_idx)] += lost;
            }
        }

        // the opponent's share waits until their own step
        let reward = std::mem::take(&mut self.rewards[actor]);
        let game_over = next.is_game_over();
        debug!(?observation, reward, "step");

        self.game = Some(next);

        Ok(Step {
            observation,
            reward,
            game_over,
            info: Map::new(),
        })
    }

    pub fn step_index(&mut self, idx: u8) -> Result<Step, CoupError> {
        let action = Action::from_index(idx).ok_or_else(|| CoupError::UnknownAction(idx.to_string()))?;
        self.step(action)
    }

    pub fn step_name(&mut self, name: &str) -> Result<Step, CoupError> {
        self.step(name.parse()?)
    }

    pub fn legal_actions(&self) -> Result<Vec<Action>, CoupError> {
        let game = self.game.as_ref().ok_or(CoupError::NotStarted)?;
        let actions = game.actions();
        debug!(?actions, "legal actions");
        Ok(actions)
    }

    pub fn legal_action_names(&self) -> Result<Vec<&'static str>, CoupError> {
        Ok(self.legal_actions()?.into_iter().map(Action::name).collect())
    }

    pub fn observation(&self, perspective: usize) -> Result<Observation, CoupError> {
        let game = self.game.as_ref().ok_or(CoupError::NotStarted)?;
        Observation::new(game, perspective)
    }

    pub fn render(&self) {
        if let Some(game) = &self.game {
            for line in game.render_lines() {
                info!("{line}");
            }
        }
    }
}
