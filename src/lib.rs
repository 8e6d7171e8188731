pub mod action;
pub mod card;
pub mod config;
pub mod env;
pub mod error;
pub mod player;
mod resolve;

pub use action::Action;
pub use card::{Card, Character, Deck};
pub use config::GameConfig;
pub use env::{CoupEnv, Observation, Step};
pub use error::CoupError;
pub use player::Player;

use std::fmt::{Display, Formatter};
use rand::Rng;
use crate::config::NUM_PLAYERS;
use crate::player::{FIRST_PLAYER_STARTING_COINS, STARTING_COINS};

pub const INCOME: u8 = 1;
pub const FOREIGN_AID: u8 = 2;
pub const TAX: u8 = 3;
pub const MAX_STEAL: u8 = 2;
pub const ASSASSINATE_COST: u8 = 3;
pub const COUP_COST: u8 = 7;
// at this many coins a player must coup
pub const FORCED_COUP: u8 = 10;

const HAND_SIZE: usize = 2;
const EXCHANGE_DRAW: usize = 2;

/// An action the turn owner announced, waiting on the opponent's response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    ForeignAid,
    Tax,
    Exchange,
    Steal,
    Assassinate,
    Coup,
}

/// A block claimed by the opponent, waiting on the turn owner's response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Block {
    ForeignAid,
    Assassinate,
    Steal,
}

/// What happens once the pending card loss is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AfterLoss {
    NextTurn,
    // a block was caught bluffing, so the blocked action still goes through
    CollectForeignAid,
    Steal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    TurnStart,
    AwaitingResponse(Announcement),
    AwaitingBlockResponse(Block),
    // the opponent lost an ambassador challenge and still owes a card after the return
    AwaitingExchangeReturn { challenger_pending: bool },
    AwaitingCardLoss { loser: usize, then: AfterLoss },
    GameOver,
}

/// A two player game of Coup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coup {
    turn: usize,
    turn_owner: usize,
    acting_player: usize,
    deck: Deck,
    players: [Player; NUM_PLAYERS],
    phase: Phase,
}

pub fn opponent_of(player_idx: usize) -> usize {
    1 - player_idx
}

impl Coup {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self, CoupError> {
        let mut deck = Deck::new_shuffled(rng);

        let mut seat = |id: usize| -> Result<Player, CoupError> {
            let coins = if id == config.first_player {
                FIRST_PLAYER_STARTING_COINS
            } else {
                STARTING_COINS
            };
            Ok(Player::new(id, deck.deal(HAND_SIZE)?, coins))
        };
        let players = [seat(0)?, seat(1)?];

        Ok(Self {
            turn: 0,
            turn_owner: config.first_player,
            acting_player: config.first_player,
            deck,
            players,
            phase: Phase::TurnStart,
        })
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn turn_owner(&self) -> usize {
        self.turn_owner
    }

    pub fn acting_player(&self) -> usize {
        self.acting_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &[Player; NUM_PLAYERS] {
        &self.players
    }

    pub fn player(&self, player_idx: usize) -> &Player {
        &self.players[player_idx]
    }

    pub fn is_turn_start(&self) -> bool {
        self.phase == Phase::TurnStart
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// True while the player has lost a challenge and has yet to pick the card they give up.
    pub fn pending_card_loss(&self, player_idx: usize) -> bool {
        match self.phase {
            Phase::AwaitingCardLoss { loser, .. } => loser == player_idx,
            Phase::AwaitingExchangeReturn { challenger_pending } => {
                challenger_pending && player_idx == opponent_of(self.turn_owner)
            }
            _ => false,
        }
    }

    pub fn winner(&self) -> Option<usize> {
        if !self.is_game_over() {
            return None;
        }

        self.players
            .iter()
            .position(|player| !player.is_dead())
    }

    /// Every action the acting player may take right now. Empty only once the game is over.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(6);
        let actor = &self.players[self.acting_player];
        let opponent = &self.players[opponent_of(self.acting_player)];

        match self.phase {
            Phase::GameOver => {}
            Phase::AwaitingCardLoss { .. } => {
                self.push_lose_card_options(&mut actions);
            }
            Phase::TurnStart => {
                if actor.coins >= FORCED_COUP {
                    actions.push(Action::Coup);
                } else {
                    actions.push(Action::Income);
                    actions.push(Action::ForeignAid);
                    actions.push(Action::Tax);
                    actions.push(Action::Exchange);

                    if actor.coins >= ASSASSINATE_COST {
                        actions.push(Action::Assassinate);
                    }

                    if actor.coins >= COUP_COST {
                        actions.push(Action::Coup);
                    }

                    if opponent.coins > 0 {
                        actions.push(Action::Steal);
                    }
                }
            }
            Phase::AwaitingResponse(announcement) => {
                match announcement {
                    Announcement::ForeignAid => {
                        actions.push(Action::PassForeignAid);
                        actions.push(Action::BlockForeignAid);
                    }
                    Announcement::Tax => {
                        actions.push(Action::PassTax);
                        actions.push(Action::ChallengeTax);
                    }
                    Announcement::Exchange => {
                        actions.push(Action::PassExchange);
                        actions.push(Action::ChallengeExchange);
                    }
                    Announcement::Steal => {
                        actions.push(Action::PassSteal);
                        actions.push(Action::BlockSteal);
                        actions.push(Action::ChallengeSteal);
                    }
                    Announcement::Assassinate => {
                        // the target may simply concede the card
                        self.push_lose_card_options(&mut actions);
                        actions.push(Action::BlockAssassinate);
                        actions.push(Action::ChallengeAssassinate);
                    }
                    Announcement::Coup => {
                        self.push_lose_card_options(&mut actions);
                    }
                }
            }
            Phase::AwaitingExchangeReturn { .. } => {
                for action in EXCHANGE_RETURNS {
                    if let Some((a, b)) = action.returned_slots() {
                        let concealed = |slot: usize| actor.hand.get(slot).is_some_and(Card::is_concealed);
                        if concealed(a) && concealed(b) {
                            actions.push(action);
                        }
                    }
                }
            }
            Phase::AwaitingBlockResponse(block) => {
                match block {
                    Block::ForeignAid => {
                        actions.push(Action::PassForeignAidBlock);
                        actions.push(Action::ChallengeForeignAidBlock);
                    }
                    Block::Assassinate => {
                        actions.push(Action::PassAssassinateBlock);
                        actions.push(Action::ChallengeAssassinateBlock);
                    }
                    Block::Steal => {
                        actions.push(Action::PassStealBlock);
                        actions.push(Action::ChallengeStealBlock);
                    }
                }
            }
        }

        actions
    }

    fn push_lose_card_options(&self, actions: &mut Vec<Action>) {
        for slot in self.players[self.acting_player].concealed_slots() {
            if slot < HAND_SIZE {
                actions.push(Action::lose_card(slot));
            }
        }
    }

    /// The state dump used by `render`, one line per entry.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Turn {}", self.turn),
            "Player: Card1 | FaceUp | Card2 | FaceUp | Coins | LastAction".to_string(),
        ];

        for (player_idx, player) in self.players.iter().enumerate() {
            let cards: Vec<String> = player.hand
                .iter()
                .map(|card| format!("{} | {}", card.character, card.face_up))
                .collect();
            let last_action = player.last_action.map_or("_", Action::name);
            lines.push(format!("P{}: {} | {} | {}", player_idx + 1, cards.join(" | "), player.coins, last_action));
        }

        lines
    }
}

static EXCHANGE_RETURNS: [Action; 6] = [
    Action::ExchangeReturn12,
    Action::ExchangeReturn13,
    Action::ExchangeReturn14,
    Action::ExchangeReturn23,
    Action::ExchangeReturn24,
    Action::ExchangeReturn34,
];

impl Display for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for line in self.render_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl Coup {
    // swaps both hands for the given characters, keeping every card accounted for
    pub(crate) fn rig(&mut self, hands: [[Character; HAND_SIZE]; NUM_PLAYERS]) {
        for player in self.players.iter_mut() {
            for card in player.hand.drain(..) {
                self.deck.push(card.character);
            }
        }

        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand
                .iter()
                .map(|&character| self.deck.take(character).expect("at most three of a character"))
                .collect();
            player.sort_hand();
        }
    }

    pub(crate) fn census(&self) -> [usize; card::NUM_CHARACTERS] {
        let mut counts = [0; card::NUM_CHARACTERS];
        for &character in self.deck.characters() {
            counts[character as usize] += 1;
        }
        for player in &self.players {
            for card in &player.hand {
                counts[card.character as usize] += 1;
            }
        }
        counts
    }

    pub(crate) fn set_phase(&mut self, phase: Phase, acting_player: usize) {
        self.phase = phase;
        self.acting_player = acting_player;
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player; NUM_PLAYERS] {
        &mut self.players
    }
}
