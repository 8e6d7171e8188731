use serde::{Deserialize, Serialize};
use crate::action::Action;
use crate::card::{Card, Character};
use crate::error::CoupError;

pub const STARTING_COINS: u8 = 2;
pub const FIRST_PLAYER_STARTING_COINS: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    // two cards, four while an exchange is being resolved
    pub hand: Vec<Card>,
    pub coins: u8,
    pub last_action: Option<Action>,
}

impl Player {
    pub fn new(id: usize, hand: Vec<Card>, coins: u8) -> Self {
        let mut player = Self {
            id,
            hand,
            coins,
            last_action: None,
        };
        player.sort_hand();
        player
    }

    pub fn sort_hand(&mut self) {
        self.hand.sort();
    }

    pub fn concealed_slots(&self) -> impl Iterator<Item=usize> + '_ {
        self.hand
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| card.is_concealed().then_some(idx))
    }

    pub fn num_concealed(&self) -> usize {
        self.concealed_slots().count()
    }

    pub fn num_revealed(&self) -> usize {
        self.hand.len() - self.num_concealed()
    }

    pub fn is_dead(&self) -> bool {
        self.num_concealed() == 0
    }

    /// Slot of a concealed card showing `character`, if the player really has one.
    pub fn find_concealed(&self, character: Character) -> Option<usize> {
        self.hand
            .iter()
            .position(|card| card.is_concealed() && card.character == character)
    }

    pub fn has_concealed(&self, character: Character) -> bool {
        self.find_concealed(character).is_some()
    }

    pub fn gain(&mut self, coins: u8) {
        self.coins = self.coins.saturating_add(coins);
    }

    pub fn spend(&mut self, coins: u8) -> Result<(), CoupError> {
        self.coins = self.coins
            .checked_sub(coins)
            .ok_or(CoupError::InsufficientCoins { player: self.id, needed: coins })?;
        Ok(())
    }

    /// Flips every card face up.
    pub fn eliminate(&mut self) {
        for card in self.hand.iter_mut() {
            card.reveal();
        }
        self.sort_hand();
    }
}

#[cfg(test)]
mod tests {
    use crate::card::Card;
    use crate::card::Character::{Captain, Duke};
    use crate::error::CoupError;
    use crate::player::Player;

    #[test]
    fn new_player_hand_is_sorted() {
        let player = Player::new(0, vec![Card::concealed(Duke), Card::concealed(Captain)], 2);
        assert_eq!(player.hand[0].character, Captain);
        assert_eq!(player.hand[1].character, Duke);
        assert_eq!(player.last_action, None);
    }

    #[test]
    fn concealed_lookup() {
        let mut player = Player::new(1, vec![Card::concealed(Duke), Card::concealed(Duke)], 2);
        assert_eq!(player.find_concealed(Duke), Some(0));
        assert!(!player.has_concealed(Captain));

        player.hand[0].reveal();
        assert_eq!(player.find_concealed(Duke), Some(1));
        assert_eq!(player.num_revealed(), 1);
        assert!(!player.is_dead());

        player.eliminate();
        assert!(player.is_dead());
        assert_eq!(player.find_concealed(Duke), None);
    }

    #[test]
    fn cannot_overspend() {
        let mut player = Player::new(0, vec![Card::concealed(Duke), Card::concealed(Captain)], 2);
        assert!(matches!(player.spend(3), Err(CoupError::InsufficientCoins { player: 0, needed: 3 })));
        assert_eq!(player.coins, 2);

        player.spend(2).unwrap();
        assert_eq!(player.coins, 0);
    }
}
