use std::fmt::{Display, Formatter};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use crate::error::CoupError;
use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

// numeric values are part of the observation encoding
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Character {
    Assassin = 0,
    Ambassador = 1,
    Captain = 2,
    Contessa = 3,
    Duke = 4,
}

pub const NUM_CHARACTERS: usize = 5;

pub static CHARACTER_VARIANTS: [Character; NUM_CHARACTERS] = [
    Assassin,
    Ambassador,
    Captain,
    Contessa,
    Duke,
];

pub const COPIES_PER_CHARACTER: usize = 3;
pub const TOTAL_CARDS: usize = NUM_CHARACTERS * COPIES_PER_CHARACTER;

impl Character {
    pub fn name(self) -> &'static str {
        match self {
            Assassin => "Assassin",
            Ambassador => "Ambassador",
            Captain => "Captain",
            Contessa => "Contessa",
            Duke => "Duke",
        }
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An influence card in a player's hand.
///
/// The derived ordering (character first, then concealed before revealed) is the
/// canonical hand order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub character: Character,
    pub face_up: bool,
}

impl Card {
    pub fn concealed(character: Character) -> Self {
        Self { character, face_up: false }
    }

    pub fn is_concealed(&self) -> bool {
        !self.face_up
    }

    // 'losing' an influence means the card is flipped up and no longer counts
    pub fn reveal(&mut self) {
        self.face_up = true;
    }
}

/// The court deck. Cards in the deck are always concealed, so only the character is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Character>,
}

impl Deck {
    pub fn new_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Character> = CHARACTER_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        cards.shuffle(rng);

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn characters(&self) -> &[Character] {
        &self.cards
    }

    /// Draws from the top of the deck.
    pub fn draw(&mut self) -> Result<Card, CoupError> {
        self.cards.pop()
            .map(Card::concealed)
            .ok_or(CoupError::DeckExhausted)
    }

    /// Deals `n` cards off the top.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, CoupError> {
        let at = self.cards.len().checked_sub(n).ok_or(CoupError::DeckExhausted)?;
        Ok(self.cards.split_off(at)
            .into_iter()
            .map(Card::concealed)
            .collect())
    }

    /// Puts a card back and reshuffles the whole deck.
    pub fn return_and_shuffle<R: Rng + ?Sized>(&mut self, card: Card, rng: &mut R) {
        debug_assert!(card.is_concealed(), "revealed cards never go back into the deck");
        self.cards.push(card.character);
        self.cards.shuffle(rng);
    }

    pub(crate) fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub(crate) fn push(&mut self, character: Character) {
        self.cards.push(character);
    }

    // pulls a specific character out of the deck, used to rig hands in tests
    #[cfg(test)]
    pub(crate) fn take(&mut self, character: Character) -> Option<Card> {
        let idx = self.cards.iter().position(|&c| c == character)?;
        Some(Card::concealed(self.cards.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::card::{Card, CHARACTER_VARIANTS, COPIES_PER_CHARACTER, Deck, TOTAL_CARDS};
    use crate::card::Character::{Ambassador, Assassin, Contessa, Duke};
    use crate::error::CoupError;

    #[test]
    fn fresh_deck_has_three_of_each() {
        let mut rng = Pcg64::seed_from_u64(1);
        let deck = Deck::new_shuffled(&mut rng);

        assert_eq!(deck.len(), TOTAL_CARDS);
        for character in CHARACTER_VARIANTS {
            let n = deck.characters().iter().filter(|&&c| c == character).count();
            assert_eq!(n, COPIES_PER_CHARACTER);
        }
    }

    #[test]
    fn draining_the_deck_is_an_error() {
        let mut rng = Pcg64::seed_from_u64(2);
        let mut deck = Deck::new_shuffled(&mut rng);

        for _ in 0..TOTAL_CARDS {
            assert!(deck.draw().unwrap().is_concealed());
        }

        assert!(deck.is_empty());
        assert!(matches!(deck.draw(), Err(CoupError::DeckExhausted)));
    }

    #[test]
    fn dealing_past_the_end_is_an_error() {
        let mut rng = Pcg64::seed_from_u64(4);
        let mut deck = Deck::new_shuffled(&mut rng);

        let hand = deck.deal(2).unwrap();
        assert_eq!(hand.len(), 2);
        assert_eq!(deck.len(), TOTAL_CARDS - 2);

        assert!(matches!(deck.deal(TOTAL_CARDS), Err(CoupError::DeckExhausted)));
        // nothing was dealt
        assert_eq!(deck.len(), TOTAL_CARDS - 2);
    }

    #[test]
    fn return_keeps_the_count() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut deck = Deck::new_shuffled(&mut rng);

        let card = deck.draw().unwrap();
        assert_eq!(deck.len(), TOTAL_CARDS - 1);

        deck.return_and_shuffle(card, &mut rng);
        assert_eq!(deck.len(), TOTAL_CARDS);
    }

    #[test]
    fn hand_order() {
        let mut hand = vec![
            Card { character: Duke, face_up: false },
            Card { character: Ambassador, face_up: true },
            Card { character: Ambassador, face_up: false },
            Card { character: Assassin, face_up: true },
        ];
        hand.sort();

        assert_eq!(hand, vec![
            Card { character: Assassin, face_up: true },
            Card { character: Ambassador, face_up: false },
            Card { character: Ambassador, face_up: true },
            Card { character: Duke, face_up: false },
        ]);

        assert!(Card::concealed(Contessa) < Card::concealed(Duke));
    }
}
