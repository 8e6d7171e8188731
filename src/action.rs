use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::CoupError;

/// Every move a player can make, announced or in response.
///
/// The discriminants are a stable external contract: agents store values keyed by them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Income = 0,
    ForeignAid = 1,
    Coup = 2,
    Tax = 3,
    Assassinate = 4,
    Exchange = 5,
    Steal = 6,
    LoseCard1 = 7,
    LoseCard2 = 8,
    PassForeignAid = 9,
    PassForeignAidBlock = 10,
    PassTax = 11,
    PassExchange = 12,
    PassAssassinateBlock = 13,
    PassSteal = 14,
    PassStealBlock = 15,
    BlockForeignAid = 16,
    BlockAssassinate = 17,
    BlockSteal = 18,
    ChallengeForeignAidBlock = 19,
    ChallengeTax = 20,
    ChallengeExchange = 21,
    ChallengeAssassinate = 22,
    ChallengeAssassinateBlock = 23,
    ChallengeSteal = 24,
    ChallengeStealBlock = 25,
    ExchangeReturn12 = 26,
    ExchangeReturn13 = 27,
    ExchangeReturn14 = 28,
    ExchangeReturn23 = 29,
    ExchangeReturn24 = 30,
    ExchangeReturn34 = 31,
}

pub const NUM_ACTIONS: usize = 32;

pub static ACTION_VARIANTS: [Action; NUM_ACTIONS] = [
    Action::Income,
    Action::ForeignAid,
    Action::Coup,
    Action::Tax,
    Action::Assassinate,
    Action::Exchange,
    Action::Steal,
    Action::LoseCard1,
    Action::LoseCard2,
    Action::PassForeignAid,
    Action::PassForeignAidBlock,
    Action::PassTax,
    Action::PassExchange,
    Action::PassAssassinateBlock,
    Action::PassSteal,
    Action::PassStealBlock,
    Action::BlockForeignAid,
    Action::BlockAssassinate,
    Action::BlockSteal,
    Action::ChallengeForeignAidBlock,
    Action::ChallengeTax,
    Action::ChallengeExchange,
    Action::ChallengeAssassinate,
    Action::ChallengeAssassinateBlock,
    Action::ChallengeSteal,
    Action::ChallengeStealBlock,
    Action::ExchangeReturn12,
    Action::ExchangeReturn13,
    Action::ExchangeReturn14,
    Action::ExchangeReturn23,
    Action::ExchangeReturn24,
    Action::ExchangeReturn34,
];

impl Action {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(idx: u8) -> Option<Action> {
        ACTION_VARIANTS.get(idx as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Income => "income",
            Action::ForeignAid => "foreign_aid",
            Action::Coup => "coup",
            Action::Tax => "tax",
            Action::Assassinate => "assassinate",
            Action::Exchange => "exchange",
            Action::Steal => "steal",
            Action::LoseCard1 => "lose_card_1",
            Action::LoseCard2 => "lose_card_2",
            Action::PassForeignAid => "pass_fa",
            Action::PassForeignAidBlock => "pass_fa_block",
            Action::PassTax => "pass_tax",
            Action::PassExchange => "pass_exchange",
            Action::PassAssassinateBlock => "pass_assassinate_block",
            Action::PassSteal => "pass_steal",
            Action::PassStealBlock => "pass_steal_block",
            Action::BlockForeignAid => "block_fa",
            Action::BlockAssassinate => "block_assassinate",
            Action::BlockSteal => "block_steal",
            Action::ChallengeForeignAidBlock => "challenge_fa_block",
            Action::ChallengeTax => "challenge_tax",
            Action::ChallengeExchange => "challenge_exchange",
            Action::ChallengeAssassinate => "challenge_assassinate",
            Action::ChallengeAssassinateBlock => "challenge_assassinate_block",
            Action::ChallengeSteal => "challenge_steal",
            Action::ChallengeStealBlock => "challenge_steal_block",
            Action::ExchangeReturn12 => "exchange_return_12",
            Action::ExchangeReturn13 => "exchange_return_13",
            Action::ExchangeReturn14 => "exchange_return_14",
            Action::ExchangeReturn23 => "exchange_return_23",
            Action::ExchangeReturn24 => "exchange_return_24",
            Action::ExchangeReturn34 => "exchange_return_34",
        }
    }

    /// Hand slots sent back to the deck by an exchange return, or `None` for any other action.
    pub fn returned_slots(self) -> Option<(usize, usize)> {
        match self {
            Action::ExchangeReturn12 => Some((0, 1)),
            Action::ExchangeReturn13 => Some((0, 2)),
            Action::ExchangeReturn14 => Some((0, 3)),
            Action::ExchangeReturn23 => Some((1, 2)),
            Action::ExchangeReturn24 => Some((1, 3)),
            Action::ExchangeReturn34 => Some((2, 3)),
            _ => None,
        }
    }

    /// Hand slot flipped by a lose-card action.
    pub fn lost_slot(self) -> Option<usize> {
        match self {
            Action::LoseCard1 => Some(0),
            Action::LoseCard2 => Some(1),
            _ => None,
        }
    }

    pub(crate) fn lose_card(slot: usize) -> Action {
        if slot == 0 { Action::LoseCard1 } else { Action::LoseCard2 }
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}({})", self.name(), self.index()))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_VARIANTS.iter()
            .find(|action| action.name() == s)
            .copied()
            .ok_or_else(|| CoupError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, ACTION_VARIANTS, NUM_ACTIONS};

    #[test]
    fn indexes_are_stable() {
        for (idx, action) in ACTION_VARIANTS.iter().enumerate() {
            assert_eq!(action.index() as usize, idx);
            assert_eq!(Action::from_index(idx as u8), Some(*action));
        }
        assert_eq!(Action::from_index(NUM_ACTIONS as u8), None);

        assert_eq!(Action::Income.index(), 0);
        assert_eq!(Action::PassForeignAid.index(), 9);
        assert_eq!(Action::ChallengeStealBlock.index(), 25);
        assert_eq!(Action::ExchangeReturn34.index(), 31);
    }

    #[test]
    fn names_parse_back() {
        for action in ACTION_VARIANTS {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert!("pass_everything".parse::<Action>().is_err());
    }

    #[test]
    fn slots() {
        assert_eq!(Action::ExchangeReturn14.returned_slots(), Some((0, 3)));
        assert_eq!(Action::Tax.returned_slots(), None);
        assert_eq!(Action::LoseCard2.lost_slot(), Some(1));
        assert_eq!(Action::lose_card(0), Action::LoseCard1);
    }
}
