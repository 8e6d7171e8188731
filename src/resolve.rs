use rand::Rng;
use tracing::{debug, info};
use crate::action::Action;
use crate::card::Character;
use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
use crate::error::CoupError;
use crate::{opponent_of, AfterLoss, Announcement, Block, Coup, Phase};
use crate::{ASSASSINATE_COST, COUP_COST, EXCHANGE_DRAW, FOREIGN_AID, INCOME, MAX_STEAL, TAX};

impl Coup {
    /// Applies one legal action and returns the resulting game. `self` is never modified, so a
    /// rejected action or an engine defect leaves the caller's game as it was.
    pub fn apply_action<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> Result<Coup, CoupError> {
        if self.is_game_over() {
            return Err(CoupError::GameOver);
        }

        if !self.actions().contains(&action) {
            return Err(CoupError::IllegalAction(action));
        }

        debug!(turn = self.turn, player = self.acting_player, %action, "applying action");

        let mut game = self.clone();
        let actor = game.acting_player;
        game.players[actor].last_action = Some(action);

        match action {
            Action::Income => {
                game.players[actor].gain(INCOME);
                game.go_next_turn();
            }
            Action::ForeignAid => game.announce(Announcement::ForeignAid),
            Action::Tax => game.announce(Announcement::Tax),
            Action::Exchange => game.announce(Announcement::Exchange),
            Action::Steal => game.announce(Announcement::Steal),
            Action::Assassinate => {
                // paid up front, whatever the outcome
                game.players[actor].spend(ASSASSINATE_COST)?;
                game.announce(Announcement::Assassinate);
            }
            Action::Coup => {
                game.players[actor].spend(COUP_COST)?;
                game.announce(Announcement::Coup);
            }
            Action::LoseCard1 | Action::LoseCard2 => {
                let then = match game.phase {
                    Phase::AwaitingCardLoss { then, .. } => then,
                    _ => AfterLoss::NextTurn,
                };
                if let Some(slot) = action.lost_slot() {
                    game.lose_card(slot, then)?;
                }
            }

            Action::PassForeignAid => {
                game.collect_foreign_aid();
                game.go_next_turn();
            }
            Action::PassTax => {
                game.collect_tax();
                game.go_next_turn();
            }
            Action::PassExchange => {
                game.draw_exchange_cards()?;
                game.await_exchange_return(false);
            }
            Action::PassSteal => {
                game.steal()?;
                game.go_next_turn();
            }

            // the block stands
            Action::PassForeignAidBlock | Action::PassAssassinateBlock | Action::PassStealBlock => {
                game.go_next_turn();
            }

            Action::BlockForeignAid => game.block(Block::ForeignAid),
            Action::BlockAssassinate => game.block(Block::Assassinate),
            Action::BlockSteal => game.block(Block::Steal),

            Action::ChallengeTax => game.challenge_tax(rng)?,
            Action::ChallengeExchange => game.challenge_exchange(rng)?,
            Action::ChallengeSteal => game.challenge_steal(rng)?,
            Action::ChallengeAssassinate => game.challenge_assassinate(rng)?,
            Action::ChallengeForeignAidBlock => game.challenge_foreign_aid_block(rng)?,
            Action::ChallengeStealBlock => game.challenge_steal_block(rng)?,
            Action::ChallengeAssassinateBlock => game.challenge_assassinate_block(rng)?,

            Action::ExchangeReturn12
            | Action::ExchangeReturn13
            | Action::ExchangeReturn14
            | Action::ExchangeReturn23
            | Action::ExchangeReturn24
            | Action::ExchangeReturn34 => {
                if let Some(slots) = action.returned_slots() {
                    game.exchange_return(slots, rng);
                }
            }
        }

        Ok(game)
    }

    /// Shuffles a card that was proven in a challenge back into the deck and deals its holder a
    /// fresh one in its place.
    pub fn replace_verified_card<R: Rng + ?Sized>(&mut self, player_idx: usize, character: Character, rng: &mut R) -> Result<(), CoupError> {
        let slot = self.players[player_idx]
            .find_concealed(character)
            .ok_or(CoupError::MissingCharacter { player: player_idx, character })?;

        let card = self.players[player_idx].hand[slot];
        self.deck.return_and_shuffle(card, rng);
        self.players[player_idx].hand[slot] = self.deck.draw()?;
        self.players[player_idx].sort_hand();

        Ok(())
    }

    fn responder(&self) -> usize {
        opponent_of(self.turn_owner)
    }

    fn go_next_turn(&mut self) {
        self.turn_owner = opponent_of(self.turn_owner);
        self.acting_player = self.turn_owner;
        self.turn += 1;
        self.phase = Phase::TurnStart;
    }

    fn announce(&mut self, announcement: Announcement) {
        self.phase = Phase::AwaitingResponse(announcement);
        self.acting_player = self.responder();
    }

    fn block(&mut self, block: Block) {
        self.phase = Phase::AwaitingBlockResponse(block);
        self.acting_player = self.turn_owner;
    }

    fn await_card_loss(&mut self, loser: usize, then: AfterLoss) {
        self.phase = Phase::AwaitingCardLoss { loser, then };
        self.acting_player = loser;
    }

    fn await_exchange_return(&mut self, challenger_pending: bool) {
        self.phase = Phase::AwaitingExchangeReturn { challenger_pending };
        self.acting_player = self.turn_owner;
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        info!(turn = self.turn, winner = ?self.winner(), "game over");
    }

    fn eliminate(&mut self, player_idx: usize) {
        self.players[player_idx].eliminate();
        self.end_game();
    }

    fn collect_foreign_aid(&mut self) {
        self.players[self.turn_owner].gain(FOREIGN_AID);
    }

    fn collect_tax(&mut self) {
        self.players[self.turn_owner].gain(TAX);
    }

    fn steal(&mut self) -> Result<(), CoupError> {
        let victim = self.responder();
        let amount = self.players[victim].coins.min(MAX_STEAL);
        self.players[victim].spend(amount)?;
        self.players[self.turn_owner].gain(amount);
        Ok(())
    }

    // drawn cards go to slots 3 and 4, the kept hand stays in order in front
    fn draw_exchange_cards(&mut self) -> Result<(), CoupError> {
        for _ in 0..EXCHANGE_DRAW {
            let card = self.deck.draw()?;
            self.players[self.turn_owner].hand.push(card);
        }
        Ok(())
    }

    fn exchange_return<R: Rng + ?Sized>(&mut self, (first, second): (usize, usize), rng: &mut R) {
        let challenger_pending = matches!(self.phase, Phase::AwaitingExchangeReturn { challenger_pending: true });
        let player = &mut self.players[self.turn_owner];

        // higher slot first so the lower index is still valid
        for slot in [second, first] {
            let card = player.hand.remove(slot);
            self.deck.push(card.character);
        }
        self.deck.shuffle(rng);
        player.sort_hand();

        if challenger_pending {
            self.await_card_loss(self.responder(), AfterLoss::NextTurn);
        } else {
            self.go_next_turn();
        }
    }

    fn lose_card(&mut self, slot: usize, then: AfterLoss) -> Result<(), CoupError> {
        let loser = self.acting_player;
        self.players[loser].hand[slot].reveal();
        self.players[loser].sort_hand();

        match then {
            AfterLoss::NextTurn => {}
            AfterLoss::CollectForeignAid => self.collect_foreign_aid(),
            AfterLoss::Steal => self.steal()?,
        }

        if self.players[loser].is_dead() {
            self.end_game();
        } else {
            self.go_next_turn();
        }

        Ok(())
    }

    /// Checks the accused's hand for any of the claimed characters. A proven card is replaced and
    /// `true` returned, the challenger lost.
    fn challenge_claim<R: Rng + ?Sized>(&mut self, accused: usize, claimed: &[Character], rng: &mut R) -> Result<bool, CoupError> {
        let proven = claimed
            .iter()
            .copied()
            .find(|&character| self.players[accused].has_concealed(character));

        match proven {
            Some(character) => {
                debug!(player = accused, %character, "challenge failed, claim was true");
                self.replace_verified_card(accused, character, rng)?;
                Ok(true)
            }
            None => {
                debug!(player = accused, "challenge succeeded, claim was a bluff");
                Ok(false)
            }
        }
    }

    fn challenge_tax<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (claimant, challenger) = (self.turn_owner, self.responder());

        if self.challenge_claim(claimant, &[Duke], rng)? {
            self.collect_tax();
            self.await_card_loss(challenger, AfterLoss::NextTurn);
        } else {
            self.await_card_loss(claimant, AfterLoss::NextTurn);
        }
        Ok(())
    }

    fn challenge_exchange<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let claimant = self.turn_owner;

        if self.challenge_claim(claimant, &[Ambassador], rng)? {
            // the exchange goes ahead, the challenger gives up a card after the return
            self.draw_exchange_cards()?;
            self.await_exchange_return(true);
        } else {
            self.await_card_loss(claimant, AfterLoss::NextTurn);
        }
        Ok(())
    }

    fn challenge_steal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (claimant, challenger) = (self.turn_owner, self.responder());

        if self.challenge_claim(claimant, &[Captain], rng)? {
            self.steal()?;
            self.await_card_loss(challenger, AfterLoss::NextTurn);
        } else {
            self.await_card_loss(claimant, AfterLoss::NextTurn);
        }
        Ok(())
    }

    fn challenge_assassinate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (claimant, challenger) = (self.turn_owner, self.responder());

        if self.challenge_claim(claimant, &[Assassin], rng)? {
            // one card for the assassination and one for the challenge
            self.eliminate(challenger);
        } else {
            self.await_card_loss(claimant, AfterLoss::NextTurn);
        }
        Ok(())
    }

    fn challenge_foreign_aid_block<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (challenger, blocker) = (self.turn_owner, self.responder());

        if self.challenge_claim(blocker, &[Duke], rng)? {
            self.await_card_loss(challenger, AfterLoss::NextTurn);
        } else {
            self.await_card_loss(blocker, AfterLoss::CollectForeignAid);
        }
        Ok(())
    }

    fn challenge_steal_block<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (challenger, blocker) = (self.turn_owner, self.responder());

        if self.challenge_claim(blocker, &[Captain, Ambassador], rng)? {
            self.await_card_loss(challenger, AfterLoss::NextTurn);
        } else {
            self.await_card_loss(blocker, AfterLoss::Steal);
        }
        Ok(())
    }

    fn challenge_assassinate_block<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CoupError> {
        let (challenger, blocker) = (self.turn_owner, self.responder());

        if self.challenge_claim(blocker, &[Contessa], rng)? {
            self.await_card_loss(challenger, AfterLoss::NextTurn);
        } else {
            self.eliminate(blocker);
        }
        Ok(())
    }
}
