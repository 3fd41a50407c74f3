//! One deal: card play over eight tricks.
//!
//! A [`Round`] owns the four hands and the trick in progress. It checks every
//! card against the follow-suit and trump rules, resolves tricks, and keeps the
//! running points of both teams including the last-trick and belote bonuses.
//! Settling the contract against those points is left to [`Game`](crate::game::Game).

use crate::action::{ActionError, InternalError};
use crate::cards::{Card, Suit};
use crate::hand::Hand;
use crate::player::{Player, Seats, Teams};
use crate::snapshot::RoundSnapshot;
use crate::trick::{TrickCards, TrickStatus};
use serde::{Deserialize, Serialize};

pub const TRICKS_PER_ROUND: u8 = 8;
/// Awarded to the winner of the last trick.
pub const LAST_TRICK_BONUS: u16 = 10;
/// Awarded when one player played both the trump Queen and King.
pub const BELOTE_BONUS: u16 = 20;

/// A resolved trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    /// Zero-based position within the round.
    pub index: u8,
    pub opener: Player,
    pub cards: Seats<Card>,
    pub winner: Player,
    /// Points credited to the winner's team: card points, plus the last-trick
    /// bonus on the final trick. The belote bonus is not included.
    pub points: u16,
}

impl CompletedTrick {
    pub fn is_last(&self) -> bool {
        self.index + 1 == TRICKS_PER_ROUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Continue,
    TrickComplete(CompletedTrick),
    RoundComplete(CompletedTrick),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    hands: Seats<Hand>,
    trick: TrickCards,
    trick_index: u8,
    trick_opener: Player,
    points: Teams<u16>,
    // players who played a trump Queen or King, in play order
    belote: Vec<Player>,
    trump: Option<Suit>,
    tricks: Vec<CompletedTrick>,
}

impl Round {
    pub fn new(hands: Seats<Vec<Card>>, opener: Player) -> Self {
        Self {
            hands: hands.map(|cards| Hand::new(cards.clone())),
            trick: TrickCards::new(),
            trick_index: 0,
            trick_opener: opener,
            points: Teams::default(),
            belote: Vec::new(),
            trump: None,
            tricks: Vec::with_capacity(usize::from(TRICKS_PER_ROUND)),
        }
    }

    /// Start a fresh deal with `opener` leading the first trick.
    pub fn reset(&mut self, hands: Seats<Vec<Card>>, opener: Player) {
        *self = Self::new(hands, opener);
    }

    pub fn set_trump(&mut self, trump: Suit) {
        self.trump = Some(trump);
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player]
    }

    pub fn hands(&self) -> &Seats<Hand> {
        &self.hands
    }

    pub fn trick(&self) -> &TrickCards {
        &self.trick
    }

    pub fn trick_index(&self) -> u8 {
        self.trick_index
    }

    pub fn trick_opener(&self) -> Player {
        self.trick_opener
    }

    pub fn points(&self) -> &Teams<u16> {
        &self.points
    }

    pub fn belote(&self) -> &[Player] {
        &self.belote
    }

    /// Tricks completed so far in this deal, oldest first.
    pub fn tricks(&self) -> &[CompletedTrick] {
        &self.tricks
    }

    pub fn last_trick(&self) -> Option<&CompletedTrick> {
        self.tricks.last()
    }

    /// Cards still held across all four hands.
    pub fn cards_in_hands(&self) -> usize {
        self.hands.values().map(Hand::len).sum()
    }

    /// The player whose card is expected next.
    pub fn to_play(&self) -> Player {
        self.trick_opener.offset(self.trick.len())
    }

    /// The player credited with belote: only when the same player played both
    /// the trump Queen and King.
    pub fn belote_holder(&self) -> Option<Player> {
        match self.belote.as_slice() {
            [first, second] if first == second => Some(*first),
            _ => None,
        }
    }

    /// Whether `player` may put `card` on the current trick.
    ///
    /// The opener plays freely. Later players must follow the led suit; a
    /// player void in it must trump unless their partner already holds the
    /// trick. Whenever a trump is required it has to beat the highest trump on
    /// the table, if the player holds one able to.
    pub fn check_card(&self, player: Player, card: Card) -> Result<(), ActionError> {
        let trump = self.trump.ok_or(InternalError::TrumpNotSet)?;
        let Some(led) = self.trick.led_suit() else {
            return Ok(());
        };
        let hand = &self.hands[player];

        if led == trump {
            if !hand.has_suit(trump) {
                return Ok(());
            }
            if !card.is_trump(trump) {
                return Err(ActionError::MustFollowSuit { led, card });
            }
            return self.check_overtrump(hand, card, trump);
        }

        if hand.has_suit(led) {
            if card.suit() != led {
                return Err(ActionError::MustFollowSuit { led, card });
            }
            return Ok(());
        }
        if self.trick.leader().is_some_and(|leader| leader.team() == player.team()) {
            return Ok(());
        }
        if hand.has_suit(trump) {
            if !card.is_trump(trump) {
                return Err(ActionError::MustPlayTrump { trump, card });
            }
            return self.check_overtrump(hand, card, trump);
        }
        Ok(())
    }

    fn check_overtrump(&self, hand: &Hand, card: Card, trump: Suit) -> Result<(), ActionError> {
        let Some(leading) = self.trick.highest_trump(trump) else {
            return Ok(());
        };
        let can_beat =
            hand.best_trump(trump).is_some_and(|best| best.strength(trump) > leading.strength(trump));
        if can_beat && card.strength(trump) < leading.strength(trump) {
            return Err(ActionError::MustOvertrump { leading, card });
        }
        Ok(())
    }

    /// One flag per card of `player`'s hand, in hand order.
    #[doc(alias = "get_legal_cards")]
    pub fn legal_cards(&self, player: Player) -> Vec<bool> {
        self.hands[player].as_slice().iter().map(|&c| self.check_card(player, c).is_ok()).collect()
    }

    /// Check a play without applying it and return the card it would put down.
    pub fn validate_play(&self, player: Player, index: usize) -> Result<Card, ActionError> {
        let expected = self.to_play();
        if player != expected {
            return Err(ActionError::OutOfTurn { expected, got: player });
        }
        let hand = &self.hands[player];
        hand.check_index(index)?;
        let card = hand.get(index).ok_or(InternalError::HandOutOfSync { player, index })?;
        self.check_card(player, card)?;
        Ok(card)
    }

    pub fn play(&mut self, player: Player, index: usize) -> Result<RoundStatus, ActionError> {
        let card = self.validate_play(player, index)?;
        let trump = self.trump.ok_or(InternalError::TrumpNotSet)?;
        if self.trick_index >= TRICKS_PER_ROUND {
            return Err(InternalError::TrickOverflow(self.trick_index).into());
        }
        let led = self.trick.led_suit().unwrap_or(card.suit());

        self.hands[player].play(index)?;
        if card.is_belote(trump) {
            self.belote.push(player);
        }
        match self.trick.place(player, card, trump, led) {
            TrickStatus::Continue => Ok(RoundStatus::Continue),
            TrickStatus::Complete => self.close_trick(trump),
        }
    }

    fn close_trick(&mut self, trump: Suit) -> Result<RoundStatus, ActionError> {
        let winner = self.trick.leader().ok_or(InternalError::NoTrickLeader)?;
        let cards = self.trick.complete_cards().ok_or(InternalError::IncompleteTrick)?;
        let mut done = CompletedTrick {
            index: self.trick_index,
            opener: self.trick_opener,
            cards,
            winner,
            points: self.trick.points(trump),
        };
        if done.is_last() {
            done.points += LAST_TRICK_BONUS;
        }
        self.points[winner.team()] += done.points;
        if done.is_last() {
            if let Some(holder) = self.belote_holder() {
                self.points[holder.team()] += BELOTE_BONUS;
            }
        }

        self.tricks.push(done);
        self.trick.reset();
        self.trick_opener = winner;
        if done.is_last() {
            Ok(RoundStatus::RoundComplete(done))
        } else {
            self.trick_index += 1;
            Ok(RoundStatus::TrickComplete(done))
        }
    }

    pub fn describe(&self) -> RoundSnapshot {
        let to_play = self.to_play();
        let legal = if self.trump.is_some() { self.legal_cards(to_play) } else { Vec::new() };
        RoundSnapshot {
            hands: self.hands.map(|h| h.as_slice().to_vec()),
            legal,
            to_play,
            trick: self.trick.describe(),
            trick_index: self.trick_index,
            trick_opener: self.trick_opener,
            trump: self.trump,
            points: self.points,
            belote: self.belote.clone(),
            tricks: self.tricks.clone(),
        }
    }
}
