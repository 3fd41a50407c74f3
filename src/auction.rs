//! Bidding phase.
//!
//! Players speak in turn from the first player. A bid names a trump suit and
//! a point target; a pass counts toward closing the auction. Three passes
//! after the best bid close it on that contract, four passes without any bid
//! close it empty and the cards are dealt again.

use crate::action::ActionError;
use crate::cards::Suit;
use crate::player::{Player, Seats, Team};
use crate::snapshot::AuctionSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted opening bid.
pub const MIN_BID: u16 = 80;
/// Bids are multiples of this step.
pub const BID_STEP: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub suit: Suit,
    pub value: u16,
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.suit.symbol())
    }
}

/// The winning bid and who made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub player: Player,
    pub bid: Bid,
}

impl Contract {
    pub const fn team(&self) -> Team {
        self.player.team()
    }

    pub const fn trump(&self) -> Suit {
        self.bid.suit
    }

    pub const fn value(&self) -> u16 {
        self.bid.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    Continue,
    Won(Contract),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    bids: Seats<Option<Bid>>,
    current_best: Option<Player>,
    // -1 before anyone spoke; reset to 0 by each bid
    passed_in_row: i8,
    turn: Player,
}

impl Auction {
    pub fn new(first_player: Player) -> Self {
        Self { bids: Seats::default(), current_best: None, passed_in_row: -1, turn: first_player }
    }

    pub fn reset(&mut self, first_player: Player) {
        *self = Self::new(first_player);
    }

    pub fn bids(&self) -> &Seats<Option<Bid>> {
        &self.bids
    }

    pub fn current_best(&self) -> Option<Player> {
        self.current_best
    }

    pub fn best_bid(&self) -> Option<Bid> {
        self.current_best.and_then(|p| self.bids[p])
    }

    pub fn contract(&self) -> Option<Contract> {
        let player = self.current_best?;
        self.bids[player].map(|bid| Contract { player, bid })
    }

    pub fn passed_in_row(&self) -> i8 {
        self.passed_in_row
    }

    /// The player expected to speak next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Smallest value a bid may carry right now.
    pub fn min_next_bid(&self) -> u16 {
        match self.best_bid() {
            Some(best) => best.value + BID_STEP,
            None => MIN_BID,
        }
    }

    fn check_turn(&self, player: Player) -> Result<(), ActionError> {
        if player != self.turn {
            return Err(ActionError::OutOfTurn { expected: self.turn, got: player });
        }
        Ok(())
    }

    pub fn validate_bid(&self, player: Player, bid: Bid) -> Result<(), ActionError> {
        self.check_turn(player)?;
        if bid.value == 0 || bid.value % BID_STEP != 0 {
            return Err(ActionError::BidNotMultiple { step: BID_STEP, got: bid.value });
        }
        let min = self.min_next_bid();
        if bid.value < min {
            return Err(ActionError::BidTooLow { min, got: bid.value });
        }
        Ok(())
    }

    pub fn validate_pass(&self, player: Player) -> Result<(), ActionError> {
        self.check_turn(player)
    }

    pub fn bid(&mut self, player: Player, bid: Bid) -> Result<AuctionStatus, ActionError> {
        self.validate_bid(player, bid)?;
        self.bids[player] = Some(bid);
        self.current_best = Some(player);
        self.passed_in_row = 0;
        self.turn = player.next();
        Ok(AuctionStatus::Continue)
    }

    pub fn pass(&mut self, player: Player) -> Result<AuctionStatus, ActionError> {
        self.validate_pass(player)?;
        if self.passed_in_row == 2 {
            return Ok(match self.contract() {
                Some(contract) => AuctionStatus::Won(contract),
                None => AuctionStatus::Failed,
            });
        }
        self.passed_in_row += 1;
        self.turn = player.next();
        Ok(AuctionStatus::Continue)
    }

    pub fn describe(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            bids: self.bids,
            current_best: self.current_best,
            passed_in_row: self.passed_in_row,
            turn: self.turn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(value: u16) -> Bid {
        Bid { suit: Suit::Spades, value }
    }

    #[test]
    fn first_pass_counts_as_zero() {
        let mut a = Auction::new(Player::West);
        assert_eq!(a.pass(Player::West).unwrap(), AuctionStatus::Continue);
        assert_eq!(a.passed_in_row(), 0);
        assert_eq!(a.turn(), Player::South);
    }

    #[test]
    fn four_passes_without_bid_fail() {
        let mut a = Auction::new(Player::South);
        let mut p = Player::South;
        for _ in 0..3 {
            assert_eq!(a.pass(p).unwrap(), AuctionStatus::Continue);
            p = p.next();
        }
        assert_eq!(a.pass(p).unwrap(), AuctionStatus::Failed);
    }

    #[test]
    fn three_passes_after_bid_win() {
        let mut a = Auction::new(Player::West);
        a.bid(Player::West, bid(80)).unwrap();
        assert_eq!(a.passed_in_row(), 0);
        a.pass(Player::South).unwrap();
        a.pass(Player::East).unwrap();
        assert_eq!(a.passed_in_row(), 2);
        let status = a.pass(Player::North).unwrap();
        assert_eq!(status, AuctionStatus::Won(Contract { player: Player::West, bid: bid(80) }));
    }

    #[test]
    fn late_bid_reopens_the_auction() {
        let mut a = Auction::new(Player::West);
        a.pass(Player::West).unwrap();
        a.pass(Player::South).unwrap();
        a.pass(Player::East).unwrap();
        a.bid(Player::North, bid(90)).unwrap();
        a.pass(Player::West).unwrap();
        a.pass(Player::South).unwrap();
        assert!(matches!(a.pass(Player::East).unwrap(), AuctionStatus::Won(c) if c.player == Player::North));
    }

    #[test]
    fn bids_must_climb_in_steps_of_ten() {
        let mut a = Auction::new(Player::West);
        assert_eq!(
            a.bid(Player::West, bid(85)).unwrap_err(),
            ActionError::BidNotMultiple { step: 10, got: 85 }
        );
        assert_eq!(a.bid(Player::West, bid(70)).unwrap_err(), ActionError::BidTooLow { min: 80, got: 70 });
        a.bid(Player::West, bid(80)).unwrap();
        assert_eq!(a.bid(Player::South, bid(80)).unwrap_err(), ActionError::BidTooLow { min: 90, got: 80 });
        a.bid(Player::South, Bid { suit: Suit::Hearts, value: 100 }).unwrap();
        assert_eq!(a.current_best(), Some(Player::South));
        assert_eq!(a.best_bid().map(|b| b.value), Some(100));
    }

    #[test]
    fn rejected_actions_leave_state_unchanged() {
        let mut a = Auction::new(Player::West);
        a.bid(Player::West, bid(100)).unwrap();
        let before = a.clone();
        assert!(a.bid(Player::South, bid(90)).is_err());
        assert!(a.pass(Player::North).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn out_of_turn_is_rejected() {
        let mut a = Auction::new(Player::East);
        let err = a.pass(Player::West).unwrap_err();
        assert_eq!(err, ActionError::OutOfTurn { expected: Player::East, got: Player::West });
    }

    #[test]
    fn rebid_replaces_own_bid() {
        let mut a = Auction::new(Player::West);
        a.bid(Player::West, bid(80)).unwrap();
        a.bid(Player::South, bid(90)).unwrap();
        a.pass(Player::East).unwrap();
        a.pass(Player::North).unwrap();
        a.bid(Player::West, bid(110)).unwrap();
        assert_eq!(a.bids()[Player::West], Some(bid(110)));
        assert_eq!(a.bids().values().filter(|b| b.is_some()).count(), 2);
    }
}
