//! Read-only views of the engine state.
//!
//! Each component assembles its own part through a `describe()` method and
//! [`Game::describe`](crate::game::Game::describe) composes them. Strategies,
//! loggers and the TUI read these structs only; they never touch the engine
//! internals.

use crate::auction::{Bid, Contract};
use crate::cards::{Card, Suit};
use crate::game::{Phase, RoundSummary};
use crate::player::{Player, Seats, Team, Teams};
use crate::round::CompletedTrick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickSnapshot {
    pub cards: Seats<Option<Card>>,
    pub leader: Option<Player>,
    pub led_suit: Option<Suit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub bids: Seats<Option<Bid>>,
    pub current_best: Option<Player>,
    pub passed_in_row: i8,
    pub turn: Player,
}

impl AuctionSnapshot {
    pub fn best_bid(&self) -> Option<Bid> {
        self.current_best.and_then(|p| self.bids[p])
    }

    pub fn contract(&self) -> Option<Contract> {
        let player = self.current_best?;
        self.bids[player].map(|bid| Contract { player, bid })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub hands: Seats<Vec<Card>>,
    /// Legality of each card in the hand of `to_play`; empty until trump is set.
    pub legal: Vec<bool>,
    pub to_play: Player,
    pub trick: TrickSnapshot,
    pub trick_index: u8,
    pub trick_opener: Player,
    pub trump: Option<Suit>,
    pub points: Teams<u16>,
    pub belote: Vec<Player>,
    /// Completed tricks of this deal, oldest first.
    pub tricks: Vec<CompletedTrick>,
}

impl RoundSnapshot {
    pub fn last_trick(&self) -> Option<&CompletedTrick> {
        self.tricks.last()
    }

    /// Cards gathered in the completed tricks of this deal.
    pub fn played_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.tricks.iter().flat_map(|t| t.cards.as_array().iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub first_player: Player,
    /// The player expected to act next, in either phase.
    pub to_move: Player,
    pub auction: AuctionSnapshot,
    pub round: RoundSnapshot,
    pub score: Teams<u32>,
    pub rounds_played: u32,
    pub redeals: u32,
    pub last_round: Option<RoundSummary>,
}

impl GameSnapshot {
    pub fn hand(&self, player: Player) -> &[Card] {
        &self.round.hands[player]
    }

    /// Indices of the cards the player to move may play. Empty during the auction.
    pub fn legal_indices(&self) -> Vec<usize> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        self.round.legal.iter().enumerate().filter(|(_, ok)| **ok).map(|(i, _)| i).collect()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.round.trump
    }

    pub fn contract(&self) -> Option<Contract> {
        self.auction.contract()
    }

    /// The team that reached `target` with the higher score, if any.
    pub fn winner(&self, target: u32) -> Option<Team> {
        let (ew, ns) = (self.score[Team::EastWest], self.score[Team::NorthSouth]);
        if ew.max(ns) < target || ew == ns {
            return None;
        }
        Some(if ew > ns { Team::EastWest } else { Team::NorthSouth })
    }
}
