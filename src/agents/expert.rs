//! Rule-based strategy: bids from hand patterns, plays by seat position and
//! what the table has shown so far.
//!
//! Bidding scores the hand against the opening combinations of
//! [`combinations`] and, once the partner has spoken, against the support
//! tables. Card play reads the completed tricks of the deal to tell which
//! cards are masters and which opponents have run out of a suit or of trumps.

use crate::action::Action;
use crate::auction::{Bid, BID_STEP, MIN_BID};
use crate::cards::{Card, Rank, Suit};
use crate::player::{Player, Seats};
use crate::round::CompletedTrick;
use crate::snapshot::{AuctionSnapshot, GameSnapshot, RoundSnapshot, TrickSnapshot};
use crate::trick::best_of;
use std::cmp::Ordering;
use tracing::trace;

use super::Strategy;

mod combinations;

use combinations::{best_suit_bid, support_score, AGGRESSIVE_SUPPORT, SUPPORT};

/// Deterministic expert player.
#[derive(Debug, Default)]
pub struct ExpertStrategy;

impl ExpertStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for ExpertStrategy {
    fn name(&self) -> &'static str {
        "expert"
    }

    fn bid(&mut self, snapshot: &GameSnapshot) -> Action {
        let player = snapshot.to_move;
        match choose_bid(snapshot.hand(player), player, &snapshot.auction) {
            Some(Bid { suit, value }) => Action::Bid { player, suit, value },
            None => Action::Pass { player },
        }
    }

    fn play(&mut self, snapshot: &GameSnapshot) -> Action {
        let player = snapshot.to_move;
        let hand = snapshot.hand(player);
        let legal = snapshot.legal_indices();
        let card_index = choose_card(snapshot)
            .and_then(|card| hand.iter().position(|&c| c == card))
            .filter(|i| legal.contains(i))
            .or_else(|| legal.first().copied())
            .unwrap_or(0);
        Action::PlayCard { player, card_index }
    }
}

// ---------------------------------------------------------------------------
// Bidding
// ---------------------------------------------------------------------------

/// Bid or pass given who has spoken so far. Players keep their last bid in
/// the snapshot, so "spoken" means having bid at least once.
fn choose_bid(hand: &[Card], player: Player, auction: &AuctionSnapshot) -> Option<Bid> {
    let partner = player.partner();
    let own = auction.bids[player];
    let partner_bid = auction.bids[partner];
    let opponent_bid = [player.next(), partner.next()]
        .into_iter()
        .filter_map(|p| auction.bids[p])
        .max_by_key(|b| b.value);
    let partner_leads = auction.current_best == Some(partner);
    let same_suit_as_partner = matches!((own, partner_bid), (Some(a), Some(b)) if a.suit == b.suit);

    let bid = match (own.is_some(), partner_bid, opponent_bid) {
        (false, None, None) => open(hand),
        (_, None, Some(opponent)) => overcall(hand, opponent.value),
        (false, Some(partner), None) => raise_or_open(hand, partner),
        (true, Some(_), _) if same_suit_as_partner => None,
        (true, Some(partner), None) => support(hand, partner, SUPPORT),
        (false, Some(partner), Some(_)) if partner_leads => raise_or_open(hand, partner),
        (false, Some(partner), Some(opponent)) => contest(hand, partner, opponent.value),
        (true, Some(partner), Some(_)) if partner_leads => support(hand, partner, SUPPORT),
        (true, Some(partner), Some(opponent)) => {
            support(hand, partner, AGGRESSIVE_SUPPORT).filter(|b| b.value > opponent.value)
        }
        (true, None, None) => None,
    };
    let min = auction_min(auction);
    bid.filter(|b| b.value >= min)
}

fn auction_min(auction: &AuctionSnapshot) -> u16 {
    match auction.best_bid() {
        Some(best) => best.value + BID_STEP,
        None => MIN_BID,
    }
}

fn open(hand: &[Card]) -> Option<Bid> {
    best_suit_bid(hand).map(|(suit, value)| Bid { suit, value })
}

/// Only the opponents have bid: match their value by going one step above.
fn overcall(hand: &[Card], opponent: u16) -> Option<Bid> {
    let (suit, value) = best_suit_bid(hand)?;
    match value.cmp(&opponent) {
        Ordering::Less => None,
        Ordering::Equal => Some(Bid { suit, value: value + BID_STEP }),
        Ordering::Greater => Some(Bid { suit, value }),
    }
}

fn support(hand: &[Card], partner: Bid, table: &[combinations::Bonus]) -> Option<Bid> {
    let extra = support_score(hand, partner.suit, table);
    (extra > 0).then_some(Bid { suit: partner.suit, value: partner.value + extra })
}

/// Own suit when it beats the raised partner bid, else the raise.
fn raise_or_open(hand: &[Card], partner: Bid) -> Option<Bid> {
    let raise = support(hand, partner, SUPPORT);
    let raised = raise.map_or(partner.value, |b| b.value);
    match best_suit_bid(hand) {
        Some((suit, value)) if value > raised => Some(Bid { suit, value }),
        _ => raise,
    }
}

/// Partner has bid but an opponent leads the auction.
fn contest(hand: &[Card], partner: Bid, opponent: u16) -> Option<Bid> {
    let raise = support(hand, partner, AGGRESSIVE_SUPPORT);
    let raised = raise.map_or(partner.value, |b| b.value);
    match best_suit_bid(hand) {
        Some((suit, value)) if value > opponent.max(raised) => Some(Bid { suit, value }),
        _ => raise.filter(|b| b.value > opponent),
    }
}

// ---------------------------------------------------------------------------
// Card play
// ---------------------------------------------------------------------------

/// Order used to pick the cheapest or most valuable card.
fn worth(card: Card, trump: Suit) -> (u16, u8) {
    (card.points(trump), card.strength(trump))
}

fn lowest_in_suit(cards: &[Card], suit: Suit, trump: Suit) -> Option<Card> {
    cards.iter().copied().filter(|c| c.suit() == suit).min_by_key(|c| worth(*c, trump))
}

fn highest_in_suit(cards: &[Card], suit: Suit, trump: Suit) -> Option<Card> {
    cards.iter().copied().filter(|c| c.suit() == suit).max_by_key(|c| worth(*c, trump))
}

/// Cheapest card outside trump; the first one in hand order on ties.
fn lowest_plain(cards: &[Card], trump: Suit) -> Option<Card> {
    cards
        .iter()
        .copied()
        .filter(|c| !c.is_trump(trump))
        .fold(None, |low: Option<Card>, c| match low {
            Some(l) if worth(l, trump) <= worth(c, trump) => Some(l),
            _ => Some(c),
        })
}

/// Most valuable card outside trump; the first one in hand order on ties.
fn highest_plain(cards: &[Card], trump: Suit) -> Option<Card> {
    cards
        .iter()
        .copied()
        .filter(|c| !c.is_trump(trump))
        .fold(None, |high: Option<Card>, c| match high {
            Some(h) if worth(h, trump) >= worth(c, trump) => Some(h),
            _ => Some(c),
        })
}

/// Cheapest plain card, or the cheapest trump when only trumps are left.
fn discard(cards: &[Card], trump: Suit) -> Option<Card> {
    lowest_plain(cards, trump).or_else(|| lowest_in_suit(cards, trump, trump))
}

/// Whether the strongest card of `suit` not yet `seen` is in `cards`.
fn holds_master(cards: &[Card], seen: &[Card], suit: Suit, trump: Suit) -> bool {
    Rank::ALL
        .into_iter()
        .map(|rank| Card::new(rank, suit))
        .filter(|c| !seen.contains(c))
        .max_by_key(|c| c.strength(trump))
        .is_some_and(|master| cards.contains(&master))
}

/// Whether `player` trumped a trick led in `suit` by someone else.
fn has_cut(player: Player, tricks: &[CompletedTrick], suit: Suit, trump: Suit) -> bool {
    tricks.iter().any(|t| {
        t.opener != player && t.cards[t.opener].suit() == suit && t.cards[player].is_trump(trump)
    })
}

/// Whether some trick proves `player` holds no trump: a trump lead they did
/// not follow, or a plain lead they neither followed nor trumped while an
/// opponent held the trick.
fn shown_out_of_trumps(player: Player, tricks: &[CompletedTrick], trump: Suit) -> bool {
    tricks.iter().filter(|t| t.opener != player).any(|t| {
        let led = t.cards[t.opener].suit();
        let card = t.cards[player];
        if card.is_trump(trump) || card.suit() == led {
            return false;
        }
        if led == trump {
            return true;
        }
        // the trick as it stood when `player` had to play
        let mut before = Seats::from_fn(|_| None);
        let mut seat = t.opener;
        while seat != player {
            before[seat] = Some(t.cards[seat]);
            seat = seat.next();
        }
        best_of(&before, trump, led) != Some(player.partner())
    })
}

/// Whether `card` would take the lead of the trick for `player`.
fn takes_lead(trick: &TrickSnapshot, player: Player, card: Card, trump: Suit) -> bool {
    let mut cards = trick.cards;
    cards[player] = Some(card);
    let led = trick.led_suit.unwrap_or(card.suit());
    best_of(&cards, trump, led) == Some(player)
}

/// The expert's card for the player to move, chosen among the legal ones.
fn choose_card(snapshot: &GameSnapshot) -> Option<Card> {
    let trump = snapshot.trump()?;
    let player = snapshot.to_move;
    let hand = snapshot.hand(player);
    let legal: Vec<Card> = snapshot.legal_indices().into_iter().filter_map(|i| hand.get(i).copied()).collect();
    if legal.len() == 1 {
        return legal.first().copied();
    }
    let round = &snapshot.round;
    let (rule, card) = match round.trick.cards.values().flatten().count() {
        0 => lead(snapshot, &legal, trump),
        1 => second(player, &legal, round, trump),
        position => late(player, &legal, &round.trick, trump, position == 3),
    };
    trace!(player = %player, rule, card = ?card.map(|c| c.to_string()), "expert play");
    card
}

fn lead(snapshot: &GameSnapshot, legal: &[Card], trump: Suit) -> (&'static str, Option<Card>) {
    let player = snapshot.to_move;
    let tricks = &snapshot.round.tricks;
    let seen: Vec<Card> = snapshot.round.played_cards().collect();
    let in_contract = snapshot.contract().is_some_and(|c| c.team() == player.team());
    let trumps_elsewhere = Rank::ALL
        .into_iter()
        .map(|rank| Card::new(rank, trump))
        .any(|c| !seen.contains(&c) && !legal.contains(&c));

    if in_contract && trumps_elsewhere && holds_master(legal, &seen, trump, trump) {
        return ("draw trumps", highest_in_suit(legal, trump, trump));
    }

    let opponents = [player.next(), player.partner().next()];
    let safe = |suit: Suit| {
        opponents
            .iter()
            .all(|&o| !has_cut(o, tricks, suit, trump) || shown_out_of_trumps(o, tricks, trump))
    };
    let masters: Vec<Card> = legal
        .iter()
        .copied()
        .filter(|c| !c.is_trump(trump))
        .filter(|c| holds_master(&[*c], &seen, c.suit(), trump) && safe(c.suit()))
        .collect();
    if let Some(card) = highest_plain(&masters, trump) {
        return ("cash master", Some(card));
    }
    ("lead low", discard(legal, trump))
}

fn second(player: Player, legal: &[Card], round: &RoundSnapshot, trump: Suit) -> (&'static str, Option<Card>) {
    let tricks = &round.tricks;
    let Some(led) = round.trick.led_suit else {
        return ("no lead", discard(legal, trump));
    };
    let has = |suit: Suit| legal.iter().any(|c| c.suit() == suit);

    if led == trump {
        return if has(trump) {
            ("follow trump low", lowest_in_suit(legal, trump, trump))
        } else {
            ("no trump", discard(legal, trump))
        };
    }
    if has(led) {
        let third = player.next();
        let third_can_cut = has_cut(third, tricks, led, trump) && !shown_out_of_trumps(third, tricks, trump);
        let seen: Vec<Card> = round.played_cards().collect();
        if holds_master(legal, &seen, led, trump) && !third_can_cut {
            return ("follow master", highest_in_suit(legal, led, trump));
        }
        return ("follow low", lowest_in_suit(legal, led, trump));
    }
    if has(trump) {
        return ("cut low", lowest_in_suit(legal, trump, trump));
    }
    ("discard", discard(legal, trump))
}

fn late(
    player: Player,
    legal: &[Card],
    trick: &TrickSnapshot,
    trump: Suit,
    last: bool,
) -> (&'static str, Option<Card>) {
    if trick.leader == Some(player.partner()) {
        if last {
            let load = highest_plain(legal, trump).or_else(|| lowest_in_suit(legal, trump, trump));
            return ("load partner", load);
        }
        return ("partner holds", discard(legal, trump));
    }
    let winners: Vec<Card> = legal.iter().copied().filter(|&c| takes_lead(trick, player, c, trump)).collect();
    if last {
        if let Some(card) = winners.iter().copied().min_by_key(|c| (c.is_trump(trump), worth(*c, trump))) {
            return ("win cheap", Some(card));
        }
    } else if let Some(card) = winners.iter().copied().max_by_key(|c| (c.is_trump(trump), c.strength(trump))) {
        return ("win high", Some(card));
    }
    ("give low", discard(legal, trump))
}
