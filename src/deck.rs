use crate::cards::{Card, Rank, Suit};
use crate::player::Seats;
use rand::seq::SliceRandom;
use rand::Rng;

/// Cards dealt to each player.
pub const HAND_SIZE: usize = 8;

/// The 32-card Belote deck (7 through Ace in four suits).
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use belote_rs::deck::Deck;
    ///
    /// let deck = Deck::belote();
    /// assert_eq!(deck.len(), 32);
    /// ```
    pub fn belote() -> Self {
        let mut cards = Vec::with_capacity(32);
        for s in Suit::ALL {
            for r in Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Split the whole deck into four hands of [`HAND_SIZE`] cards, consuming it.
    pub fn deal(mut self) -> Seats<Vec<Card>> {
        Seats::from_fn(|_| {
            let at = self.cards.len().saturating_sub(HAND_SIZE);
            let mut hand = self.cards.split_off(at);
            hand.reverse();
            hand
        })
    }
}

/// Shuffle a fresh deck with `rng` and deal it out.
pub fn deal_with<R: Rng + ?Sized>(rng: &mut R) -> Seats<Vec<Card>> {
    let mut deck = Deck::belote();
    deck.shuffle_with(rng);
    deck.deal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn belote_deck_has_32_distinct_cards() {
        let d = Deck::belote();
        assert_eq!(d.len(), 32);
        let set: HashSet<Card> = d.as_slice().iter().copied().collect();
        assert_eq!(set.len(), 32);
    }

    fn shuffled(seed: u64) -> Deck {
        let mut d = Deck::belote();
        d.shuffle_with(&mut ChaCha8Rng::seed_from_u64(seed));
        d
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        assert_eq!(shuffled(42).cards, shuffled(42).cards);
        assert_ne!(shuffled(42).cards, Deck::belote().cards);
    }

    #[test]
    fn deal_partitions_the_deck() {
        let hands = shuffled(7).deal();
        let mut all = HashSet::new();
        for (_, cards) in hands.iter() {
            assert_eq!(cards.len(), HAND_SIZE);
            all.extend(cards.iter().copied());
        }
        assert_eq!(all.len(), 32);
    }

    #[test]
    fn unshuffled_deal_hands_out_suit_blocks() {
        let hands = Deck::belote().deal();
        // cards come off the top: the last block of the deck goes to West
        assert!(hands[Player::West].iter().all(|c| c.suit() == Suit::Clubs));
        assert!(hands[Player::North].iter().all(|c| c.suit() == Suit::Spades));
    }
}
