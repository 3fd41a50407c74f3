use crate::action::ActionError;
use crate::cards::{Card, Suit};

/// A player's private cards, in deal order.
///
/// ```
/// use belote_rs::cards::{Card, Rank, Suit};
/// use belote_rs::hand::Hand;
///
/// let mut hand = Hand::new(vec![
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Seven, Suit::Hearts),
/// ]);
/// assert_eq!(hand.play(1).unwrap(), Card::new(Rank::Seven, Suit::Hearts));
/// assert_eq!(hand.len(), 1);
/// assert!(hand.play(1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
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

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit() == suit)
    }

    /// Strongest trump held, if any.
    pub fn best_trump(&self, trump: Suit) -> Option<Card> {
        self.cards.iter().copied().filter(|c| c.is_trump(trump)).max_by_key(|c| c.strength(trump))
    }

    pub fn check_index(&self, index: usize) -> Result<(), ActionError> {
        if index >= self.cards.len() {
            return Err(ActionError::CardIndexOutOfRange { index, len: self.cards.len() });
        }
        Ok(())
    }

    /// Remove and return the card at `index`.
    pub fn play(&mut self, index: usize) -> Result<Card, ActionError> {
        self.check_index(index)?;
        Ok(self.cards.remove(index))
    }

    pub fn reset(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }
}
