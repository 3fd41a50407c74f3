use crate::cards::{Card, Suit};
use crate::player::{Player, Seats};
use crate::snapshot::TrickSnapshot;

/// Result of placing a card in the current trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickStatus {
    Continue,
    Complete,
}

/// The cards of the trick in progress, one slot per player, plus the player
/// currently winning it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrickCards {
    cards: Seats<Option<Card>>,
    leader: Option<Player>,
    led_suit: Option<Suit>,
}

impl TrickCards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `card` for `player` and recompute the leader.
    ///
    /// # Panics
    /// If `player` already played in this trick. The round checks turn order
    /// before placing, so this is unreachable through [`Game::update`](crate::game::Game::update).
    pub fn place(&mut self, player: Player, card: Card, trump: Suit, led_suit: Suit) -> TrickStatus {
        assert!(self.cards[player].is_none(), "{player} already played in this trick");
        self.cards[player] = Some(card);
        self.led_suit = Some(led_suit);
        self.leader = best_of(&self.cards, trump, led_suit);
        if self.is_complete() {
            TrickStatus::Complete
        } else {
            TrickStatus::Continue
        }
    }

    pub fn card(&self, player: Player) -> Option<Card> {
        self.cards[player]
    }

    pub fn cards(&self) -> &Seats<Option<Card>> {
        &self.cards
    }

    pub fn leader(&self) -> Option<Player> {
        self.leader
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.led_suit
    }

    pub fn len(&self) -> usize {
        self.cards.values().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len() == 4
    }

    /// All four cards, once every player has played.
    pub fn complete_cards(&self) -> Option<Seats<Card>> {
        let [w, s, e, n] = *self.cards.as_array();
        Some(Seats::new([w?, s?, e?, n?]))
    }

    /// Strongest trump placed so far.
    pub fn highest_trump(&self, trump: Suit) -> Option<Card> {
        self.cards
            .values()
            .flatten()
            .copied()
            .filter(|c| c.is_trump(trump))
            .max_by_key(|c| c.strength(trump))
    }

    /// Point total of the placed cards.
    pub fn points(&self, trump: Suit) -> u16 {
        self.cards.values().flatten().map(|c| c.points(trump)).sum()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn describe(&self) -> TrickSnapshot {
        TrickSnapshot { cards: self.cards, leader: self.leader, led_suit: self.led_suit }
    }
}

/// Owner of the winning card: the highest trump if any was played, else the
/// highest card of the led suit.
pub(crate) fn best_of(cards: &Seats<Option<Card>>, trump: Suit, led_suit: Suit) -> Option<Player> {
    let placed = || cards.iter().filter_map(|(p, c)| c.map(|c| (p, c)));
    placed()
        .filter(|(_, c)| c.is_trump(trump))
        .max_by_key(|(_, c)| c.strength(trump))
        .or_else(|| {
            placed().filter(|(_, c)| c.suit() == led_suit).max_by_key(|(_, c)| c.strength(trump))
        })
        .map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn highest_led_card_leads_without_trump() {
        let mut t = TrickCards::new();
        let trump = Suit::Hearts;
        assert_eq!(t.place(Player::West, c("Ks"), trump, Suit::Spades), TrickStatus::Continue);
        assert_eq!(t.leader(), Some(Player::West));
        t.place(Player::South, c("As"), trump, Suit::Spades);
        assert_eq!(t.leader(), Some(Player::South));
        // off-suit card never leads
        t.place(Player::East, c("Ad"), trump, Suit::Spades);
        assert_eq!(t.leader(), Some(Player::South));
        assert_eq!(t.place(Player::North, c("10s"), trump, Suit::Spades), TrickStatus::Complete);
        assert_eq!(t.leader(), Some(Player::South));
        assert_eq!(t.points(trump), 4 + 11 + 11 + 10);
    }

    #[test]
    fn any_trump_beats_led_suit() {
        let mut t = TrickCards::new();
        let trump = Suit::Clubs;
        t.place(Player::West, c("7d"), trump, Suit::Diamonds);
        t.place(Player::South, c("Kd"), trump, Suit::Diamonds);
        t.place(Player::East, c("9c"), trump, Suit::Diamonds);
        assert_eq!(t.leader(), Some(Player::East));
        t.place(Player::North, c("Ac"), trump, Suit::Diamonds);
        assert_eq!(t.leader(), Some(Player::East), "nine of trump beats ace of trump");
        assert_eq!(t.highest_trump(trump), Some(Card::new(Rank::Nine, Suit::Clubs)));
    }

    #[test]
    #[should_panic(expected = "already played")]
    fn placing_twice_for_one_player_panics() {
        let mut t = TrickCards::new();
        t.place(Player::West, c("7d"), Suit::Clubs, Suit::Diamonds);
        t.place(Player::West, c("8d"), Suit::Clubs, Suit::Diamonds);
    }

    #[test]
    fn reset_empties_every_slot() {
        let mut t = TrickCards::new();
        t.place(Player::West, c("7d"), Suit::Clubs, Suit::Diamonds);
        t.reset();
        assert!(t.is_empty());
        assert_eq!(t.leader(), None);
        assert_eq!(t.led_suit(), None);
    }
}
