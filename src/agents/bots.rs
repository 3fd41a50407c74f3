use crate::action::{Action, ActionError, Event};
use crate::auction::{BID_STEP, MIN_BID};
use crate::cards::Suit;
use crate::engine::BeloteEngine;
use crate::game::Phase;
use crate::player::Player;
use crate::snapshot::GameSnapshot;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use super::expert::ExpertStrategy;
use super::{AgentKind, PlayerAgent};

/// Chance that a bot bids rather than passes.
const BID_PROBABILITY: f64 = 0.5;
/// Spread, in bid steps above the minimum, of a bot's bid.
const BID_SPREAD: f64 = 2.3;

/// A decision policy reading only the snapshot.
pub trait Strategy {
    fn name(&self) -> &'static str;
    /// A bid or a pass for the player to move.
    fn bid(&mut self, snapshot: &GameSnapshot) -> Action;
    /// A card for the player to move; picks among the legal ones.
    fn play(&mut self, snapshot: &GameSnapshot) -> Action;

    fn decide(&mut self, snapshot: &GameSnapshot) -> Action {
        match snapshot.phase {
            Phase::Auction => self.bid(snapshot),
            Phase::Playing => self.play(snapshot),
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

/// Bid half of the time, around the minimum, on a random suit. A drawn value
/// that does not beat the current best turns into a pass.
fn random_bid<R: Rng + ?Sized>(rng: &mut R, snapshot: &GameSnapshot) -> Action {
    let player = snapshot.to_move;
    if !rng.random_bool(BID_PROBABILITY) {
        return Action::Pass { player };
    }
    let spread = Normal::new(0.0, BID_SPREAD).map_or(0.0, |n| n.sample(rng));
    let steps = spread.abs().round() as u16;
    let value = MIN_BID + BID_STEP * steps;
    if snapshot.auction.best_bid().is_some_and(|best| value <= best.value) {
        return Action::Pass { player };
    }
    let suit = Suit::ALL[rng.random_range(0..Suit::ALL.len())];
    Action::Bid { player, suit, value }
}

/// Plays a uniformly chosen legal card.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }
    fn bid(&mut self, snapshot: &GameSnapshot) -> Action {
        random_bid(&mut self.rng, snapshot)
    }
    fn play(&mut self, snapshot: &GameSnapshot) -> Action {
        let legal = snapshot.legal_indices();
        let card_index = if legal.is_empty() { 0 } else { legal[self.rng.random_range(0..legal.len())] };
        Action::PlayCard { player: snapshot.to_move, card_index }
    }
}

/// Plays the legal card worth the most points; bids like [`RandomStrategy`].
#[derive(Debug)]
pub struct HighestCardStrategy {
    rng: StdRng,
}

impl HighestCardStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl Strategy for HighestCardStrategy {
    fn name(&self) -> &'static str {
        "highest"
    }
    fn bid(&mut self, snapshot: &GameSnapshot) -> Action {
        random_bid(&mut self.rng, snapshot)
    }
    fn play(&mut self, snapshot: &GameSnapshot) -> Action {
        let player = snapshot.to_move;
        let hand = snapshot.hand(player);
        let mut best: Option<(usize, u16)> = None;
        if let Some(trump) = snapshot.trump() {
            for i in snapshot.legal_indices() {
                let points = hand[i].points(trump);
                // first card wins ties
                if best.map_or(true, |(_, p)| points > p) {
                    best = Some((i, points));
                }
            }
        }
        Action::PlayCard { player, card_index: best.map_or(0, |(i, _)| i) }
    }
}

/// Built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum StrategyKind {
    #[default]
    Random,
    HighestCard,
    Expert,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Random, StrategyKind::HighestCard, StrategyKind::Expert];

    pub fn build(self, seed: Option<u64>) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
            StrategyKind::HighestCard => Box::new(HighestCardStrategy::new(seed)),
            // deterministic, the seed only paces it
            StrategyKind::Expert => Box::new(ExpertStrategy::new()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::HighestCard => "highest",
            StrategyKind::Expert => "expert",
        }
    }

    /// The next kind in [`StrategyKind::ALL`], wrapping around.
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The previous kind in [`StrategyKind::ALL`], wrapping around.
    pub fn cycle_back(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrategyParseError {
    #[error("unknown strategy '{0}' (expected random, highest or expert)")]
    Unknown(String),
}

impl FromStr for StrategyKind {
    type Err = StrategyParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "r" => Ok(StrategyKind::Random),
            "highest" | "highest-card" | "highest_card" | "h" => Ok(StrategyKind::HighestCard),
            "expert" | "e" => Ok(StrategyKind::Expert),
            _ => Err(StrategyParseError::Unknown(s.to_string())),
        }
    }
}

/// Configuration for a bot seat.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub strategy: StrategyKind,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    pub fn new(strategy: StrategyKind) -> Self {
        Self { strategy, min_delay_ms: 0, max_delay_ms: 0, rng_seed: None }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Think for a random time in `min..=max` milliseconds before acting.
    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min;
        self.max_delay_ms = max;
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::new(StrategyKind::default())
    }
}

/// A bot seat: a [`Strategy`] plus pacing.
pub struct BotAgent {
    profile: BotProfile,
    strategy: Box<dyn Strategy>,
    rng: StdRng,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for BotAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotAgent")
            .field("profile", &self.profile)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let strategy = profile.strategy.build(profile.rng_seed);
        // pacing draws from its own stream so delays never shift decisions
        let rng = seeded_rng(profile.rng_seed.map(|s| s.wrapping_add(1)));
        Self { profile, strategy, rng, next_action_at: None }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

impl PlayerAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
    fn on_turn(
        &mut self,
        engine: &mut dyn BeloteEngine,
        seat: Player,
    ) -> Result<Option<Event>, ActionError> {
        if engine.to_move() != seat {
            return Ok(None);
        }
        let now = Instant::now();
        let delay = choose_delay_ms(&self.profile, &mut self.rng);
        if delay > 0 {
            match self.next_action_at {
                None => {
                    self.next_action_at = Some(now + Duration::from_millis(delay));
                    return Ok(None);
                }
                Some(next) if now < next => {
                    return Ok(None);
                }
                Some(_) => {}
            }
        }
        self.next_action_at = None;

        let snapshot = engine.describe();
        let action = self.strategy.decide(&snapshot);
        engine.update(action).map(Some)
    }
}

fn choose_delay_ms(profile: &BotProfile, rng: &mut StdRng) -> u64 {
    let min = profile.min_delay_ms;
    let max = profile.max_delay_ms.max(min);
    if max == min {
        min
    } else {
        rng.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::Bid;
    use crate::cards::parse_cards;
    use crate::game::Game;
    use crate::player::Seats;
    use std::thread;

    fn playing_game(hands: [&str; 4], trump: Suit) -> Game {
        let hands = Seats::new(hands.map(|h| parse_cards(h).unwrap()));
        let mut game = Game::from_hands(hands, Player::West, 0);
        game.update(Action::Bid { player: Player::West, suit: trump, value: 80 }).unwrap();
        for player in [Player::South, Player::East, Player::North] {
            game.update(Action::Pass { player }).unwrap();
        }
        game
    }

    const HANDS: [&str; 4] = [
        "7s 8s 9s 10s Js Qs Ks As",
        "7h 8h 9h 10h Jh Qh Kh Ah",
        "7d 8d 9d 10d Jd Qd Kd Ad",
        "7c 8c 9c 10c Jc Qc Kc Ac",
    ];

    #[test]
    fn highest_card_picks_the_most_points() {
        let game = playing_game(HANDS, Suit::Spades);
        let mut s = HighestCardStrategy::new(Some(1));
        // West leads with the trump jack
        assert_eq!(s.decide(&game.describe()), Action::PlayCard { player: Player::West, card_index: 4 });
    }

    #[test]
    fn highest_card_breaks_ties_by_hand_order() {
        let hands = [
            "7s 10s 8h 10h 7d 8d 9d Jd",
            "7h 9h Jh Qh Kh Ah 8s 9s",
            "10d Qd Kd Ad Js Qs Ks As",
            "7c 8c 9c 10c Jc Qc Kc Ac",
        ];
        let mut game = playing_game(hands, Suit::Clubs);
        let mut s = HighestCardStrategy::new(Some(1));
        // two plain tens tie at 10 points
        let action = s.decide(&game.describe());
        assert_eq!(action, Action::PlayCard { player: Player::West, card_index: 1 });
        game.update(action).unwrap();
        // South must follow spades with two zero-point cards
        let snap = game.describe();
        assert_eq!(snap.legal_indices(), vec![6, 7]);
        assert_eq!(s.decide(&snap), Action::PlayCard { player: Player::South, card_index: 6 });
    }

    #[test]
    fn random_play_is_always_legal() {
        let mut game = Game::with_seed(4);
        let mut s = RandomStrategy::new(Some(4));
        game.update(Action::Bid { player: Player::West, suit: Suit::Hearts, value: 80 }).unwrap();
        for player in [Player::South, Player::East, Player::North] {
            game.update(Action::Pass { player }).unwrap();
        }
        for _ in 0..32 {
            let action = s.decide(&game.describe());
            game.update(action).unwrap();
        }
        assert_eq!(game.rounds_played(), 1);
    }

    #[test]
    fn random_bids_are_valid_or_passes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = Game::with_seed(3);
        game.update(Action::Bid { player: Player::West, suit: Suit::Clubs, value: 90 }).unwrap();
        let snap = game.describe();
        assert_eq!(snap.auction.best_bid(), Some(Bid { suit: Suit::Clubs, value: 90 }));
        for _ in 0..200 {
            let action = random_bid(&mut rng, &snap);
            match action {
                Action::Pass { player } => assert_eq!(player, Player::South),
                Action::Bid { value, .. } => {
                    assert!(value > 90 && value % 10 == 0);
                    assert!(game.clone().update(action).is_ok());
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn opening_bids_spread_above_the_minimum() {
        let mut rng = StdRng::seed_from_u64(11);
        let snap = Game::with_seed(11).describe();
        let mut values = Vec::new();
        for _ in 0..400 {
            if let Action::Bid { value, .. } = random_bid(&mut rng, &snap) {
                assert!(value >= MIN_BID && value % BID_STEP == 0);
                values.push(value);
            }
        }
        // half-normal around the minimum: most bids low, some well above it
        assert!(values.len() > 100);
        assert!(values.contains(&MIN_BID));
        assert!(values.iter().any(|&v| v >= MIN_BID + 3 * BID_STEP));
        let at_min = values.iter().filter(|&&v| v == MIN_BID).count();
        assert!(at_min < values.len() / 2);
    }

    #[test]
    fn delay_throttles_actions() {
        let mut game = Game::with_seed(8);
        let profile = BotProfile::new(StrategyKind::Random).with_seed(7).with_delay_ms(15, 15);
        let mut bot = BotAgent::new(profile);
        let seat = game.to_move();

        // First tick schedules the bot without acting.
        assert_eq!(bot.on_turn(&mut game, seat).unwrap(), None);
        assert_eq!(game.to_move(), seat);

        thread::sleep(Duration::from_millis(20));
        assert!(bot.on_turn(&mut game, seat).unwrap().is_some());
        assert_ne!(game.to_move(), seat);
    }

    #[test]
    fn strategy_kind_parses_and_cycles() {
        assert_eq!("highest".parse::<StrategyKind>().unwrap(), StrategyKind::HighestCard);
        assert_eq!("Random".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!("expert".parse::<StrategyKind>().unwrap(), StrategyKind::Expert);
        assert!("minimax".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::HighestCard.cycle(), StrategyKind::Expert);
        assert_eq!(StrategyKind::Expert.cycle(), StrategyKind::Random);
        assert_eq!(StrategyKind::Random.cycle_back(), StrategyKind::Expert);
        assert_eq!(StrategyKind::Expert.build(Some(3)).name(), "expert");
    }
}
