use crate::action::{Action, ActionError, ErrorKind, Event, InternalError};
use crate::auction::{Auction, AuctionStatus, Bid, Contract};
use crate::cards::Card;
use crate::deck::deal_with;
use crate::player::{Player, Seats, Team, Teams};
use crate::round::{Round, RoundStatus};
use crate::snapshot::GameSnapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Points the defenders receive, on top of the bid, when a contract fails.
pub const FAILED_CONTRACT_POINTS: u32 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Auction,
    Playing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Auction => "auction",
            Phase::Playing => "playing",
        })
    }
}

/// How a [`Game`] starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Speaks first in the auction and leads the first trick of the first deal.
    pub first_player: Player,
    /// Seed for the deal sequence; `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { first_player: Player::West, seed: None }
    }
}

/// Outcome of a settled round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// One-based count of settled rounds.
    pub round: u32,
    pub contract: Contract,
    /// Round points of each team, bonuses included.
    pub points: Teams<u16>,
    pub contract_reached: bool,
    /// What each team added to its cumulative score.
    pub delta: Teams<u32>,
    pub belote: Option<Player>,
}

impl RoundSummary {
    pub fn contract_team(&self) -> Team {
        self.contract.team()
    }
}

/// Round `points` to the nearest ten, halves up.
pub const fn round_to_ten(points: u32) -> u32 {
    (points + 5) / 10 * 10
}

/// Score deltas for a round given the contract and both teams' round points.
///
/// A reached contract gives the bidding team its rounded points plus the bid
/// and the defenders their rounded points. A failed one gives the defenders
/// [`FAILED_CONTRACT_POINTS`] plus the bid and the bidders nothing.
///
/// ```
/// use belote_rs::auction::{Bid, Contract};
/// use belote_rs::cards::Suit;
/// use belote_rs::game::settlement;
/// use belote_rs::player::{Player, Team, Teams};
///
/// let contract = Contract { player: Player::South, bid: Bid { suit: Suit::Clubs, value: 90 } };
/// let (reached, delta) = settlement(contract, Teams::new(96, 86));
/// assert!(!reached);
/// assert_eq!(delta[Team::EastWest], 250);
/// assert_eq!(delta[Team::NorthSouth], 0);
/// ```
pub fn settlement(contract: Contract, points: Teams<u16>) -> (bool, Teams<u32>) {
    let team = contract.team();
    let target = u32::from(contract.value());
    let ours = u32::from(points[team]);
    let theirs = u32::from(points[team.opponent()]);
    let mut delta = Teams::default();
    let reached = ours >= target;
    if reached {
        delta[team] = round_to_ten(ours) + target;
        delta[team.opponent()] = round_to_ten(theirs);
    } else {
        delta[team.opponent()] = FAILED_CONTRACT_POINTS + target;
    }
    (reached, delta)
}

/// A match in progress: auction, card play and the cumulative score.
///
/// All mutation goes through [`Game::update`]; a rejected action leaves the
/// game exactly as it was.
///
/// ```
/// use belote_rs::action::{Action, Event};
/// use belote_rs::cards::Suit;
/// use belote_rs::game::{Game, Phase};
/// use belote_rs::player::Player;
///
/// let mut game = Game::with_seed(7);
/// game.update(Action::Bid { player: Player::West, suit: Suit::Hearts, value: 80 }).unwrap();
/// for player in [Player::South, Player::East] {
///     game.update(Action::Pass { player }).unwrap();
/// }
/// let event = game.update(Action::Pass { player: Player::North }).unwrap();
/// assert!(matches!(event, Event::AuctionWon(_)));
/// assert_eq!(game.phase(), Phase::Playing);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    first_player: Player,
    auction: Auction,
    round: Round,
    score: Teams<u32>,
    rng: ChaCha8Rng,
    rounds_played: u32,
    redeals: u32,
    last_round: Option<RoundSummary>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let hands = deal_with(&mut rng);
        Self::build(hands, config.first_player, rng)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig { seed: Some(seed), ..GameConfig::default() })
    }

    /// Start from a fixed first deal; later deals come from `seed`.
    pub fn from_hands(hands: Seats<Vec<Card>>, first_player: Player, seed: u64) -> Self {
        Self::build(hands, first_player, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(hands: Seats<Vec<Card>>, first_player: Player, rng: ChaCha8Rng) -> Self {
        Self {
            phase: Phase::Auction,
            first_player,
            auction: Auction::new(first_player),
            round: Round::new(hands, first_player),
            score: Teams::default(),
            rng,
            rounds_played: 0,
            redeals: 0,
            last_round: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn first_player(&self) -> Player {
        self.first_player
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn score(&self) -> &Teams<u32> {
        &self.score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Auctions that closed without a bid.
    pub fn redeals(&self) -> u32 {
        self.redeals
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    /// The contract being played, once the auction is won.
    pub fn contract(&self) -> Option<Contract> {
        match self.phase {
            Phase::Playing => self.auction.contract(),
            Phase::Auction => None,
        }
    }

    /// The player expected to act next.
    pub fn to_move(&self) -> Player {
        match self.phase {
            Phase::Auction => self.auction.turn(),
            Phase::Playing => self.round.to_play(),
        }
    }

    /// Apply one action.
    ///
    /// Rejected actions leave the state untouched. When an internal invariant
    /// fails midway, the state from before the action is restored and the
    /// failure is logged together with that state.
    pub fn update(&mut self, action: Action) -> Result<Event, ActionError> {
        let before = self.clone();
        let result = self.apply(action);
        match &result {
            Ok(event) => debug!(%action, code = event.code(), "action applied"),
            Err(err) if err.kind() == ErrorKind::Internal => {
                *self = before;
                let snapshot = serde_json::to_string(&self.describe())
                    .unwrap_or_else(|e| format!("<snapshot unavailable: {e}>"));
                error!(%action, error = %err, %snapshot, "internal failure, state restored");
            }
            Err(err) => {
                warn!(%action, kind = ?err.kind(), code = err.kind().code(), error = %err, "action rejected")
            }
        }
        result
    }

    fn apply(&mut self, action: Action) -> Result<Event, ActionError> {
        match (self.phase, action) {
            (Phase::Auction, Action::Bid { player, suit, value }) => {
                self.auction.bid(player, Bid { suit, value })?;
                Ok(Event::Accepted)
            }
            (Phase::Auction, Action::Pass { player }) => match self.auction.pass(player)? {
                AuctionStatus::Continue => Ok(Event::Accepted),
                AuctionStatus::Won(contract) => {
                    self.round.set_trump(contract.trump());
                    self.phase = Phase::Playing;
                    info!(player = %contract.player, bid = %contract.bid, "auction won");
                    Ok(Event::AuctionWon(contract))
                }
                AuctionStatus::Failed => {
                    self.redeals += 1;
                    self.next_deal();
                    info!(first_player = %self.first_player, "nobody bid, dealing again");
                    Ok(Event::Redeal { first_player: self.first_player })
                }
            },
            (Phase::Playing, Action::PlayCard { player, card_index }) => {
                match self.round.play(player, card_index)? {
                    RoundStatus::Continue => Ok(Event::Accepted),
                    RoundStatus::TrickComplete(trick) => Ok(Event::TrickComplete(trick)),
                    RoundStatus::RoundComplete(trick) => {
                        let summary = self.settle()?;
                        self.next_deal();
                        Ok(Event::RoundComplete { trick, summary })
                    }
                }
            }
            (phase, action) => Err(ActionError::WrongPhase { action: action.label(), phase }),
        }
    }

    fn settle(&mut self) -> Result<RoundSummary, ActionError> {
        let contract = self.auction.contract().ok_or(InternalError::NoContract)?;
        let points = *self.round.points();
        let (contract_reached, delta) = settlement(contract, points);
        for team in Team::ALL {
            self.score[team] += delta[team];
        }
        self.rounds_played += 1;
        let summary = RoundSummary {
            round: self.rounds_played,
            contract,
            points,
            contract_reached,
            delta,
            belote: self.round.belote_holder(),
        };
        info!(
            round = summary.round,
            contract = %contract.bid,
            team = %contract.team(),
            reached = contract_reached,
            east_west = self.score[Team::EastWest],
            north_south = self.score[Team::NorthSouth],
            "round settled"
        );
        self.last_round = Some(summary);
        Ok(summary)
    }

    fn next_deal(&mut self) {
        self.first_player = self.first_player.next();
        self.auction.reset(self.first_player);
        let hands = deal_with(&mut self.rng);
        self.round.reset(hands, self.first_player);
        self.phase = Phase::Auction;
    }

    pub fn describe(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            first_player: self.first_player,
            to_move: self.to_move(),
            auction: self.auction.describe(),
            round: self.round.describe(),
            score: self.score,
            rounds_played: self.rounds_played,
            redeals: self.redeals,
            last_round: self.last_round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn pass(game: &mut Game, player: Player) -> Event {
        game.update(Action::Pass { player }).unwrap()
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_to_ten(84), 80);
        assert_eq!(round_to_ten(85), 90);
        assert_eq!(round_to_ten(0), 0);
        assert_eq!(round_to_ten(162), 160);
    }

    #[test]
    fn reached_contract_scores_rounded_points_plus_bid() {
        let contract = Contract { player: Player::West, bid: Bid { suit: Suit::Spades, value: 100 } };
        let (reached, delta) = settlement(contract, Teams::new(107, 55));
        assert!(reached);
        assert_eq!(delta[Team::EastWest], 110 + 100);
        assert_eq!(delta[Team::NorthSouth], 60);
    }

    #[test]
    fn failed_contract_goes_to_defenders() {
        let contract = Contract { player: Player::North, bid: Bid { suit: Suit::Clubs, value: 90 } };
        let (reached, delta) = settlement(contract, Teams::new(76, 86));
        assert!(!reached);
        assert_eq!(delta[Team::EastWest], 250);
        assert_eq!(delta[Team::NorthSouth], 0);
    }

    #[test]
    fn four_passes_redeal_and_rotate() {
        let mut game = Game::with_seed(3);
        let hands_before = game.describe().round.hands;
        for p in [Player::West, Player::South, Player::East] {
            assert_eq!(pass(&mut game, p), Event::Accepted);
        }
        let event = pass(&mut game, Player::North);
        assert_eq!(event, Event::Redeal { first_player: Player::South });
        assert_eq!(event.code(), 11);
        assert_eq!(game.phase(), Phase::Auction);
        assert_eq!(game.first_player(), Player::South);
        assert_eq!(game.to_move(), Player::South);
        assert_eq!(game.round().trick_opener(), Player::South);
        assert_eq!(game.redeals(), 1);
        assert_ne!(game.describe().round.hands, hands_before);
    }

    #[test]
    fn auction_win_sets_trump_and_starts_play() {
        let mut game = Game::with_seed(11);
        game.update(Action::Pass { player: Player::West }).unwrap();
        game.update(Action::Bid { player: Player::South, suit: Suit::Diamonds, value: 90 }).unwrap();
        pass(&mut game, Player::East);
        pass(&mut game, Player::North);
        let event = pass(&mut game, Player::West);
        let contract = Contract { player: Player::South, bid: Bid { suit: Suit::Diamonds, value: 90 } };
        assert_eq!(event, Event::AuctionWon(contract));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.round().trump(), Some(Suit::Diamonds));
        assert_eq!(game.contract(), Some(contract));
        // the first player of the deal leads the first trick
        assert_eq!(game.to_move(), Player::West);
    }

    #[test]
    fn wrong_phase_is_a_check_failure() {
        let mut game = Game::with_seed(5);
        let err = game.update(Action::PlayCard { player: Player::West, card_index: 0 }).unwrap_err();
        assert_eq!(err, ActionError::WrongPhase { action: "play", phase: Phase::Auction });
        assert_eq!(err.kind(), ErrorKind::Check);
    }

    #[test]
    fn rejected_bid_leaves_snapshot_unchanged() {
        let mut game = Game::with_seed(5);
        let before = game.describe();
        let err = game.update(Action::Bid { player: Player::West, suit: Suit::Hearts, value: 85 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(game.describe(), before);
    }

    #[test]
    fn full_round_settles_and_redeals() {
        let mut game = Game::with_seed(21);
        game.update(Action::Bid { player: Player::West, suit: Suit::Spades, value: 80 }).unwrap();
        for p in [Player::South, Player::East, Player::North] {
            pass(&mut game, p);
        }
        let mut summary = None;
        for _ in 0..32 {
            let snap = game.describe();
            let index = snap.legal_indices()[0];
            let event = game.update(Action::PlayCard { player: snap.to_move, card_index: index }).unwrap();
            if let Event::RoundComplete { summary: s, .. } = event {
                summary = Some(s);
            }
        }
        let summary = summary.unwrap();
        let total: u16 = summary.points.as_array().iter().sum();
        let expected = if summary.belote.is_some() { 182 } else { 162 };
        assert_eq!(total, expected);
        assert_eq!(game.phase(), Phase::Auction);
        assert_eq!(game.first_player(), Player::South);
        assert_eq!(game.rounds_played(), 1);
        assert_eq!(*game.score(), summary.delta);
        assert_eq!(game.last_round(), Some(&summary));
    }

    #[test]
    fn internal_failure_restores_the_previous_state() {
        let mut game = Game::with_seed(21);
        game.update(Action::Bid { player: Player::West, suit: Suit::Spades, value: 80 }).unwrap();
        for p in [Player::South, Player::East, Player::North] {
            pass(&mut game, p);
        }
        for _ in 0..31 {
            let snap = game.describe();
            let index = snap.legal_indices()[0];
            game.update(Action::PlayCard { player: snap.to_move, card_index: index }).unwrap();
        }
        // settlement of the last trick finds no contract
        game.auction = Auction::new(game.first_player);
        let before = game.describe();
        let snap = game.describe();
        let index = snap.legal_indices()[0];
        let err = game.update(Action::PlayCard { player: snap.to_move, card_index: index }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.kind().code(), 22);
        assert_eq!(game.describe(), before);
        assert_eq!(game.describe().round.hands[snap.to_move].len(), 1);
    }
}
