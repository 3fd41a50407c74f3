//! Batch experiment harness.
//!
//! Plays whole matches between strategies, one per seat, and records every
//! auction action and every card play as flat rows for later analysis. A
//! match ends once a team reaches the target score with the strictly higher
//! total.

use crate::action::{Action, ActionError, Event};
use crate::agents::{Strategy, StrategyKind};
use crate::cards::{Card, Suit};
use crate::game::{Game, GameConfig, Phase};
use crate::player::{Player, Seats, Team};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod output;

pub use output::{OutputFormat, OutputWriter};

/// Score at which a simulated match ends.
pub const DEFAULT_TARGET_SCORE: u32 = 3000;
/// Guard against a match that never ends (e.g. bots that never bid).
pub const DEFAULT_MAX_ACTIONS: u32 = 200_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub games: u32,
    pub target_score: u32,
    /// Base seed; game `n` deals from `seed + n` and each seat's strategy gets
    /// its own derived stream.
    pub seed: Option<u64>,
    pub strategies: Seats<StrategyKind>,
    pub max_actions: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            games: 1,
            target_score: DEFAULT_TARGET_SCORE,
            seed: None,
            strategies: Seats::new([StrategyKind::Random; 4]),
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SimError {
    #[error("engine rejected a bot action: {0}")]
    Engine(#[from] ActionError),
    #[error("game {game_id} did not finish within {limit} actions")]
    ActionLimit { game_id: u32, limit: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One row per experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRow {
    pub experiment_id: String,
    pub games: u32,
    pub target_score: u32,
    pub seed: Option<u64>,
    pub west_agent: String,
    pub south_agent: String,
    pub east_agent: String,
    pub north_agent: String,
}

impl ConfigRow {
    pub fn new(experiment_id: &str, config: &SimConfig) -> Self {
        let agent = |p: Player| config.strategies[p].label().to_string();
        Self {
            experiment_id: experiment_id.to_string(),
            games: config.games,
            target_score: config.target_score,
            seed: config.seed,
            west_agent: agent(Player::West),
            south_agent: agent(Player::South),
            east_agent: agent(Player::East),
            north_agent: agent(Player::North),
        }
    }
}

/// One row per bid or pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRow {
    pub experiment_id: String,
    pub game_id: u32,
    pub round_id: u32,
    pub player: Player,
    pub action_code: u8,
    pub action: String,
    pub color: Option<Suit>,
    pub value: Option<u16>,
    /// The bidder's hand when speaking.
    pub cards: String,
}

/// One row per card played. Trick, round and game outcome columns are filled
/// on the row that ended them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickRow {
    pub experiment_id: String,
    pub game_id: u32,
    pub round_id: u32,
    pub trick_id: u8,
    pub player: Player,
    pub trick_position: u8,
    pub action_code: u8,
    pub card: Card,
    pub is_last_in_trick: bool,
    pub trick_winner: Option<Player>,
    pub trick_points: Option<u16>,
    pub is_last_in_round: bool,
    pub contract_reached: Option<bool>,
    pub contract: Option<u16>,
    #[serde(rename = "east/west_points")]
    pub east_west_points: Option<u32>,
    #[serde(rename = "north/south_points")]
    pub north_south_points: Option<u32>,
    pub is_last_in_game: bool,
    pub game_winners: Option<Team>,
    #[serde(rename = "east/west_score")]
    pub east_west_score: Option<u32>,
    #[serde(rename = "north/south_score")]
    pub north_south_score: Option<u32>,
}

/// Final state of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub experiment_id: String,
    pub game_id: u32,
    pub seed: Option<u64>,
    pub winner: Team,
    pub east_west_score: u32,
    pub north_south_score: u32,
    pub rounds: u32,
    pub redeals: u32,
    pub actions: u32,
}

/// Everything recorded while playing one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLog {
    pub auctions: Vec<AuctionRow>,
    pub tricks: Vec<TrickRow>,
    pub summary: MatchSummary,
}

fn strategy_seed(seed: Option<u64>, player: Player) -> Option<u64> {
    seed.map(|s| s.wrapping_mul(31).wrapping_add(player.index() as u64 + 1))
}

fn hand_text(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}

/// Play match `game_id` of an experiment to the end.
pub fn run_match(config: &SimConfig, experiment_id: &str, game_id: u32) -> Result<MatchLog, SimError> {
    let seed = config.seed.map(|s| s.wrapping_add(u64::from(game_id)));
    let mut game = Game::new(GameConfig { first_player: Player::West, seed });
    let mut strategies: Seats<Box<dyn Strategy>> =
        Seats::from_fn(|p| config.strategies[p].build(strategy_seed(seed, p)));

    let mut auctions = Vec::new();
    let mut tricks = Vec::new();
    let mut round_id = 0;
    let mut actions = 0;

    let winner = loop {
        if actions >= config.max_actions {
            return Err(SimError::ActionLimit { game_id, limit: config.max_actions });
        }
        let snapshot = game.describe();
        let player = snapshot.to_move;
        let action = strategies[player].decide(&snapshot);
        let event = game.update(action)?;
        actions += 1;

        match (snapshot.phase, action) {
            (Phase::Auction, _) => {
                let (color, value) = match action {
                    Action::Bid { suit, value, .. } => (Some(suit), Some(value)),
                    _ => (None, None),
                };
                auctions.push(AuctionRow {
                    experiment_id: experiment_id.to_string(),
                    game_id,
                    round_id,
                    player,
                    action_code: event.code(),
                    action: action.label().to_string(),
                    color,
                    value,
                    cards: hand_text(snapshot.hand(player)),
                });
            }
            (Phase::Playing, Action::PlayCard { card_index, .. }) => {
                let mut row = TrickRow {
                    experiment_id: experiment_id.to_string(),
                    game_id,
                    round_id,
                    trick_id: snapshot.round.trick_index,
                    player,
                    trick_position: snapshot.round.trick.cards.values().flatten().count() as u8,
                    action_code: event.code(),
                    card: snapshot.hand(player)[card_index],
                    is_last_in_trick: false,
                    trick_winner: None,
                    trick_points: None,
                    is_last_in_round: false,
                    contract_reached: None,
                    contract: None,
                    east_west_points: None,
                    north_south_points: None,
                    is_last_in_game: false,
                    game_winners: None,
                    east_west_score: None,
                    north_south_score: None,
                };
                let mut finished = None;
                match &event {
                    Event::TrickComplete(trick) => {
                        row.is_last_in_trick = true;
                        row.trick_winner = Some(trick.winner);
                        row.trick_points = Some(trick.points);
                    }
                    Event::RoundComplete { trick, summary } => {
                        row.is_last_in_trick = true;
                        row.trick_winner = Some(trick.winner);
                        row.trick_points = Some(trick.points);
                        row.is_last_in_round = true;
                        row.contract_reached = Some(summary.contract_reached);
                        row.contract = Some(summary.contract.value());
                        row.east_west_points = Some(summary.delta[Team::EastWest]);
                        row.north_south_points = Some(summary.delta[Team::NorthSouth]);
                        debug!(game_id, round_id, reached = summary.contract_reached, "round complete");
                        round_id += 1;
                        finished = game.describe().winner(config.target_score);
                        if let Some(team) = finished {
                            row.is_last_in_game = true;
                            row.game_winners = Some(team);
                            row.east_west_score = Some(game.score()[Team::EastWest]);
                            row.north_south_score = Some(game.score()[Team::NorthSouth]);
                        }
                    }
                    _ => {}
                }
                tricks.push(row);
                if let Some(team) = finished {
                    break team;
                }
            }
            (Phase::Playing, _) => {}
        }
    };

    let score = *game.score();
    let summary = MatchSummary {
        experiment_id: experiment_id.to_string(),
        game_id,
        seed,
        winner,
        east_west_score: score[Team::EastWest],
        north_south_score: score[Team::NorthSouth],
        rounds: game.rounds_played(),
        redeals: game.redeals(),
        actions,
    };
    info!(game_id, winner = %winner, rounds = summary.rounds, actions, "match finished");
    Ok(MatchLog { auctions, tricks, summary })
}
