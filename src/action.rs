//! Actions submitted to [`Game::update`](crate::game::Game::update), their
//! successful outcomes, and the failure taxonomy.

use crate::auction::Contract;
use crate::cards::{Card, Suit};
use crate::game::{Phase, RoundSummary};
use crate::player::Player;
use crate::round::CompletedTrick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Bid { player: Player, suit: Suit, value: u16 },
    Pass { player: Player },
    PlayCard { player: Player, card_index: usize },
}

impl Action {
    pub const fn player(&self) -> Player {
        match *self {
            Action::Bid { player, .. } | Action::Pass { player } | Action::PlayCard { player, .. } => {
                player
            }
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Action::Bid { .. } => "bid",
            Action::Pass { .. } => "pass",
            Action::PlayCard { .. } => "play",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bid { player, suit, value } => write!(f, "{player} bids {value} on {suit}"),
            Action::Pass { player } => write!(f, "{player} passes"),
            Action::PlayCard { player, card_index } => {
                write!(f, "{player} plays card #{card_index}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Bid,
    Pass,
    Play,
}

/// Loosely-typed action as it arrives from a request layer: every field is
/// optional and only the ones required by `kind` are checked.
///
/// ```
/// use belote_rs::action::{Action, ActionError, ActionKind, ActionRequest, ErrorKind};
/// use belote_rs::player::Player;
///
/// let req = ActionRequest { player: Some(Player::West), kind: Some(ActionKind::Bid), ..Default::default() };
/// let err = Action::try_from(req).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Check);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub player: Option<Player>,
    pub kind: Option<ActionKind>,
    #[serde(default)]
    pub suit: Option<Suit>,
    #[serde(default)]
    pub value: Option<u16>,
    #[serde(default)]
    pub card_index: Option<usize>,
}

impl TryFrom<ActionRequest> for Action {
    type Error = ActionError;

    fn try_from(req: ActionRequest) -> Result<Self, Self::Error> {
        let player = req.player.ok_or(ActionError::MissingField("player"))?;
        let kind = req.kind.ok_or(ActionError::MissingField("kind"))?;
        Ok(match kind {
            ActionKind::Pass => Action::Pass { player },
            ActionKind::Bid => Action::Bid {
                player,
                suit: req.suit.ok_or(ActionError::MissingField("suit"))?,
                value: req.value.ok_or(ActionError::MissingField("value"))?,
            },
            ActionKind::Play => Action::PlayCard {
                player,
                card_index: req.card_index.ok_or(ActionError::MissingField("card_index"))?,
            },
        })
    }
}

/// Successful outcome of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// The action was applied and play continues in the same phase.
    Accepted,
    /// The auction closed on a contract; card play starts.
    AuctionWon(Contract),
    /// Four passes without a bid; cards were dealt again.
    Redeal { first_player: Player },
    /// A trick other than the last one was completed.
    TrickComplete(CompletedTrick),
    /// The last trick was played and the contract settled; a new deal follows.
    RoundComplete { trick: CompletedTrick, summary: RoundSummary },
}

impl Event {
    /// Numeric outcome code used in logs.
    pub const fn code(&self) -> u8 {
        match self {
            Event::Accepted => 0,
            Event::AuctionWon(_) => 10,
            Event::Redeal { .. } => 11,
            Event::TrickComplete(_) => 15,
            Event::RoundComplete { .. } => 16,
        }
    }
}

/// Failure families reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The action is malformed or does not fit the current phase.
    Check,
    /// The action breaks a game rule.
    Validation,
    /// An engine invariant failed while applying a valid action.
    Internal,
}

impl ErrorKind {
    pub const fn code(self) -> u8 {
        match self {
            ErrorKind::Check => 20,
            ErrorKind::Validation => 21,
            ErrorKind::Internal => 22,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("cannot {action} during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("out of turn: expected {expected}, got {got}")]
    OutOfTurn { expected: Player, got: Player },
    #[error("bid must be a multiple of {step}, got {got}")]
    BidNotMultiple { step: u16, got: u16 },
    #[error("bid too low: min {min}, got {got}")]
    BidTooLow { min: u16, got: u16 },
    /// A validation failure rather than a check failure: the request is well
    /// formed, but the index does not fit the hand of the player to move.
    #[error("card index {index} is out of range for a hand of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },
    #[error("must follow {led}, got {card}")]
    MustFollowSuit { led: Suit, card: Card },
    #[error("must play trump ({trump}), got {card}")]
    MustPlayTrump { trump: Suit, card: Card },
    #[error("must beat the leading trump {leading}, got {card}")]
    MustOvertrump { leading: Card, card: Card },
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl ActionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ActionError::MissingField(_) | ActionError::WrongPhase { .. } => ErrorKind::Check,
            ActionError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}

/// Engine invariants that valid actions should never break.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InternalError {
    #[error("trump suit is not set during card play")]
    TrumpNotSet,
    #[error("completed trick has no leader")]
    NoTrickLeader,
    #[error("trick closed with an empty slot")]
    IncompleteTrick,
    #[error("round completed without a contract")]
    NoContract,
    #[error("trick index {0} is past the last trick")]
    TrickOverflow(u8),
    #[error("hand of {player} lost track of card #{index}")]
    HandOutOfSync { player: Player, index: usize },
}
