//! belote-rs: Belote rules engine
//!
//! Goals:
//! - One entry point: feed an [`Action`](action::Action), get an [`Event`](action::Event) or a typed error
//! - Rejected actions never change the game
//! - Read-only snapshots for bots, loggers and frontends
//! - Deterministic deals from a seed
//!
//! ## Quick start: bid and play a card
//! ```
//! use belote_rs::action::{Action, ErrorKind, Event};
//! use belote_rs::cards::Suit;
//! use belote_rs::game::{Game, Phase};
//! use belote_rs::player::Player;
//!
//! let mut game = Game::with_seed(7);
//! assert_eq!(game.to_move(), Player::West);
//!
//! game.update(Action::Bid { player: Player::West, suit: Suit::Hearts, value: 80 }).unwrap();
//! for player in [Player::South, Player::East] {
//!     game.update(Action::Pass { player }).unwrap();
//! }
//! let event = game.update(Action::Pass { player: Player::North }).unwrap();
//! assert!(matches!(event, Event::AuctionWon(_)));
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! // auction actions during card play are rejected and change nothing
//! let before = game.describe();
//! let err = game.update(Action::Pass { player: Player::West }).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Check);
//! assert_eq!(game.describe(), before);
//!
//! let snapshot = game.describe();
//! let first = snapshot.legal_indices()[0];
//! game.update(Action::PlayCard { player: snapshot.to_move, card_index: first }).unwrap();
//! ```
//!
//! ## Binaries
//! Play against bots in the terminal:
//! ```sh
//! cargo run --bin belote
//! ```
//! Run a batch of bot matches and write CSV logs:
//! ```sh
//! cargo run --bin belote-sim -- --games 100 --seed 1 --show-output
//! ```

pub mod action;
pub mod agents;
pub mod auction;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod player;
pub mod round;
pub mod sim;
pub mod snapshot;
pub mod trick;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
