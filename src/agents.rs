//! Agents: pluggable seat controllers (bots, humans via a frontend).
//!
//! A [`PlayerAgent`] acts for one seat when the engine says it is that seat's
//! turn. [`AgentTable`] holds one optional agent per seat and drives whichever
//! one is due, so frontends stay thin and do not coordinate bots themselves.
//! Bots read the [`GameSnapshot`](crate::snapshot::GameSnapshot) only.

use crate::action::{Action, ActionError, Event};
use crate::cards::Suit;
use crate::engine::BeloteEngine;
use crate::player::{Player, Seats};
use core::fmt;
use std::time::{Duration, Instant};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// Seat-level action intents, typically produced by a UI for a human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Pass,
    Bid { suit: Suit, value: u16 },
    Play(usize),
}

impl Intent {
    pub fn into_action(self, player: Player) -> Action {
        match self {
            Intent::Pass => Action::Pass { player },
            Intent::Bid { suit, value } => Action::Bid { player, suit, value },
            Intent::Play(card_index) => Action::PlayCard { player, card_index },
        }
    }
}

/// A seat controller that can act for a player when it is their turn.
pub trait PlayerAgent {
    /// Called when `seat` may be due to act. Returns the event of the action
    /// taken, or `None` when the agent did not act (not its turn, waiting).
    fn on_turn(
        &mut self,
        engine: &mut dyn BeloteEngine,
        seat: Player,
    ) -> Result<Option<Event>, ActionError>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive a seat intent; default is to ignore and return false.
    fn receive(&mut self, _intent: Intent) -> bool {
        false
    }
}

mod bots;
mod expert;

pub use bots::{
    BotAgent, BotProfile, HighestCardStrategy, RandomStrategy, Strategy, StrategyKind,
    StrategyParseError,
};
pub use expert::ExpertStrategy;

/// Executes user-intended actions when it is their turn.
#[derive(Debug, Default)]
pub struct HumanAgent {
    pending: Option<Intent>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    fn receive(&mut self, intent: Intent) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(intent);
        true
    }
    fn on_turn(
        &mut self,
        engine: &mut dyn BeloteEngine,
        seat: Player,
    ) -> Result<Option<Event>, ActionError> {
        if engine.to_move() != seat {
            return Ok(None);
        }
        match self.pending.take() {
            Some(intent) => engine.update(intent.into_action(seat)).map(Some),
            None => Ok(None),
        }
    }
}

/// One optional agent per seat; drives the agent whose seat is to move.
pub struct AgentTable {
    seats: Seats<Option<Box<dyn PlayerAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .values()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(AgentKind::Human) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl Default for AgentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentTable {
    /// A table with all four seats empty.
    pub fn new() -> Self {
        Self {
            seats: Seats::from_fn(|_| None),
            min_action_delay: Duration::ZERO,
            next_action_at: None,
        }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: Player, agent: Option<Box<dyn PlayerAgent>>) {
        self.seats[seat] = agent;
    }

    pub fn agent_kind(&self, seat: Player) -> Option<AgentKind> {
        self.seats[seat].as_deref().map(|ag| ag.kind())
    }

    /// Send an intent to a specific seat agent, if any.
    pub fn receive(&mut self, seat: Player, intent: Intent) -> bool {
        match self.seats[seat].as_mut() {
            Some(agent) => agent.receive(intent),
            None => false,
        }
    }

    /// Whether any bot agents are assigned.
    pub fn any_bots(&self) -> bool {
        self.seats.values().filter_map(|a| a.as_deref()).any(|ag| ag.kind() == AgentKind::Bot)
    }

    /// Set a global minimum delay between bot actions at the table.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Drive the agent assigned to the seat to move, if any.
    pub fn on_turn(
        &mut self,
        engine: &mut dyn BeloteEngine,
    ) -> Result<Option<(Player, Event)>, ActionError> {
        let seat = engine.to_move();
        let Some(agent) = self.seats[seat].as_mut() else {
            return Ok(None);
        };
        let now = Instant::now();
        if agent.kind() == AgentKind::Bot {
            if let Some(next) = self.next_action_at {
                if now < next {
                    return Ok(None);
                }
            }
        }
        let event = agent.on_turn(engine, seat)?;
        if event.is_some() && self.min_action_delay > Duration::ZERO {
            self.next_action_at = Some(now + self.min_action_delay);
        }
        Ok(event.map(|e| (seat, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, Phase};

    #[test]
    fn human_acts_only_on_own_turn() {
        let mut game = Game::with_seed(1);
        let mut human = HumanAgent::new();
        assert!(human.receive(Intent::Pass));
        assert!(!human.receive(Intent::Pass), "one pending intent at a time");
        // West speaks first; South must wait
        assert_eq!(human.on_turn(&mut game, Player::South).unwrap(), None);
        assert_eq!(game.to_move(), Player::West);

        assert_eq!(human.on_turn(&mut game, Player::West).unwrap(), Some(Event::Accepted));
        assert_eq!(game.to_move(), Player::South);
    }

    #[test]
    fn table_drives_bots_through_a_round() {
        let mut game = Game::with_seed(9);
        let mut table = AgentTable::new();
        for (i, p) in Player::ALL.into_iter().enumerate() {
            let profile = BotProfile::new(StrategyKind::HighestCard).with_seed(i as u64);
            table.set_agent(p, Some(Box::new(BotAgent::new(profile))));
        }
        assert!(table.any_bots());
        let mut rounds = 0;
        for _ in 0..2000 {
            if let Some((_, Event::RoundComplete { .. })) = table.on_turn(&mut game).unwrap() {
                rounds += 1;
                break;
            }
        }
        assert_eq!(rounds, 1);
        assert_eq!(game.phase(), Phase::Auction);
    }

    #[test]
    fn empty_seat_does_nothing() {
        let mut game = Game::with_seed(2);
        let mut table = AgentTable::new();
        assert_eq!(table.on_turn(&mut game).unwrap(), None);
        assert_eq!(format!("{table:?}"), "AgentTable(----)");
    }
}
