// Engine API boundary. Agents, the TUI and the batch harness drive a match
// through this trait: one action in, one event or error out, and snapshots
// for everything they need to read. It is implemented for the core `Game`.

use crate::action::{Action, ActionError, Event};
use crate::game::{Game, Phase};
use crate::player::{Player, Teams};
use crate::snapshot::GameSnapshot;

pub trait BeloteEngine {
    // Actions
    fn update(&mut self, action: Action) -> Result<Event, ActionError>;

    // Queries
    fn describe(&self) -> GameSnapshot;
    fn phase(&self) -> Phase;
    fn to_move(&self) -> Player;
    fn score(&self) -> Teams<u32>;
}

impl BeloteEngine for Game {
    fn update(&mut self, action: Action) -> Result<Event, ActionError> {
        self.update(action)
    }

    fn describe(&self) -> GameSnapshot {
        self.describe()
    }
    fn phase(&self) -> Phase {
        self.phase()
    }
    fn to_move(&self) -> Player {
        self.to_move()
    }
    fn score(&self) -> Teams<u32> {
        *self.score()
    }
}
