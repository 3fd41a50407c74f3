use crate::action::{ActionError, Event};
use crate::agents::{AgentKind, AgentTable, Intent, StrategyKind};
use crate::auction::{BID_STEP, MIN_BID};
use crate::cards::Suit;
use crate::game::{Game, GameConfig, Phase};
use crate::player::{Player, Team};
use crate::sim::DEFAULT_TARGET_SCORE;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The seat driven from the keyboard.
pub const HUMAN_SEAT: Player = Player::South;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    NewMatch,
    Pass,
    Bid,
    SuitNext,
    SuitPrev,
    ValueInc,
    ValueDec,
    /// Zero-based index into the human hand.
    PlayCard(usize),
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub game: Game,
    pub agents: AgentTable,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_bot_strategy: StrategyKind,
    pub cfg_target_score: u32,
    pub cfg_bot_delay_ms: u64,
    // Applied config
    pub bot_strategy: StrategyKind,
    pub target_score: u32,
    pub bot_delay_ms: u64,
    // Bid being composed by the human
    pub bid_suit: Suit,
    pub bid_value: u16,
    pub match_started: bool,
    winner: Option<Team>,
    log: VecDeque<String>,
    help_open: bool,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        let default_delay = 500;
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            game: Game::new(GameConfig::default()),
            agents: AgentTable::new(),
            menu_index: 0,
            cfg_bot_strategy: StrategyKind::default(),
            cfg_target_score: DEFAULT_TARGET_SCORE,
            cfg_bot_delay_ms: default_delay,
            bot_strategy: StrategyKind::default(),
            target_score: DEFAULT_TARGET_SCORE,
            bot_delay_ms: default_delay,
            bid_suit: Suit::Spades,
            bid_value: MIN_BID,
            match_started: false,
            winner: None,
            log: VecDeque::new(),
            help_open: false,
            action_error: None,
            action_error_at: None,
        }
    }
}

impl AppState {
    pub const LOG_LEN: usize = 12;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    /// Whether the keyboard seat may act right now.
    pub fn can_act(&self) -> bool {
        self.scene == Scene::Table
            && self.match_started
            && self.winner.is_none()
            && self.game.to_move() == HUMAN_SEAT
    }

    fn queue_intent(&mut self, intent: Intent) -> bool {
        if !self.can_act() {
            return false;
        }
        self.clear_action_error();
        self.agents.receive(HUMAN_SEAT, intent)
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    /// The team that won the current match, once it is over.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Recent table events, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == Self::LOG_LEN {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    pub fn bot_label(&self, seat: Player) -> Option<&'static str> {
        match self.agents.agent_kind(seat) {
            Some(AgentKind::Bot) => Some(self.bot_strategy.label()),
            _ => None,
        }
    }

    fn cycle_suit(&mut self, forward: bool) {
        let i = Suit::ALL.iter().position(|s| *s == self.bid_suit).unwrap_or(0);
        let n = Suit::ALL.len();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.bid_suit = Suit::ALL[next];
    }

    fn adjust_bid_value(&mut self, up: bool) {
        self.bid_value = if up {
            self.bid_value.saturating_add(BID_STEP)
        } else {
            self.bid_value.saturating_sub(BID_STEP).max(MIN_BID)
        };
    }

    // Keep the composed bid at or above what the auction accepts.
    fn sync_bid_value(&mut self) {
        if self.game.phase() == Phase::Auction {
            self.bid_value = self.bid_value.max(self.game.auction().min_next_bid());
        } else {
            self.bid_value = MIN_BID;
        }
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::NewMatch => {
                if self.scene == Scene::Table {
                    self.new_match();
                }
                false
            }
            InputAction::SuitNext => {
                self.cycle_suit(true);
                false
            }
            InputAction::SuitPrev => {
                self.cycle_suit(false);
                false
            }
            InputAction::ValueInc => {
                self.adjust_bid_value(true);
                false
            }
            InputAction::ValueDec => {
                self.adjust_bid_value(false);
                false
            }
            InputAction::Pass => self.queue_intent(Intent::Pass),
            InputAction::Bid => {
                self.queue_intent(Intent::Bid { suit: self.bid_suit, value: self.bid_value })
            }
            InputAction::PlayCard(idx) => self.queue_intent(Intent::Play(idx)),
        }
    }

    /// Start a fresh match with the applied settings. Ignored while one is in progress.
    pub fn new_match(&mut self) {
        if self.match_started && self.winner.is_none() {
            return;
        }
        self.game = Game::new(GameConfig::default());
        self.match_started = true;
        self.winner = None;
        self.bid_value = MIN_BID;
        self.clear_log();
        self.clear_action_error();
        self.push_log(format!("New match to {} points", self.target_score));
    }

    /// Drive whichever agent is due and record what happened.
    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table || !self.match_started || self.winner.is_some() {
            return;
        }
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        match self.agents.on_turn(&mut self.game) {
            Ok(Some((seat, event))) => {
                self.clear_action_error();
                self.record(seat, &event);
                self.sync_bid_value();
            }
            Ok(None) => {}
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &ActionError) {
        self.action_error = Some(err.to_string());
        self.action_error_at = Some(Instant::now());
    }

    fn record(&mut self, seat: Player, event: &Event) {
        match event {
            Event::Accepted if self.game.phase() == Phase::Auction => {
                let auction = self.game.auction();
                match auction.best_bid() {
                    Some(bid)
                        if auction.current_best() == Some(seat) && auction.passed_in_row() == 0 =>
                    {
                        self.push_log(format!("{seat} bids {bid}"));
                    }
                    _ => self.push_log(format!("{seat} passes")),
                }
            }
            Event::Accepted => {
                if let Some(card) = self.game.round().trick().card(seat) {
                    self.push_log(format!("{seat} plays {card}"));
                }
            }
            Event::AuctionWon(contract) => {
                self.push_log(format!("{seat} passes"));
                self.push_log(format!("{} takes the contract at {}", contract.player, contract.bid));
            }
            Event::Redeal { first_player } => {
                self.push_log(format!("{seat} passes"));
                self.push_log(format!("Nobody bid, dealing again; {first_player} speaks first"));
            }
            Event::TrickComplete(trick) => {
                self.push_log(format!("{seat} plays {}", trick.cards[seat]));
                self.push_log(format!(
                    "Trick {} to {} ({} pts)",
                    trick.index + 1,
                    trick.winner,
                    trick.points
                ));
            }
            Event::RoundComplete { trick, summary } => {
                self.push_log(format!("{seat} plays {}", trick.cards[seat]));
                let outcome = if summary.contract_reached { "made" } else { "failed" };
                self.push_log(format!(
                    "Round {}: contract {} {}; EW +{} NS +{}",
                    summary.round,
                    summary.contract.bid,
                    outcome,
                    summary.delta[Team::EastWest],
                    summary.delta[Team::NorthSouth]
                ));
                self.winner = self.game.describe().winner(self.target_score);
                if let Some(team) = self.winner {
                    self.push_log(format!("{team} win the match. Space for a new one"));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_table() -> AppState {
        let mut app = AppState { cfg_bot_delay_ms: 0, ..AppState::default() };
        app.apply_menu();
        app.new_match();
        app
    }

    #[test]
    fn input_ignored_before_turn() {
        let mut app = instant_table();
        // West speaks first
        assert_eq!(app.game.to_move(), Player::West);
        assert!(!app.handle_input(InputAction::Pass));
        assert!(!app.handle_input(InputAction::PlayCard(0)));
    }

    #[test]
    fn bots_play_until_the_human_is_due() {
        let mut app = instant_table();
        for _ in 0..4 {
            app.agents_on_turn();
            if app.game.to_move() == HUMAN_SEAT {
                break;
            }
        }
        assert_eq!(app.game.to_move(), HUMAN_SEAT);
        assert!(app.can_act());
        assert!(app.log().any(|l| l.starts_with("west")));
    }

    #[test]
    fn rejected_bid_reports_an_error() {
        let mut app = instant_table();
        app.agents_on_turn();
        assert!(app.can_act());
        app.bid_value = 85;
        assert!(app.handle_input(InputAction::Bid));
        app.agents_on_turn();
        assert!(app.action_error().is_some());
        assert_eq!(app.game.to_move(), HUMAN_SEAT);
    }

    #[test]
    fn bid_value_stays_above_the_floor() {
        let mut app = AppState::default();
        let _ = app.handle_input(InputAction::ValueDec);
        assert_eq!(app.bid_value, MIN_BID);
        let _ = app.handle_input(InputAction::ValueInc);
        assert_eq!(app.bid_value, MIN_BID + BID_STEP);
    }

    #[test]
    fn log_keeps_the_latest_lines() {
        let mut app = AppState::default();
        for i in 0..AppState::LOG_LEN + 3 {
            app.push_log(format!("line {i}"));
        }
        assert_eq!(app.log().count(), AppState::LOG_LEN);
        assert_eq!(app.log().next(), Some("line 3"));
    }
}
