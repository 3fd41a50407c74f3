use crate::agents::{AgentTable, BotAgent, BotProfile, HumanAgent};
use crate::game::{Game, GameConfig};
use crate::player::Player;

use super::{AppState, HUMAN_SEAT};

const TARGET_STEP: u32 = 500;
const DELAY_STEP_MS: u64 = 100;

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    BotStrategy,
    TargetScore,
    BotDelayMs,
}

const MENU_ITEMS: [MenuItem; 3] = [MenuItem::BotStrategy, MenuItem::TargetScore, MenuItem::BotDelayMs];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::BotStrategy => format!("Bot Strategy: {}", app.cfg_bot_strategy),
            MenuItem::TargetScore => format!("Target Score: {}", app.cfg_target_score),
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", app.cfg_bot_delay_ms),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::BotStrategy => app.cfg_bot_strategy = app.cfg_bot_strategy.cycle(),
            MenuItem::TargetScore => {
                app.cfg_target_score = app.cfg_target_score.saturating_add(TARGET_STEP);
            }
            MenuItem::BotDelayMs => {
                app.cfg_bot_delay_ms = app.cfg_bot_delay_ms.saturating_add(DELAY_STEP_MS);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::BotStrategy => app.cfg_bot_strategy = app.cfg_bot_strategy.cycle_back(),
            MenuItem::TargetScore => {
                app.cfg_target_score =
                    app.cfg_target_score.saturating_sub(TARGET_STEP).max(TARGET_STEP);
            }
            MenuItem::BotDelayMs => {
                app.cfg_bot_delay_ms = app.cfg_bot_delay_ms.saturating_sub(DELAY_STEP_MS);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.scene = match self.scene {
            super::Scene::Menu => super::Scene::Table,
            _ => {
                self.open_menu();
                super::Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.menu_index = 0;
        self.cfg_bot_strategy = self.bot_strategy;
        self.cfg_target_score = self.target_score;
        self.cfg_bot_delay_ms = self.bot_delay_ms;
        self.scene = super::Scene::Menu;
    }

    /// Seat the human at South and bots elsewhere; the match starts on Space.
    pub fn apply_menu(&mut self) {
        self.bot_strategy = self.cfg_bot_strategy;
        self.target_score = self.cfg_target_score.max(1);
        self.bot_delay_ms = self.cfg_bot_delay_ms;

        self.game = Game::new(GameConfig::default());
        self.agents = AgentTable::new();
        self.agents.set_min_action_delay_ms(self.bot_delay_ms);
        for seat in Player::ALL {
            if seat == HUMAN_SEAT {
                self.agents.set_agent(seat, Some(Box::new(HumanAgent::new())));
            } else {
                let profile = BotProfile::new(self.bot_strategy)
                    .with_delay_ms(self.bot_delay_ms, self.bot_delay_ms);
                self.agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
            }
        }
        self.match_started = false;
        self.clear_log();
        self.scene = super::Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = super::Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
