use belote_rs::auction::MIN_BID;
use belote_rs::cards::Suit;
use belote_rs::tui::app::{AppState, InputAction, Scene, HUMAN_SEAT};

fn setup_table_app() -> AppState {
    let mut app = AppState::default();
    app.cfg_bot_delay_ms = 0;
    app.apply_menu();
    app
}

#[test]
fn menu_navigation_and_apply() {
    let mut app = AppState::default();
    assert!(matches!(app.scene, Scene::Menu));
    let start = app.menu_index;
    let _ = app.handle_input(InputAction::MenuNext);
    assert_ne!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuPrev);
    assert_eq!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuApply);
    assert!(matches!(app.scene, Scene::Table));
    assert!(!app.match_started);
}

#[test]
fn menu_adjusts_target_and_strategy() {
    let mut app = AppState::default();
    let strategy = app.cfg_bot_strategy;
    let _ = app.handle_input(InputAction::MenuInc);
    assert_ne!(app.cfg_bot_strategy, strategy);
    let _ = app.handle_input(InputAction::MenuNext);
    let target = app.cfg_target_score;
    let _ = app.handle_input(InputAction::MenuInc);
    assert!(app.cfg_target_score > target);
    let _ = app.handle_input(InputAction::MenuApply);
    assert_eq!(app.target_score, target + 500);
    assert_ne!(app.bot_strategy, strategy);
}

#[test]
fn help_toggle() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(!app.help_open());
}

#[test]
fn bid_composer_cycles_suits() {
    let mut app = setup_table_app();
    assert_eq!(app.bid_suit, Suit::Spades);
    let _ = app.handle_input(InputAction::SuitNext);
    assert_eq!(app.bid_suit, Suit::Hearts);
    let _ = app.handle_input(InputAction::SuitPrev);
    let _ = app.handle_input(InputAction::SuitPrev);
    assert_eq!(app.bid_suit, Suit::Clubs);
    let _ = app.handle_input(InputAction::ValueInc);
    assert_eq!(app.bid_value, MIN_BID + 10);
}

#[test]
fn nothing_happens_before_the_match_starts() {
    let mut app = setup_table_app();
    let before = app.game.describe();
    app.agents_on_turn();
    assert_eq!(app.game.describe(), before);
    assert!(!app.handle_input(InputAction::Pass));
}

#[test]
fn human_pass_is_applied_on_its_turn() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::NewMatch);
    assert!(app.match_started);
    // west (bot) speaks first
    app.agents_on_turn();
    assert_eq!(app.game.to_move(), HUMAN_SEAT);
    assert!(app.handle_input(InputAction::Pass));
    app.agents_on_turn();
    assert_ne!(app.game.to_move(), HUMAN_SEAT);
    assert!(app.log().any(|l| l == "south passes"));
}

#[test]
fn menu_round_trip_keeps_the_match() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::NewMatch);
    let before = app.game.describe();
    let _ = app.handle_input(InputAction::ToggleMenu);
    assert!(matches!(app.scene, Scene::Menu));
    let _ = app.handle_input(InputAction::MenuCancel);
    assert!(matches!(app.scene, Scene::Table));
    assert_eq!(app.game.describe(), before);
}
