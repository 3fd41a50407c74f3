use belote_rs::action::Event;
use belote_rs::agents::{BotAgent, BotProfile, PlayerAgent, Strategy, StrategyKind};
use belote_rs::game::{Game, Phase};
use belote_rs::player::Player;

#[test]
fn bot_waits_when_it_is_not_its_seat() {
    let mut g = Game::with_seed(3);
    let before = g.describe();
    let mut bot = BotAgent::new(BotProfile::new(StrategyKind::Random).with_seed(1));
    assert_eq!(bot.on_turn(&mut g, Player::East).unwrap(), None);
    assert_eq!(g.describe(), before);
}

#[test]
fn bot_acts_for_the_seat_to_move() {
    let mut g = Game::with_seed(3);
    let mut bot = BotAgent::new(BotProfile::new(StrategyKind::HighestCard).with_seed(1));
    assert_eq!(bot.strategy_name(), StrategyKind::HighestCard.label());
    let event = bot.on_turn(&mut g, Player::West).unwrap();
    assert_eq!(event, Some(Event::Accepted));
    assert_eq!(g.to_move(), Player::South);
}

#[test]
fn strategies_only_choose_accepted_actions() {
    for kind in StrategyKind::ALL {
        let mut g = Game::with_seed(17);
        let mut strategies: Vec<Box<dyn Strategy>> =
            (0..4).map(|i| kind.build(Some(100 + i))).collect();
        let mut rounds = 0;
        for _ in 0..5_000 {
            let snap = g.describe();
            let action = strategies[snap.to_move.index()].decide(&snap);
            // every decision must pass validation
            if let Event::RoundComplete { .. } = g.update(action).unwrap() {
                rounds += 1;
                if rounds == 3 {
                    break;
                }
            }
        }
        assert_eq!(rounds, 3, "{kind} did not finish three rounds");
        assert_eq!(g.phase(), Phase::Auction);
    }
}

#[test]
fn seeded_bots_repeat_their_choices() {
    let run = || {
        let mut g = Game::with_seed(5);
        let mut s = StrategyKind::Random.build(Some(9));
        let mut actions = Vec::new();
        for _ in 0..40 {
            let snap = g.describe();
            let action = s.decide(&snap);
            actions.push(action);
            g.update(action).unwrap();
        }
        actions
    };
    assert_eq!(run(), run());
}

#[test]
fn expert_bot_ignores_the_seed() {
    let run = |seed| {
        let mut g = Game::with_seed(21);
        let mut bot = BotAgent::new(BotProfile::new(StrategyKind::Expert).with_seed(seed));
        assert_eq!(bot.strategy_name(), "expert");
        let mut actions = Vec::new();
        for _ in 0..12 {
            let seat = g.to_move();
            bot.on_turn(&mut g, seat).unwrap();
            actions.push(g.describe());
        }
        actions
    };
    assert_eq!(run(1), run(2));
}
