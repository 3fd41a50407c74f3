use belote_rs::action::{Action, Event};
use belote_rs::auction::{Bid, Contract};
use belote_rs::cards::{parse_cards, Suit};
use belote_rs::game::{settlement, Game, RoundSummary, FAILED_CONTRACT_POINTS};
use belote_rs::player::{Player, Seats, Team, Teams};

// One suit per seat: west holds every trump and takes all eight tricks.
fn one_suit_deal() -> Game {
    let hands = Seats::new(
        [
            "Js 9s As 10s Ks Qs 8s 7s",
            "Ah 10h Kh Qh Jh 9h 8h 7h",
            "Ad 10d Kd Qd Jd 9d 8d 7d",
            "Ac 10c Kc Qc Jc 9c 8c 7c",
        ]
        .map(|h| parse_cards(h).unwrap()),
    );
    Game::from_hands(hands, Player::West, 0)
}

fn play_out(game: &mut Game) -> RoundSummary {
    loop {
        let player = game.to_move();
        match game.update(Action::PlayCard { player, card_index: 0 }).unwrap() {
            Event::RoundComplete { summary, .. } => return summary,
            _ => continue,
        }
    }
}

#[test]
fn all_tricks_with_belote_total_182() {
    let mut game = one_suit_deal();
    game.update(Action::Bid { player: Player::West, suit: Suit::Spades, value: 80 }).unwrap();
    for player in [Player::South, Player::East, Player::North] {
        game.update(Action::Pass { player }).unwrap();
    }
    let summary = play_out(&mut game);

    assert_eq!(summary.belote, Some(Player::West));
    assert_eq!(summary.points, Teams::new(182, 0));
    assert!(summary.contract_reached);
    assert_eq!(summary.delta, Teams::new(180 + 80, 0));
    assert_eq!(*game.score(), Teams::new(260, 0));
}

#[test]
fn tricks_are_won_by_the_trump_holder() {
    let mut game = one_suit_deal();
    game.update(Action::Bid { player: Player::West, suit: Suit::Spades, value: 80 }).unwrap();
    for player in [Player::South, Player::East, Player::North] {
        game.update(Action::Pass { player }).unwrap();
    }
    let mut last = None;
    for _ in 0..4 {
        let player = game.to_move();
        last = Some(game.update(Action::PlayCard { player, card_index: 0 }).unwrap());
    }
    let Some(Event::TrickComplete(trick)) = last else { panic!("expected a completed trick") };
    assert_eq!(trick.index, 0);
    assert_eq!(trick.winner, Player::West);
    // Js, Ah, Ad, Ac
    assert_eq!(trick.points, 20 + 11 + 11 + 11);
    assert_eq!(game.to_move(), Player::West);
    assert_eq!(game.round().points()[Team::EastWest], 53);
}

#[test]
fn failed_contract_pays_defenders_160_plus_bid() {
    let contract = Contract { player: Player::East, bid: Bid { suit: Suit::Hearts, value: 120 } };
    let (reached, delta) = settlement(contract, Teams::new(110, 52));
    assert!(!reached);
    assert_eq!(delta[Team::NorthSouth], FAILED_CONTRACT_POINTS + 120);
    assert_eq!(delta[Team::EastWest], 0);
}

#[test]
fn exact_contract_value_is_reached() {
    let contract = Contract { player: Player::South, bid: Bid { suit: Suit::Clubs, value: 80 } };
    let (reached, delta) = settlement(contract, Teams::new(82, 80));
    assert!(reached);
    assert_eq!(delta[Team::NorthSouth], 80 + 80);
    assert_eq!(delta[Team::EastWest], 80);
}

#[test]
fn match_winner_needs_target_and_a_strict_lead() {
    let mut snap = Game::with_seed(1).describe();
    snap.score = Teams::new(2990, 1200);
    assert_eq!(snap.winner(3000), None);
    snap.score = Teams::new(3010, 1200);
    assert_eq!(snap.winner(3000), Some(Team::EastWest));
    snap.score = Teams::new(3100, 3200);
    assert_eq!(snap.winner(3000), Some(Team::NorthSouth));
    snap.score = Teams::new(3100, 3100);
    assert_eq!(snap.winner(3000), None);
}
