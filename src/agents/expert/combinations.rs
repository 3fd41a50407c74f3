//! Hand patterns behind the expert bidder.
//!
//! A [`MainCombination`] opens a bid at [`MIN_BID`] in the suit where its
//! trigger is found and adds the points of each matching [`Bonus`]. Support
//! tables score a hand for raising the partner's suit instead.

use crate::auction::MIN_BID;
use crate::cards::Rank::{self, Ace, Eight, Jack, King, Nine, Queen, Seven, Ten};
use crate::cards::{Card, Suit};

/// Slots that must all be present; each slot lists interchangeable ranks.
///
/// A single slot with several ranks counts every rank found instead.
pub(crate) type Pattern = &'static [&'static [Rank]];

#[derive(Debug, Clone, Copy)]
pub(crate) enum Value {
    Each(u16),
    Capped { each: u16, max: u16 },
    /// Points keyed by the number of detections; other counts score nothing.
    ByCount(&'static [(usize, u16)]),
}

impl Value {
    fn score(self, detections: usize) -> u16 {
        match self {
            Value::Each(each) => each * detections as u16,
            Value::Capped { each, max } => (each * detections as u16).min(max),
            Value::ByCount(table) => {
                table.iter().find(|(n, _)| *n == detections).map_or(0, |(_, points)| *points)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Bonus {
    pub pattern: Pattern,
    /// Look in the trump suit, or in the three other suits.
    pub trump: bool,
    pub value: Value,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MainCombination {
    pub trigger: Pattern,
    pub bonus: &'static [Bonus],
}

const fn trump_bonus(pattern: Pattern, value: Value) -> Bonus {
    Bonus { pattern, trump: true, value }
}

const SIDE_ACES: Bonus =
    Bonus { pattern: &[&[Ace]], trump: false, value: Value::ByCount(&[(1, 10), (2, 10), (3, 20)]) };
const SIDE_TEN_ACE: Bonus =
    Bonus { pattern: &[&[Ten], &[Ace]], trump: false, value: Value::Capped { each: 10, max: 10 } };
const QUEEN_KING: Bonus = trump_bonus(&[&[Queen], &[King]], Value::Each(20));

pub(crate) const MAIN_COMBINATIONS: &[MainCombination] = &[
    MainCombination {
        trigger: &[&[Jack], &[Nine]],
        bonus: &[
            trump_bonus(&[&[Ace, Ten, King, Queen]], Value::Capped { each: 10, max: 30 }),
            trump_bonus(&[&[King], &[Queen]], Value::Each(10)),
            trump_bonus(&[&[Eight], &[Seven]], Value::Each(10)),
            SIDE_ACES,
            SIDE_TEN_ACE,
        ],
    },
    MainCombination {
        trigger: &[&[Jack], &[Ace], &[Eight, Seven]],
        bonus: &[
            trump_bonus(&[&[Ten, King, Queen]], Value::Capped { each: 10, max: 20 }),
            trump_bonus(&[&[King], &[Queen]], Value::Each(10)),
            trump_bonus(&[&[Seven], &[Eight]], Value::Each(10)),
            SIDE_ACES,
            SIDE_TEN_ACE,
        ],
    },
    MainCombination {
        trigger: &[&[Jack], &[Ten], &[King, Queen]],
        bonus: &[QUEEN_KING, trump_bonus(&[&[Seven, Eight]], Value::Each(10)), SIDE_ACES],
    },
    MainCombination { trigger: &[&[Jack], &[Ten], &[Eight], &[Seven]], bonus: &[SIDE_ACES] },
    MainCombination {
        trigger: &[&[Jack], &[King], &[Queen]],
        bonus: &[trump_bonus(&[&[Seven, Eight]], Value::Each(10)), SIDE_ACES],
    },
    MainCombination {
        trigger: &[&[Jack], &[King, Queen], &[Eight], &[Seven]],
        bonus: &[QUEEN_KING, SIDE_ACES],
    },
    MainCombination {
        trigger: &[&[Nine], &[Ace], &[Ten]],
        bonus: &[
            trump_bonus(&[&[King, Queen]], Value::ByCount(&[(1, 10), (2, 30)])),
            trump_bonus(&[&[Seven], &[Eight]], Value::Each(10)),
            SIDE_ACES,
        ],
    },
    MainCombination {
        trigger: &[&[Nine], &[Ace], &[King, Queen]],
        bonus: &[QUEEN_KING, trump_bonus(&[&[Seven], &[Eight]], Value::Each(10)), SIDE_ACES],
    },
    MainCombination {
        trigger: &[&[Nine], &[Ace], &[Eight], &[Seven]],
        bonus: &[SIDE_ACES, SIDE_TEN_ACE],
    },
    MainCombination { trigger: &[&[Nine], &[Ten], &[Eight], &[Seven]], bonus: &[SIDE_ACES] },
    MainCombination {
        trigger: &[&[Ace], &[Ten], &[King, Queen], &[Eight], &[Seven]],
        bonus: &[QUEEN_KING, SIDE_ACES, SIDE_TEN_ACE],
    },
    MainCombination {
        trigger: &[&[Ten], &[King], &[Queen], &[Eight], &[Seven]],
        bonus: &[Bonus {
            pattern: &[&[Ace]],
            trump: false,
            value: Value::Capped { each: 10, max: 10 },
        }],
    },
];

/// Raising a partner who bid the suit.
pub(crate) const SUPPORT: &[Bonus] = &[
    trump_bonus(&[&[Jack]], Value::Each(20)),
    trump_bonus(&[&[Nine]], Value::Each(10)),
    QUEEN_KING,
    Bonus { pattern: &[&[Ace]], trump: false, value: Value::ByCount(&[(2, 10), (3, 20)]) },
];

/// Raising a partner who is being outbid by the opponents.
pub(crate) const AGGRESSIVE_SUPPORT: &[Bonus] = &[
    trump_bonus(&[&[Jack]], Value::Each(20)),
    trump_bonus(&[&[Nine, Ten, Ace]], Value::Each(10)),
    QUEEN_KING,
    Bonus { pattern: &[&[Ace]], trump: false, value: Value::Each(10) },
];

/// Suits in the order bids are searched; the first best score wins ties.
const SEARCH_ORDER: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

/// Number of times `pattern` is found in `hand`, looking in `trump` when
/// `on_trump` is set and in every other suit otherwise.
pub(crate) fn detect(pattern: Pattern, hand: &[Card], trump: Suit, on_trump: bool) -> usize {
    Suit::ALL
        .into_iter()
        .filter(|&suit| (suit == trump) == on_trump)
        .map(|suit| {
            let held = |rank| hand.contains(&Card::new(rank, suit));
            match pattern {
                [ranks] if ranks.len() > 1 => ranks.iter().filter(|&&r| held(r)).count(),
                slots => usize::from(slots.iter().all(|ranks| ranks.iter().any(|&r| held(r)))),
            }
        })
        .sum()
}

fn bonus_score(bonus: &[Bonus], hand: &[Card], trump: Suit) -> u16 {
    bonus.iter().map(|b| b.value.score(detect(b.pattern, hand, trump, b.trump))).sum()
}

/// The suit and value the hand can open with, if any combination triggers.
///
/// Within a suit the first triggered combination that improves on the best
/// score so far is kept.
pub(crate) fn best_suit_bid(hand: &[Card]) -> Option<(Suit, u16)> {
    let mut best: Option<(Suit, u16)> = None;
    for suit in SEARCH_ORDER {
        for combination in MAIN_COMBINATIONS {
            if detect(combination.trigger, hand, suit, true) != 1 {
                continue;
            }
            let score = MIN_BID + bonus_score(combination.bonus, hand, suit);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((suit, score));
                break;
            }
        }
    }
    best
}

/// Points the hand adds to a bid in `suit`.
pub(crate) fn support_score(hand: &[Card], suit: Suit, table: &[Bonus]) -> u16 {
    bonus_score(table, hand, suit)
}
