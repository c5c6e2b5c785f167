//! Crate-level tests for `card_shuffle_engine`.
//!
//! Included from `lib.rs` under `#[cfg(test)]`. Per-module unit tests live
//! next to the code; this file checks the properties that cut across modules.
//!
//! # Coverage
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Deck integrity | Fresh deck holds 52 unique cards; shuffles are permutations with indices 0..51 |
//! | Randomness | Shuffles practically never repeat the input; first position is roughly uniform |
//! | Patterns | Canonical order, red/black alternation, a deck with nothing notable |
//! | Achievements | Stats thresholds, all-aces check, leap day / new year / midnight |
//! | Service | Shuffle, save, share and the client view working together |

use std::collections::{HashMap, HashSet};

use rand::{rngs::StdRng, SeedableRng};
use time::macros::datetime;

use crate::client_adapter::to_client_view;
use crate::config::ServiceConfig;
use crate::service::{FixedIdentity, InMemoryStore, ManualClock, ShuffleService};
use crate::shuffle_engine::{
    check_time_based_achievements, create_deck, find_patterns, get_unlocked_achievements,
    has_all_aces, shuffle_deck, Card, Color, Rank, ShuffleRequest, Suit, UserStats, DECK_SIZE,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Seeds spread over different RNG states.
const SEEDS: [u64; 5] = [1, 42, 999, 0xDEAD_BEEF, 7];

fn ids_of(cards: &[Card]) -> Vec<String> {
    find_patterns(cards).into_iter().map(|p| p.id).collect()
}

/// Red and black alternating at every position, starting red.
fn alternating_deck() -> Vec<Card> {
    let deck = create_deck();
    let (reds, blacks): (Vec<Card>, Vec<Card>) =
        deck.iter().partition(|c| c.color() == Color::Red);
    reds.into_iter()
        .zip(blacks)
        .flat_map(|(r, b)| [r, b])
        .enumerate()
        .map(|(i, mut c)| {
            c.index = i as u8;
            c
        })
        .collect()
}

/// Suit cycles every card and value steps by 5 (mod 13): no runs, no
/// matching ranks or suits inside any 5-card window.
fn scattered_deck() -> Vec<Card> {
    (0..DECK_SIZE)
        .map(|i| {
            let mut c = Card::new(Rank(((5 * i) % 13) as u8 + 1), Suit::ALL[i % 4]);
            c.index = i as u8;
            c
        })
        .collect()
}

// ── deck integrity ───────────────────────────────────────────────────────────

#[test]
fn fresh_deck_has_one_card_per_suit_and_rank() {
    let deck = create_deck();
    assert_eq!(deck.len(), 52);
    let unique: HashSet<Card> = deck.iter().copied().collect();
    assert_eq!(unique.len(), 52);
    for suit in Suit::ALL {
        for rank in 1..=13u8 {
            assert!(unique.contains(&Card::new(Rank(rank), suit)), "missing {rank} of {suit:?}");
        }
    }
}

#[test]
fn shuffles_are_permutations_with_fresh_indices() {
    let original = create_deck();
    let expected: HashSet<Card> = original.iter().copied().collect();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = original.clone();
        for _ in 0..3 {
            deck = shuffle_deck(&deck, &mut rng);
            assert_eq!(deck.len(), 52);
            let got: HashSet<Card> = deck.iter().copied().collect();
            assert_eq!(got, expected, "seed {seed}");
            for (i, c) in deck.iter().enumerate() {
                assert_eq!(usize::from(c.index), i, "seed {seed}");
            }
        }
    }
    // Input untouched.
    assert_eq!(original, create_deck());
}

// ── randomness ───────────────────────────────────────────────────────────────

#[test]
fn shuffles_practically_never_return_the_input_order() {
    let deck = create_deck();
    let mut rng = StdRng::seed_from_u64(2024);
    let identical = (0..1_000)
        .filter(|_| shuffle_deck(&deck, &mut rng).cards() == deck.cards())
        .count();
    assert_eq!(identical, 0);
}

#[test]
fn first_position_is_roughly_uniform() {
    let deck = create_deck();
    let mut rng = StdRng::seed_from_u64(99);
    let trials = 52 * 200;
    let mut counts: HashMap<Card, u32> = HashMap::new();
    for _ in 0..trials {
        *counts.entry(shuffle_deck(&deck, &mut rng).cards()[0]).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), 52);
    // Expected 200 each; these bounds are many standard deviations wide.
    for (card, n) in counts {
        assert!((120..=290).contains(&n), "{card} appeared {n} times");
    }
}

// ── patterns ─────────────────────────────────────────────────────────────────

#[test]
fn canonical_order_is_perfect_order() {
    let ids = ids_of(create_deck().cards());
    assert!(ids.contains(&"perfect_order".to_string()), "{ids:?}");
    assert!(!ids.contains(&"symmetric".to_string()));
}

#[test]
fn alternating_colours_are_symmetric() {
    let ids = ids_of(&alternating_deck());
    assert!(ids.contains(&"symmetric".to_string()), "{ids:?}");
    assert!(!ids.contains(&"perfect_order".to_string()));
}

#[test]
fn scattered_deck_has_only_minimal_patterns() {
    let patterns = find_patterns(&scattered_deck());
    assert!(patterns.iter().all(|p| p.indices.is_none() || p.id == "suit_parade"));
    assert!(patterns.len() <= 1, "{patterns:?}");
}

// ── achievements ─────────────────────────────────────────────────────────────

#[test]
fn ten_shuffles_unlock_novice_only() {
    let stats = UserStats {
        total_shuffles: 10,
        ..UserStats::default()
    };
    let names: Vec<&str> = get_unlocked_achievements(&stats).iter().map(|a| a.name).collect();
    assert!(names.contains(&"Novice Shuffler"));
    assert!(!names.contains(&"Card Enthusiast"));
}

#[test]
fn all_aces_needs_every_ace() {
    let deck = create_deck();
    let (aces, rest): (Vec<Card>, Vec<Card>) = deck.iter().partition(|c| c.is_ace());
    assert_eq!(aces.len(), 4);

    let four: Vec<Card> = aces.iter().chain(rest.iter()).copied().collect();
    assert!(has_all_aces(&four));

    let three: Vec<Card> = aces[..3].iter().chain(rest.iter()).copied().collect();
    assert!(!has_all_aces(&three));
}

#[test]
fn calendar_checks() {
    let leap = check_time_based_achievements(datetime!(2024-02-29 10:00:00));
    assert!(leap.is_leap_day);
    assert!(!leap.is_new_years_day);

    let new_year = check_time_based_achievements(datetime!(2021-01-01 00:30:00));
    assert!(new_year.is_new_years_day);
    assert!(new_year.is_midnight);
    assert!(!new_year.is_leap_day);
}

// ── service ──────────────────────────────────────────────────────────────────

#[test]
fn shuffle_save_share_and_render() {
    crate::telemetry::init_test_logging();
    let svc = ShuffleService::new(
        InMemoryStore::new(),
        FixedIdentity::user("dealer"),
        ManualClock::new(datetime!(2024-05-07 14:30:15 UTC)),
        ServiceConfig::default(),
    );

    let out = svc.shuffle(ShuffleRequest::seeded(11)).unwrap();
    let id = out.result.shuffle_id.clone();
    svc.save_shuffle(&id).unwrap();
    svc.share_shuffle(&id).unwrap();

    let stats = svc.stats().unwrap();
    assert_eq!(stats.total_shuffles, 1);
    assert_eq!(stats.saved_shuffles, 1);
    assert_eq!(stats.shared_shuffles, 1);

    let board = svc.achievement_board().unwrap();
    let unlocked = board.iter().filter(|s| s.unlocked).count();
    assert_eq!(unlocked as u32, stats.achievements_count);

    let view = to_client_view(&out.result, &board);
    assert_eq!(view["cards"].as_array().map(Vec::len), Some(52));
    assert_eq!(view["summary"]["unlocked_count"], unlocked);
}
