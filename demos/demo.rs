//! Tour of the shuffle engine.
//!
//! Run with: `cargo run --example demo`
//!
//! 1. **Seeded shuffles**: the same seed gives the same deck, id and
//!    patterns; a handful of seeds shows what a typical shuffle contains.
//! 2. **Hand-built decks**: canonical order and red/black alternation hit the
//!    legendary whole-deck patterns that random shuffles practically never do.
//! 3. **Service**: one user shuffling across several days, saving and
//!    sharing, with streaks and unlocks accumulating in the in-memory store.

use card_shuffle_engine::service::{FixedIdentity, InMemoryStore, ManualClock, ShuffleService};
use card_shuffle_engine::shuffle_engine::{create_deck, Color};
use card_shuffle_engine::{config::ServiceConfig, find_patterns, generate_shuffle, Card, ShuffleRequest};
use time::macros::datetime;

fn print_patterns(label: &str, cards: &[Card]) {
    let patterns = find_patterns(cards);
    println!("  {label}: {} pattern(s)", patterns.len());
    for p in &patterns {
        println!("    - {:<24} {:?}", p.name, p.pattern_type);
    }
}

fn main() {
    // ── Seeded shuffles ──────────────────────────────────────────────────────
    println!();
    println!("══ Seeded shuffles ══");
    println!();
    for seed in [1u64, 42, 999, 2024, 0xC0FFEE] {
        let result = generate_shuffle(ShuffleRequest::seeded(seed));
        let opening: Vec<String> = result.deck.iter().take(8).map(|c| c.to_string()).collect();
        println!("  seed {seed:<10} {}  opens {}", result.shuffle_id, opening.join(" "));
        for p in &result.patterns {
            println!("      {:<24} {:?}", p.name, p.indices.as_deref().unwrap_or(&[]));
        }
        if !result.shuffle_achievements.is_empty() {
            println!("      achievements: {}", result.shuffle_achievements.join(", "));
        }
    }

    // ── Hand-built decks ─────────────────────────────────────────────────────
    println!();
    println!("══ Hand-built decks ══");
    println!();
    let fresh = create_deck();
    print_patterns("fresh box order", fresh.cards());

    let (reds, blacks): (Vec<Card>, Vec<Card>) =
        fresh.iter().partition(|c| c.color() == Color::Red);
    let alternating: Vec<Card> = reds
        .into_iter()
        .zip(blacks)
        .flat_map(|(r, b)| [r, b])
        .enumerate()
        .map(|(i, mut c)| {
            c.index = i as u8;
            c
        })
        .collect();
    print_patterns("red/black alternation", &alternating);

    // ── Service ──────────────────────────────────────────────────────────────
    println!();
    println!("══ One user over four days ══");
    println!();
    let clock = ManualClock::new(datetime!(2024-12-22 23:45 UTC));
    let service = ShuffleService::new(
        InMemoryStore::new(),
        FixedIdentity::user("demo"),
        clock,
        ServiceConfig::default(),
    );

    let mut last_id = String::new();
    for day in 0..4u64 {
        let outcome = match service.shuffle(ShuffleRequest::seeded(100 + day)) {
            Ok(o) => o,
            Err(e) => {
                println!("  shuffle failed: {e}");
                return;
            }
        };
        let streak = outcome.stats.as_ref().map_or(0, |s| s.shuffle_streak);
        println!("  {}  streak {streak}", outcome.result.shuffle_id);
        for a in &outcome.new_achievements {
            println!("    + {}", a.name);
        }
        last_id = outcome.result.shuffle_id;
        service.clock().advance(time::Duration::days(1));
    }

    for (action, res) in [
        ("saved", service.save_shuffle(&last_id)),
        ("shared", service.share_shuffle(&last_id)),
    ] {
        match res {
            Ok(flag) => {
                let names: Vec<&str> = flag.new_achievements.iter().map(|a| a.name).collect();
                println!("  {action} {last_id}: new {names:?}");
            }
            Err(e) => println!("  could not mark {action}: {e}"),
        }
    }

    if let Ok(board) = service.leaderboard(5) {
        println!();
        for entry in board {
            println!(
                "  #{} {}  shuffles {}  achievements {}  streak {}",
                entry.rank, entry.user_id, entry.total_shuffles, entry.achievements_count,
                entry.shuffle_streak
            );
        }
    }
}

