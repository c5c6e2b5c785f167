//! Core shuffle engine: deck handling, pattern detection and achievements.
//!
//! Everything in here is pure and synchronous; no function reads the clock,
//! touches storage or keeps state between calls.
//!
//! ## Module overview
//!
//! | Module               | Purpose |
//! |----------------------|---------|
//! | `models`             | Shared types: cards, patterns, user stats |
//! | `deck`               | 52-card deck creation and Fisher-Yates shuffle |
//! | `evaluator`          | Poker-hand classification of card windows, blackjack totals |
//! | `patterns`           | Global, windowed and positional pattern detection |
//! | `achievement_checks` | Shuffle-based and time-based achievement predicates |
//! | `achievements`       | Static catalog, stats-based and combined evaluation |
//! | `stats`              | Streak arithmetic and most-common-card ranking |
//! | `leaderboard`        | Ranking users by their counters |
//! | `ingest`             | Validation of loosely typed stored card records |
//! | `generator`          | Single entry point `generate_shuffle()` |

pub mod achievement_checks;
pub mod achievements;
pub mod deck;
pub mod evaluator;
pub mod generator;
pub mod ingest;
pub mod leaderboard;
pub mod models;
pub mod patterns;
pub mod stats;

pub use achievement_checks::{
    check_shuffle_achievements, check_time_based_achievements, has_all_aces, ShuffleCheck,
    TimeBasedAchievements, TimeCheck,
};
pub use achievements::{
    achievement_statuses, catalog, evaluate_new_achievements, find_achievement,
    get_unlocked_achievements, Achievement, AchievementCategory, AchievementStatus, Condition,
};
pub use deck::{create_deck, shuffle_deck, Deck, DECK_SIZE};
pub use generator::{generate_shuffle, ShuffleRequest, ShuffleResult};
pub use ingest::{cards_from_records, deck_from_records, parse_card, RawCard};
pub use leaderboard::{rank_leaderboard, LeaderboardEntry};
pub use models::{Card, CardFrequency, Color, Pattern, PatternType, Rank, Suit, UserStats};
pub use patterns::find_patterns;
