//! # card_shuffle_engine
//!
//! Shuffle a virtual 52-card deck, find what is notable about the order it
//! came out in, and turn that into achievements.
//!
//! ## How it works
//!
//! 1. Create a [`ShuffleRequest`], optionally with a fixed RNG seed.
//! 2. Call [`generate_shuffle`]: the engine shuffles a fresh deck with
//!    Fisher-Yates, scans it for global, windowed (5-card poker hands) and
//!    positional patterns, and runs the shuffle achievement checks.
//! 3. The returned [`ShuffleResult`] carries the deck, the patterns and the
//!    ids of the achievements the ordering satisfies.
//!
//! For a stateful setup with users, counters, streaks and unlocks, wrap a
//! [`service::StatsStore`] in a [`service::ShuffleService`]. The
//! [`client_adapter`] turns the outcome into JSON for a front end.
//!
//! ## Key features
//!
//! - **Deterministic**: `ShuffleRequest::seeded(u64)` reproduces the same
//!   deck, shuffle id and patterns every time.
//! - **Pure core**: nothing in [`shuffle_engine`] reads the clock, keeps state
//!   or fails. Time-based checks take the timestamp as an argument.
//! - **Injected collaborators**: storage, identity, clock, cache and rate
//!   limiter are all passed in, so a service instance shares nothing
//!   process-wide.
//!
//! ## Quick start
//!
//! ```rust
//! use card_shuffle_engine::{generate_shuffle, ShuffleRequest};
//!
//! let result = generate_shuffle(ShuffleRequest::seeded(42));
//! println!("Shuffle {}", result.shuffle_id);
//! for card in result.deck.iter().take(5) {
//!     print!("{card} ");
//! }
//! println!();
//! for pattern in &result.patterns {
//!     println!("{} ({:?})", pattern.name, pattern.pattern_type);
//! }
//! ```
//!
//! With the in-memory service:
//!
//! ```rust
//! use card_shuffle_engine::config::ServiceConfig;
//! use card_shuffle_engine::service::{FixedIdentity, InMemoryStore, ShuffleService, SystemClock};
//! use card_shuffle_engine::ShuffleRequest;
//!
//! let service = ShuffleService::new(
//!     InMemoryStore::new(),
//!     FixedIdentity::user("alice"),
//!     SystemClock,
//!     ServiceConfig::default(),
//! );
//! let outcome = service.shuffle(ShuffleRequest::new()).unwrap();
//! assert!(outcome.new_achievements.iter().any(|a| a.id == "first_shuffle"));
//! ```

pub mod client_adapter;
pub mod config;
pub mod error;
pub mod service;
pub mod shuffle_engine;
pub mod telemetry;

// Convenience re-exports so callers can use `card_shuffle_engine::generate_shuffle`
// directly without reaching into `shuffle_engine::`.
pub use shuffle_engine::{
    check_shuffle_achievements, check_time_based_achievements, create_deck,
    evaluate_new_achievements, find_patterns, generate_shuffle, get_unlocked_achievements,
    shuffle_deck, Achievement, Card, Deck, Pattern, PatternType, Rank, ShuffleRequest,
    ShuffleResult, Suit, UserStats,
};

#[cfg(test)]
mod tests;
