//! Orchestration around the pure engine.
//!
//! | Module            | Purpose |
//! |-------------------|---------|
//! | `ports`           | Traits for the store, identity and clock collaborators |
//! | `memory_store`    | In-process implementations of those traits |
//! | `cache`           | Bounded TTL cache of shuffle records |
//! | `rate_limit`      | Fixed-window per-caller rate limiter |
//! | `stats_sync`      | Optimistic stats view reconciled against the server |
//! | `shuffle_service` | `ShuffleService`: shuffle, save, share, stats, leaderboard |

pub mod cache;
pub mod memory_store;
pub mod ports;
pub mod rate_limit;
pub mod shuffle_service;
pub mod stats_sync;

pub use cache::ShuffleCache;
pub use memory_store::{FixedIdentity, InMemoryStore, ManualClock};
pub use ports::{Clock, IdentityProvider, ShuffleFlag, ShuffleRecord, StatsStore, SystemClock, UserId};
pub use rate_limit::{RateLimiter, RetryAfter};
pub use shuffle_service::{FlagOutcome, ShuffleOutcome, ShuffleService};
pub use stats_sync::{StatsView, SyncEvent, SyncState};
