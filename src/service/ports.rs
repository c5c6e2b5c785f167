//! Seams to the collaborators the service depends on.
//!
//! The hosted backend (auth, database) sits behind these traits. The crate
//! ships [`InMemoryStore`](super::memory_store::InMemoryStore) for tests and
//! the CLI; a real deployment supplies its own implementations.

use std::collections::HashSet;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::error::StoreError;
use crate::shuffle_engine::models::{Card, CardFrequency, UserStats};

pub type UserId = String;

/// A persisted shuffle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleRecord {
    pub shuffle_id: String,
    pub owner: Option<UserId>,
    pub cards: Vec<Card>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub saved: bool,
    pub shared: bool,
    pub pattern_ids: Vec<String>,
}

/// Per-shuffle flags a user can set after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuffleFlag {
    Saved,
    Shared,
}

/// Persistence collaborator.
///
/// Counter updates (`record_shuffle`, `increment_counter`,
/// `unlock_achievements`) must be atomic per user and return the snapshot as
/// written.
pub trait StatsStore: Send + Sync {
    fn load_stats(&self, user: &str) -> Result<UserStats, StoreError>;

    fn append_shuffle(&self, record: ShuffleRecord) -> Result<(), StoreError>;

    fn find_shuffle(&self, shuffle_id: &str) -> Result<Option<ShuffleRecord>, StoreError>;

    /// Set a flag on a stored shuffle; `Ok(false)` if it was already set.
    fn set_flag(&self, shuffle_id: &str, flag: ShuffleFlag) -> Result<bool, StoreError>;

    /// Count one shuffle on `today` and advance the daily streak.
    fn record_shuffle(&self, user: &str, today: Date) -> Result<UserStats, StoreError>;

    fn increment_counter(&self, user: &str, flag: ShuffleFlag) -> Result<UserStats, StoreError>;

    fn update_most_common(&self, user: &str, cards: Vec<CardFrequency>) -> Result<(), StoreError>;

    /// Record unlocks keyed by (user, achievement id); duplicates are ignored.
    fn unlock_achievements(
        &self,
        user: &str,
        ids: &[&str],
        at: OffsetDateTime,
    ) -> Result<UserStats, StoreError>;

    fn unlocked_achievements(&self, user: &str) -> Result<HashSet<String>, StoreError>;

    /// Newest first.
    fn recent_shuffles(&self, user: &str, limit: usize) -> Result<Vec<ShuffleRecord>, StoreError>;

    fn all_stats(&self) -> Result<Vec<(UserId, UserStats)>, StoreError>;
}

/// Identity collaborator: who is calling, if anyone.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;

    /// Stable key for a caller without an account, such as a session id or
    /// client address. Used only to give anonymous callers their own rate
    /// limit; `None` puts them in one shared bucket.
    fn caller_key(&self) -> Option<String> {
        None
    }
}

/// Wall-clock source, injected so time-based behaviour is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

static LOCAL_OFFSET_WARNING: Once = Once::new();

impl Clock for SystemClock {
    /// Local time when the offset can be determined, UTC otherwise. The
    /// offset lookup fails in multi-threaded processes on most Unix targets,
    /// which shifts time-based achievements and streak days; that is logged
    /// once per process.
    fn now(&self) -> OffsetDateTime {
        match OffsetDateTime::now_local() {
            Ok(now) => now,
            Err(err) => {
                LOCAL_OFFSET_WARNING.call_once(|| {
                    warn!(error = %err, "local UTC offset unavailable, using UTC");
                });
                OffsetDateTime::now_utc()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_wall_time() {
        // Local offset may be unavailable under the multi-threaded test
        // runner; either way the instant matches UTC wall time.
        let before = OffsetDateTime::now_utc();
        let first = SystemClock.now();
        let second = SystemClock.now();
        let after = OffsetDateTime::now_utc();
        assert!(first >= before && second <= after);
        if OffsetDateTime::now_local().is_err() {
            assert!(LOCAL_OFFSET_WARNING.is_completed());
        }
    }
}
