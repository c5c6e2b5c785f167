//! In-process collaborators: a `StatsStore` backed by maps under one lock,
//! a fixed identity and a hand-driven clock.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use time::{Date, OffsetDateTime};

use crate::error::StoreError;
use crate::service::ports::{Clock, IdentityProvider, ShuffleFlag, ShuffleRecord, StatsStore, UserId};
use crate::shuffle_engine::{
    models::{CardFrequency, UserStats},
    stats::apply_shuffle,
};

#[derive(Debug, Default)]
struct Inner {
    stats: HashMap<UserId, UserStats>,
    /// Insertion order, oldest first.
    shuffles: Vec<ShuffleRecord>,
    unlocked: HashMap<UserId, HashMap<String, OffsetDateTime>>,
}

/// Every operation takes the single lock, so each read-modify-write is atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's counters, e.g. to restore a snapshot.
    pub fn put_stats(&self, user: &str, stats: UserStats) {
        self.inner.lock().stats.insert(user.to_string(), stats);
    }

    pub fn shuffle_count(&self) -> usize {
        self.inner.lock().shuffles.len()
    }
}

impl StatsStore for InMemoryStore {
    fn load_stats(&self, user: &str) -> Result<UserStats, StoreError> {
        Ok(self.inner.lock().stats.get(user).cloned().unwrap_or_default())
    }

    fn append_shuffle(&self, record: ShuffleRecord) -> Result<(), StoreError> {
        self.inner.lock().shuffles.push(record);
        Ok(())
    }

    fn find_shuffle(&self, shuffle_id: &str) -> Result<Option<ShuffleRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.shuffles.iter().find(|r| r.shuffle_id == shuffle_id).cloned())
    }

    fn set_flag(&self, shuffle_id: &str, flag: ShuffleFlag) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        let record = inner
            .shuffles
            .iter_mut()
            .find(|r| r.shuffle_id == shuffle_id)
            .ok_or_else(|| StoreError::ShuffleNotFound(shuffle_id.to_string()))?;
        let slot = match flag {
            ShuffleFlag::Saved => &mut record.saved,
            ShuffleFlag::Shared => &mut record.shared,
        };
        let newly_set = !*slot;
        *slot = true;
        Ok(newly_set)
    }

    fn record_shuffle(&self, user: &str, today: Date) -> Result<UserStats, StoreError> {
        let mut inner = self.inner.lock();
        let entry = inner.stats.entry(user.to_string()).or_default();
        *entry = apply_shuffle(entry, today);
        Ok(entry.clone())
    }

    fn increment_counter(&self, user: &str, flag: ShuffleFlag) -> Result<UserStats, StoreError> {
        let mut inner = self.inner.lock();
        let entry = inner.stats.entry(user.to_string()).or_default();
        match flag {
            ShuffleFlag::Saved => entry.saved_shuffles += 1,
            ShuffleFlag::Shared => entry.shared_shuffles += 1,
        }
        Ok(entry.clone())
    }

    fn update_most_common(&self, user: &str, cards: Vec<CardFrequency>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.stats.entry(user.to_string()).or_default().most_common_cards = cards;
        Ok(())
    }

    fn unlock_achievements(
        &self,
        user: &str,
        ids: &[&str],
        at: OffsetDateTime,
    ) -> Result<UserStats, StoreError> {
        let mut inner = self.inner.lock();
        let unlocked = inner.unlocked.entry(user.to_string()).or_default();
        for id in ids {
            unlocked.entry(id.to_string()).or_insert(at);
        }
        let count = unlocked.len() as u32;
        let entry = inner.stats.entry(user.to_string()).or_default();
        entry.achievements_count = count;
        Ok(entry.clone())
    }

    fn unlocked_achievements(&self, user: &str) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .unlocked
            .get(user)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn recent_shuffles(&self, user: &str, limit: usize) -> Result<Vec<ShuffleRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .shuffles
            .iter()
            .rev()
            .filter(|r| r.owner.as_deref() == Some(user))
            .take(limit)
            .cloned()
            .collect())
    }

    fn all_stats(&self) -> Result<Vec<(UserId, UserStats)>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.stats.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Identity fixed at construction: a signed-in user, an anonymous session,
/// or nobody at all.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity {
    user: Option<UserId>,
    session: Option<String>,
}

impl FixedIdentity {
    pub fn user(id: impl Into<UserId>) -> Self {
        FixedIdentity { user: Some(id.into()), session: None }
    }

    pub fn anonymous() -> Self {
        FixedIdentity::default()
    }

    /// Anonymous, but distinguishable by `session` for rate limiting.
    pub fn anonymous_session(session: impl Into<String>) -> Self {
        FixedIdentity { user: None, session: Some(session.into()) }
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }

    fn caller_key(&self) -> Option<String> {
        self.session.clone()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        ManualClock { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: time::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock()
    }
}
