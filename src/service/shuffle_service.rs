use std::collections::HashSet;

use serde::Serialize;
use time::PrimitiveDateTime;
use tracing::{debug, info, info_span, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::service::{
    cache::ShuffleCache,
    ports::{Clock, IdentityProvider, ShuffleFlag, ShuffleRecord, StatsStore, UserId},
    rate_limit::RateLimiter,
};
use crate::shuffle_engine::{
    achievements::{achievement_statuses, evaluate_new_achievements, Achievement, AchievementStatus},
    generator::{generate_shuffle, ShuffleRequest, ShuffleResult},
    ingest::{deck_from_records, RawCard},
    leaderboard::{rank_leaderboard, LeaderboardEntry},
    models::{Pattern, UserStats},
    patterns::find_patterns,
    stats::most_common_cards,
};

/// Rate-limit key shared by anonymous callers the identity provider cannot
/// tell apart.
const ANONYMOUS_KEY: &str = "anonymous";

/// Ranking entries kept in `UserStats::most_common_cards`.
const MOST_COMMON_LEN: usize = 5;

/// What a caller gets back from [`ShuffleService::shuffle`].
#[derive(Debug, Clone, Serialize)]
pub struct ShuffleOutcome {
    pub result: ShuffleResult,
    pub owner: Option<UserId>,
    /// Achievements unlocked by this shuffle, catalog order.
    pub new_achievements: Vec<&'static Achievement>,
    /// Counters after the shuffle; `None` for anonymous callers.
    pub stats: Option<UserStats>,
}

/// Result of saving or sharing a shuffle.
#[derive(Debug, Clone, Serialize)]
pub struct FlagOutcome {
    /// `false` when the shuffle already carried the flag.
    pub newly_set: bool,
    pub new_achievements: Vec<&'static Achievement>,
    pub stats: UserStats,
}

/// Orchestrates shuffle generation, pattern and achievement evaluation and
/// persistence through the injected collaborators.
pub struct ShuffleService<S, I, C> {
    store: S,
    identity: I,
    clock: C,
    cache: ShuffleCache,
    limiter: RateLimiter,
    config: ServiceConfig,
}

impl<S, I, C> ShuffleService<S, I, C>
where
    S: StatsStore,
    I: IdentityProvider,
    C: Clock,
{
    /// Build with a cache and rate limiter sized from `config`.
    pub fn new(store: S, identity: I, clock: C, config: ServiceConfig) -> Self {
        let cache = ShuffleCache::from_config(&config);
        let limiter = RateLimiter::from_config(&config);
        Self::with_components(store, identity, clock, cache, limiter, config)
    }

    pub fn with_components(
        store: S,
        identity: I,
        clock: C,
        cache: ShuffleCache,
        limiter: RateLimiter,
        config: ServiceConfig,
    ) -> Self {
        ShuffleService { store, identity, clock, cache, limiter, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn require_user(&self, action: &'static str) -> Result<UserId, ServiceError> {
        self.identity
            .current_user()
            .ok_or(ServiceError::Unauthenticated { action })
    }

    /// Users are limited by id, anonymous callers by their caller key.
    fn limit_key(&self, owner: Option<&str>) -> String {
        match (owner, self.identity.caller_key()) {
            (Some(user), _)       => format!("user:{user}"),
            (None, Some(session)) => format!("anon:{session}"),
            (None, None)          => ANONYMOUS_KEY.to_string(),
        }
    }

    /// Shuffle a fresh deck for the current caller.
    ///
    /// Anonymous callers get the deck and its patterns; nothing is stored for
    /// them and no achievements are unlocked.
    pub fn shuffle(&self, request: ShuffleRequest) -> Result<ShuffleOutcome, ServiceError> {
        let owner = self.identity.current_user();
        let now = self.clock.now();
        let key = self.limit_key(owner.as_deref());

        let _span = info_span!("shuffle", caller = %key).entered();

        self.limiter.check(&key, now).map_err(|retry| {
            warn!(retry_after_secs = retry.as_secs_ceil(), "shuffle rejected by rate limiter");
            ServiceError::RateLimited { retry_after_secs: retry.as_secs_ceil() }
        })?;

        let result = generate_shuffle(request);
        let record = ShuffleRecord {
            shuffle_id: result.shuffle_id.clone(),
            owner: owner.clone(),
            cards: result.deck.cards().to_vec(),
            created_at: now,
            saved: false,
            shared: false,
            pattern_ids: result.patterns.iter().map(|p| p.id.clone()).collect(),
        };

        let Some(user) = owner else {
            self.cache.insert(record);
            info!(shuffle_id = %result.shuffle_id, patterns = result.patterns.len(), "anonymous shuffle");
            return Ok(ShuffleOutcome {
                result,
                owner: None,
                new_achievements: Vec::new(),
                stats: None,
            });
        };

        self.store.append_shuffle(record.clone())?;
        self.cache.insert(record);

        let mut stats = self.store.record_shuffle(&user, now.date())?;

        let recent = self.store.recent_shuffles(&user, self.config.history_len)?;
        let most_common = most_common_cards(recent.iter().map(|r| r.cards.as_slice()), MOST_COMMON_LEN);
        self.store.update_most_common(&user, most_common.clone())?;
        stats.most_common_cards = most_common;

        let unlocked = self.store.unlocked_achievements(&user)?;
        let local = PrimitiveDateTime::new(now.date(), now.time());
        let new_achievements =
            evaluate_new_achievements(&stats, Some(result.deck.cards()), Some(local), &unlocked);
        let stats = self.unlock(&user, &new_achievements, stats)?;

        info!(
            shuffle_id = %result.shuffle_id,
            patterns = result.patterns.len(),
            new_achievements = new_achievements.len(),
            total_shuffles = stats.total_shuffles,
            "shuffle recorded"
        );

        Ok(ShuffleOutcome {
            result,
            owner: Some(user),
            new_achievements,
            stats: Some(stats),
        })
    }

    pub fn save_shuffle(&self, shuffle_id: &str) -> Result<FlagOutcome, ServiceError> {
        let user = self.require_user("save a shuffle")?;
        self.flag_shuffle(&user, shuffle_id, ShuffleFlag::Saved)
    }

    pub fn share_shuffle(&self, shuffle_id: &str) -> Result<FlagOutcome, ServiceError> {
        let user = self.require_user("share a shuffle")?;
        self.flag_shuffle(&user, shuffle_id, ShuffleFlag::Shared)
    }

    fn flag_shuffle(
        &self,
        user: &str,
        shuffle_id: &str,
        flag: ShuffleFlag,
    ) -> Result<FlagOutcome, ServiceError> {
        let record = self
            .store
            .find_shuffle(shuffle_id)?
            .ok_or_else(|| ServiceError::ShuffleNotFound(shuffle_id.to_string()))?;
        if record.owner.as_deref() != Some(user) {
            return Err(ServiceError::Forbidden(shuffle_id.to_string()));
        }

        let newly_set = self.store.set_flag(shuffle_id, flag)?;
        self.cache.invalidate(shuffle_id);
        if !newly_set {
            debug!(shuffle_id, ?flag, "flag already set");
            return Ok(FlagOutcome {
                newly_set,
                new_achievements: Vec::new(),
                stats: self.store.load_stats(user)?,
            });
        }

        let stats = self.store.increment_counter(user, flag)?;
        let unlocked = self.store.unlocked_achievements(user)?;
        let new_achievements = evaluate_new_achievements(&stats, None, None, &unlocked);
        let stats = self.unlock(user, &new_achievements, stats)?;

        info!(shuffle_id, ?flag, new_achievements = new_achievements.len(), "shuffle flagged");
        Ok(FlagOutcome { newly_set, new_achievements, stats })
    }

    fn unlock(
        &self,
        user: &str,
        earned: &[&'static Achievement],
        stats: UserStats,
    ) -> Result<UserStats, ServiceError> {
        if earned.is_empty() {
            return Ok(stats);
        }
        let ids: Vec<&str> = earned.iter().map(|a| a.id).collect();
        let updated = self.store.unlock_achievements(user, &ids, self.clock.now())?;
        for id in &ids {
            info!(achievement = id, "achievement unlocked");
        }
        Ok(UserStats {
            achievements_count: updated.achievements_count,
            ..stats
        })
    }

    /// Look up a shuffle by id, cache first.
    pub fn get_shuffle(&self, shuffle_id: &str) -> Result<ShuffleRecord, ServiceError> {
        if let Some(hit) = self.cache.get(shuffle_id) {
            debug!(shuffle_id, "cache hit");
            return Ok(hit.as_ref().clone());
        }
        let record = self
            .store
            .find_shuffle(shuffle_id)?
            .ok_or_else(|| ServiceError::ShuffleNotFound(shuffle_id.to_string()))?;
        self.cache.insert(record.clone());
        Ok(record)
    }

    /// Re-run pattern detection on a deck stored as loose records, e.g. one
    /// written by an older client. The records must still add up to a full
    /// deck once malformed entries are dropped.
    pub fn analyze_records(&self, records: &[RawCard]) -> Result<Vec<Pattern>, ServiceError> {
        let deck = deck_from_records(records)?;
        Ok(find_patterns(deck.cards()))
    }

    pub fn stats(&self) -> Result<UserStats, ServiceError> {
        let user = self.require_user("view stats")?;
        Ok(self.store.load_stats(&user)?)
    }

    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        Ok(rank_leaderboard(self.store.all_stats()?, limit))
    }

    /// The full catalog with the caller's unlocked flags; all locked when
    /// nobody is signed in.
    pub fn achievement_board(&self) -> Result<Vec<AchievementStatus>, ServiceError> {
        let unlocked = match self.identity.current_user() {
            Some(user) => self.store.unlocked_achievements(&user)?,
            None => HashSet::new(),
        };
        Ok(achievement_statuses(&unlocked))
    }

    /// Drop rate-limit windows that have run out.
    pub fn purge_expired(&self) {
        self.limiter.purge_expired(self.clock.now());
    }
}

impl<S, I, C> std::fmt::Debug for ShuffleService<S, I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuffleService")
            .field("cache", &self.cache)
            .field("limiter", &self.limiter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
