use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::ServiceConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: OffsetDateTime,
    count: u32,
}

/// Fixed-window limiter keyed by caller. Time is passed in, never read.
///
/// Elapsed windows are swept at most once per window length from inside
/// [`check`](Self::check), so the map only holds callers seen in the last
/// two windows.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: time::Duration,
    windows: DashMap<String, Window>,
    last_sweep: Mutex<Option<OffsetDateTime>>,
}

/// Rejection carrying how long until the caller's window resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAfter(pub Duration);

impl RetryAfter {
    /// Whole seconds, rounded up, at least 1.
    pub fn as_secs_ceil(&self) -> u64 {
        let secs = self.0.as_secs() + u64::from(self.0.subsec_nanos() > 0);
        secs.max(1)
    }
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        RateLimiter {
            limit,
            window: time::Duration::try_from(window).unwrap_or(time::Duration::MAX),
            windows: DashMap::new(),
            last_sweep: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.rate_limit, config.rate_window())
    }

    /// Count one call for `key` at `now`.
    pub fn check(&self, key: &str, now: OffsetDateTime) -> Result<(), RetryAfter> {
        // Sweep before taking an entry: `retain` locks every shard.
        self.sweep_if_due(now);

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window { started: now, count: 0 });

        if now - entry.started >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        if entry.count >= self.limit {
            let remaining = self.window - (now - entry.started);
            let retry = Duration::try_from(remaining).unwrap_or(Duration::ZERO);
            debug!(key, count = entry.count, "rate limited");
            return Err(RetryAfter(retry));
        }

        entry.count += 1;
        Ok(())
    }

    fn sweep_if_due(&self, now: OffsetDateTime) {
        let mut last = self.last_sweep.lock();
        match *last {
            Some(at) if now - at < self.window => {}
            Some(_) => {
                *last = Some(now);
                drop(last);
                self.purge_expired(now);
            }
            None => *last = Some(now),
        }
    }

    /// Drop windows that have fully elapsed.
    pub fn purge_expired(&self, now: OffsetDateTime) {
        let before = self.windows.len();
        self.windows.retain(|_, w| now - w.started < self.window);
        let dropped = before.saturating_sub(self.windows.len());
        if dropped > 0 {
            debug!(dropped, "purged elapsed rate-limit windows");
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let t0 = datetime!(2024-05-01 12:00 UTC);
        for _ in 0..3 {
            assert!(limiter.check("ana", t0).is_ok());
        }
        let err = limiter.check("ana", t0 + time::Duration::seconds(20)).unwrap_err();
        assert_eq!(err.as_secs_ceil(), 40);
        // Other keys have their own window.
        assert!(limiter.check("ben", t0).is_ok());
    }

    #[test]
    fn window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = datetime!(2024-05-01 12:00 UTC);
        assert!(limiter.check("ana", t0).is_ok());
        assert!(limiter.check("ana", t0 + time::Duration::seconds(59)).is_err());
        assert!(limiter.check("ana", t0 + time::Duration::seconds(60)).is_ok());
    }

    #[test]
    fn purge_drops_stale_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = datetime!(2024-05-01 12:00 UTC);
        limiter.check("ana", t0).unwrap();
        limiter.check("ben", t0 + time::Duration::seconds(30)).unwrap();
        limiter.purge_expired(t0 + time::Duration::seconds(70));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn stale_keys_are_swept_by_later_checks() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = datetime!(2024-05-01 12:00 UTC);
        for i in 0..10_000 {
            limiter.check(&format!("user-{i}"), t0).unwrap();
        }
        assert_eq!(limiter.tracked_keys(), 10_000);

        limiter.check("late", t0 + time::Duration::hours(1)).unwrap();
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn sweep_keeps_windows_still_open() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = datetime!(2024-05-01 12:00 UTC);
        limiter.check("ana", t0).unwrap();
        limiter.check("ben", t0 + time::Duration::seconds(50)).unwrap();

        // Sweep runs here; ben's window is still open and keeps its count.
        limiter.check("cy", t0 + time::Duration::seconds(70)).unwrap();
        assert_eq!(limiter.tracked_keys(), 2);
        assert!(limiter.check("ben", t0 + time::Duration::seconds(75)).is_err());
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(RetryAfter(Duration::from_millis(1500)).as_secs_ceil(), 2);
        assert_eq!(RetryAfter(Duration::ZERO).as_secs_ceil(), 1);
    }
}
