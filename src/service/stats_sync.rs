//! Displayed user stats with optimistic local updates.
//!
//! A view starts `Stale`. Local events bump the displayed counters right
//! away and move to `Optimistic`; a successful fetch replaces everything with
//! the server snapshot and moves to `Reconciled`. On conflict the server
//! value always wins, local bumps are never merged into it.

use time::Date;
use tracing::debug;

use crate::shuffle_engine::{models::UserStats, stats::apply_shuffle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing confirmed since the last invalidation.
    Stale,
    /// Displaying local updates the server has not confirmed.
    Optimistic,
    /// Displaying exactly the last server snapshot.
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    FetchSucceeded(UserStats),
    FetchFailed,
    LocalShuffle { today: Date },
    LocalAchievements(u32),
    /// The cached snapshot is known to be out of date.
    Invalidated,
}

#[derive(Debug, Clone)]
pub struct StatsView {
    state: SyncState,
    displayed: UserStats,
    /// Last snapshot received from the server, if any.
    confirmed: Option<UserStats>,
}

impl Default for StatsView {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsView {
    pub fn new() -> Self {
        StatsView {
            state: SyncState::Stale,
            displayed: UserStats::default(),
            confirmed: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn displayed(&self) -> &UserStats {
        &self.displayed
    }

    pub fn confirmed(&self) -> Option<&UserStats> {
        self.confirmed.as_ref()
    }

    /// Feed one event and return the resulting state.
    pub fn apply(&mut self, event: SyncEvent) -> SyncState {
        let from = self.state;
        self.state = match event {
            SyncEvent::FetchSucceeded(server) => {
                self.displayed = server.clone();
                self.confirmed = Some(server);
                SyncState::Reconciled
            }
            // Keep showing whatever we have; unconfirmed local bumps stay
            // optimistic until a fetch lands.
            SyncEvent::FetchFailed => match from {
                SyncState::Optimistic => SyncState::Optimistic,
                SyncState::Reconciled | SyncState::Stale => SyncState::Stale,
            },
            SyncEvent::LocalShuffle { today } => {
                self.displayed = apply_shuffle(&self.displayed, today);
                SyncState::Optimistic
            }
            SyncEvent::LocalAchievements(0) => from,
            SyncEvent::LocalAchievements(n) => {
                self.displayed.achievements_count += n;
                SyncState::Optimistic
            }
            SyncEvent::Invalidated => SyncState::Stale,
        };
        if from != self.state {
            debug!(?from, to = ?self.state, "stats view transition");
        }
        self.state
    }
}
