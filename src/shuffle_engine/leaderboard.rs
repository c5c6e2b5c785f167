use serde::Serialize;

use crate::shuffle_engine::models::UserStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based dense rank; users tied on every counter share a rank.
    pub rank: u32,
    pub user_id: String,
    pub total_shuffles: u32,
    pub achievements_count: u32,
    pub shuffle_streak: u32,
}

/// Order users by total shuffles, then achievements, then streak; user id
/// breaks remaining ties so the listing is stable.
pub fn rank_leaderboard(
    stats: impl IntoIterator<Item = (String, UserStats)>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(String, UserStats)> = stats.into_iter().collect();
    rows.sort_by(|(id_a, a), (id_b, b)| {
        b.total_shuffles
            .cmp(&a.total_shuffles)
            .then_with(|| b.achievements_count.cmp(&a.achievements_count))
            .then_with(|| b.shuffle_streak.cmp(&a.shuffle_streak))
            .then_with(|| id_a.cmp(id_b))
    });

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len().min(limit));
    let mut rank = 0u32;
    let mut previous: Option<(u32, u32, u32)> = None;
    for (user_id, s) in rows.into_iter().take(limit) {
        let key = (s.total_shuffles, s.achievements_count, s.shuffle_streak);
        if previous != Some(key) {
            rank += 1;
            previous = Some(key);
        }
        entries.push(LeaderboardEntry {
            rank,
            user_id,
            total_shuffles: s.total_shuffles,
            achievements_count: s.achievements_count,
            shuffle_streak: s.shuffle_streak,
        });
    }
    entries
}
