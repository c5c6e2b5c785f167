use std::collections::HashMap;

use time::Date;

use crate::shuffle_engine::models::{Card, CardFrequency, UserStats};

/// How many opening cards of each shuffle feed the frequency ranking.
pub const TOP_POSITIONS: usize = 5;

/// Streak after a shuffle on `today`, given the day of the previous one.
///
/// Same day keeps the streak, the next calendar day extends it, anything
/// else starts over at 1.
pub fn next_streak(last_shuffle_on: Option<Date>, today: Date, current: u32) -> u32 {
    match last_shuffle_on {
        Some(last) if last >= today => current.max(1),
        Some(last) if last.next_day() == Some(today) => current + 1,
        _ => 1,
    }
}

/// Snapshot after one more shuffle on `today`.
pub fn apply_shuffle(stats: &UserStats, today: Date) -> UserStats {
    UserStats {
        total_shuffles: stats.total_shuffles + 1,
        shuffle_streak: next_streak(stats.last_shuffle_on, today, stats.shuffle_streak),
        last_shuffle_on: Some(today.max(stats.last_shuffle_on.unwrap_or(today))),
        ..stats.clone()
    }
}

/// Rank the cards that most often open a shuffle across `history`.
///
/// Ties are broken by canonical deck order so the ranking is stable.
pub fn most_common_cards<'a, I>(history: I, top_n: usize) -> Vec<CardFrequency>
where
    I: IntoIterator<Item = &'a [Card]>,
{
    let mut counts: HashMap<Card, u32> = HashMap::new();
    for shuffle in history {
        for card in shuffle.iter().take(TOP_POSITIONS) {
            *counts.entry(*card).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<CardFrequency> = counts
        .into_iter()
        .map(|(mut card, count)| {
            card.index = 0;
            CardFrequency { card, count }
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.card.cmp(&b.card)));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle_engine::models::{Rank, Suit};
    use time::macros::date;

    #[test]
    fn streak_rules() {
        let today = date!(2024 - 03 - 10);
        assert_eq!(next_streak(None, today, 0), 1);
        assert_eq!(next_streak(Some(date!(2024 - 03 - 10)), today, 4), 4);
        assert_eq!(next_streak(Some(date!(2024 - 03 - 10)), today, 0), 1);
        assert_eq!(next_streak(Some(date!(2024 - 03 - 09)), today, 4), 5);
        assert_eq!(next_streak(Some(date!(2024 - 03 - 07)), today, 4), 1);
    }

    #[test]
    fn streak_crosses_month_and_year() {
        assert_eq!(next_streak(Some(date!(2024 - 02 - 29)), date!(2024 - 03 - 01), 2), 3);
        assert_eq!(next_streak(Some(date!(2023 - 12 - 31)), date!(2024 - 01 - 01), 9), 10);
    }

    #[test]
    fn apply_shuffle_counts_and_dates() {
        let stats = UserStats {
            total_shuffles: 9,
            shuffle_streak: 2,
            last_shuffle_on: Some(date!(2024 - 03 - 09)),
            ..UserStats::default()
        };
        let next = apply_shuffle(&stats, date!(2024 - 03 - 10));
        assert_eq!(next.total_shuffles, 10);
        assert_eq!(next.shuffle_streak, 3);
        assert_eq!(next.last_shuffle_on, Some(date!(2024 - 03 - 10)));
    }

    #[test]
    fn most_common_cards_ranks_openings() {
        let c = |r: u8, s: Suit| Card::new(Rank(r), s);
        let a = vec![c(1, Suit::Spades), c(2, Suit::Hearts), c(3, Suit::Hearts), c(4, Suit::Hearts), c(5, Suit::Hearts), c(13, Suit::Clubs)];
        let b = vec![c(9, Suit::Clubs), c(1, Suit::Spades), c(3, Suit::Hearts), c(7, Suit::Hearts), c(8, Suit::Hearts), c(13, Suit::Clubs)];
        let history = [a.as_slice(), b.as_slice()];

        let ranked = most_common_cards(history, 3);
        assert_eq!(ranked.len(), 3);
        // 3H and AS appear twice; 3H sorts first in deck order.
        assert_eq!(ranked[0].card, c(3, Suit::Hearts));
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].card, c(1, Suit::Spades));
        assert_eq!(ranked[2].count, 1);
        // King of clubs sits past the opening five and is never counted.
        assert!(most_common_cards(history, 52).iter().all(|f| f.card != c(13, Suit::Clubs)));
    }
}
