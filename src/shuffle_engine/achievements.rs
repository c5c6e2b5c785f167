//! Static achievement catalog and its evaluators.
//!
//! The catalog is reference data: declaration order is display order and
//! nothing here is ever mutated. Each entry names exactly one condition kind.
//! Pattern and time achievements only unlock from a real shuffle or a real
//! timestamp; aggregate stats never stand in for them.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use time::PrimitiveDateTime;

use crate::shuffle_engine::{
    achievement_checks::{check_time_based_achievements, ShuffleCheck, TimeCheck},
    models::{Card, UserStats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    ShuffleCount,
    Streak,
    Pattern,
    TimeBased,
    Special,
    Milestone,
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AchievementCategory::ShuffleCount => write!(f, "Shuffle Count"),
            AchievementCategory::Streak       => write!(f, "Streak"),
            AchievementCategory::Pattern      => write!(f, "Pattern"),
            AchievementCategory::TimeBased    => write!(f, "Time-Based"),
            AchievementCategory::Special      => write!(f, "Special"),
            AchievementCategory::Milestone    => write!(f, "Milestone"),
        }
    }
}

/// What has to be true for an achievement to unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    TotalShuffles(u32),
    Streak(u32),
    AchievementsCount(u32),
    SavedShuffles(u32),
    SharedShuffles(u32),
    Shuffle(ShuffleCheck),
    Time(TimeCheck),
}

impl Condition {
    /// Evaluate against aggregate stats. Shuffle and time conditions are
    /// never satisfied here.
    pub fn is_met_by(&self, stats: &UserStats) -> bool {
        match *self {
            Condition::TotalShuffles(n)     => stats.total_shuffles >= n,
            Condition::Streak(n)            => stats.shuffle_streak >= n,
            Condition::AchievementsCount(n) => stats.achievements_count >= n,
            Condition::SavedShuffles(n)     => stats.saved_shuffles >= n,
            Condition::SharedShuffles(n)    => stats.shared_shuffles >= n,
            Condition::Shuffle(_) | Condition::Time(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    #[serde(skip)]
    pub condition: Condition,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    condition: Condition,
) -> Achievement {
    Achievement { id, name, description, category, condition }
}

use AchievementCategory as Cat;

pub static ACHIEVEMENTS: [Achievement; 35] = [
    // Shuffle count
    entry("first_shuffle", "First Shuffle", "Shuffle the deck for the first time", Cat::ShuffleCount, Condition::TotalShuffles(1)),
    entry("novice_shuffler", "Novice Shuffler", "Shuffle the deck 10 times", Cat::ShuffleCount, Condition::TotalShuffles(10)),
    entry("card_enthusiast", "Card Enthusiast", "Shuffle the deck 50 times", Cat::ShuffleCount, Condition::TotalShuffles(50)),
    entry("shuffle_master", "Shuffle Master", "Shuffle the deck 100 times", Cat::ShuffleCount, Condition::TotalShuffles(100)),
    entry("deck_whisperer", "Deck Whisperer", "Shuffle the deck 500 times", Cat::ShuffleCount, Condition::TotalShuffles(500)),
    entry("legendary_shuffler", "Legendary Shuffler", "Shuffle the deck 1,000 times", Cat::ShuffleCount, Condition::TotalShuffles(1000)),
    // Streaks
    entry("streak_3", "Warming Up", "Shuffle on 3 consecutive days", Cat::Streak, Condition::Streak(3)),
    entry("streak_7", "Weekly Ritual", "Shuffle on 7 consecutive days", Cat::Streak, Condition::Streak(7)),
    entry("streak_30", "Devoted Dealer", "Shuffle on 30 consecutive days", Cat::Streak, Condition::Streak(30)),
    entry("streak_100", "Unbroken", "Shuffle on 100 consecutive days", Cat::Streak, Condition::Streak(100)),
    // Patterns
    entry("all_aces", "Ace Collector", "All four aces within the first 13 cards", Cat::Pattern, Condition::Shuffle(ShuffleCheck::AllAces)),
    entry("triple_aces", "Triple Aces", "Three aces within the first five cards", Cat::Pattern, Condition::Shuffle(ShuffleCheck::TripleAces)),
    entry("suit_streak", "Suited Up", "Five consecutive cards of the same suit", Cat::Pattern, Condition::Shuffle(ShuffleCheck::SuitStreak)),
    entry("royal_sequence", "Royal Procession", "10, J, Q, K, A of one suit in a row", Cat::Pattern, Condition::Shuffle(ShuffleCheck::RoyalSequence)),
    entry("perfect_order", "Back in the Box", "A shuffle that comes out in perfect suit order", Cat::Pattern, Condition::Shuffle(ShuffleCheck::PerfectOrder)),
    entry("perfect_alternation", "Checkerboard", "Red and black alternate through the whole deck", Cat::Pattern, Condition::Shuffle(ShuffleCheck::PerfectAlternation)),
    entry("blackjack_start", "Natural 21", "The first two cards make blackjack", Cat::Pattern, Condition::Shuffle(ShuffleCheck::BlackjackStart)),
    entry("face_parade", "Face Parade", "The first five cards are all face cards", Cat::Pattern, Condition::Shuffle(ShuffleCheck::FaceParade)),
    entry("lucky_seven", "Lucky Seven", "A seven lands in the seventh position", Cat::Pattern, Condition::Shuffle(ShuffleCheck::LuckySeven)),
    // Time
    entry("night_owl", "Night Owl", "Shuffle between midnight and 4 AM", Cat::TimeBased, Condition::Time(TimeCheck::NightOwl)),
    entry("early_bird", "Early Bird", "Shuffle between 5 and 7 AM", Cat::TimeBased, Condition::Time(TimeCheck::EarlyBird)),
    entry("midnight_shuffler", "Midnight Shuffler", "Shuffle during the midnight hour", Cat::TimeBased, Condition::Time(TimeCheck::Midnight)),
    entry("top_of_the_hour", "Right on Time", "Shuffle exactly on the hour", Cat::TimeBased, Condition::Time(TimeCheck::TopOfHour)),
    entry("weekend_warrior", "Weekend Warrior", "Shuffle on a Saturday or Sunday", Cat::TimeBased, Condition::Time(TimeCheck::Weekend)),
    entry("friday_13th", "Unlucky Day", "Shuffle on a Friday the 13th", Cat::TimeBased, Condition::Time(TimeCheck::Friday13th)),
    entry("leap_day", "Leap of Faith", "Shuffle on February 29th", Cat::TimeBased, Condition::Time(TimeCheck::LeapDay)),
    entry("new_year", "Fresh Deck", "Shuffle on New Year's Day", Cat::TimeBased, Condition::Time(TimeCheck::NewYearsDay)),
    entry("christmas", "Holiday Dealer", "Shuffle on Christmas Day", Cat::TimeBased, Condition::Time(TimeCheck::Christmas)),
    entry("halloween", "Spooky Shuffle", "Shuffle on Halloween", Cat::TimeBased, Condition::Time(TimeCheck::Halloween)),
    entry("pi_day", "Pi Day", "Shuffle on March 14th", Cat::TimeBased, Condition::Time(TimeCheck::PiDay)),
    entry("palindrome_date", "Mirror Date", "Shuffle on a date that reads the same backwards", Cat::TimeBased, Condition::Time(TimeCheck::PalindromeDate)),
    // Special
    entry("first_save", "Keeper", "Save a shuffle", Cat::Special, Condition::SavedShuffles(1)),
    entry("first_share", "Show-Off", "Share a shuffle", Cat::Special, Condition::SharedShuffles(1)),
    // Milestones
    entry("collector_5", "Collector", "Unlock 5 achievements", Cat::Milestone, Condition::AchievementsCount(5)),
    entry("collector_15", "Completionist", "Unlock 15 achievements", Cat::Milestone, Condition::AchievementsCount(15)),
];

pub fn catalog() -> &'static [Achievement] {
    &ACHIEVEMENTS
}

pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Every catalog entry whose condition holds for `stats`, in catalog order.
pub fn get_unlocked_achievements(stats: &UserStats) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.condition.is_met_by(stats))
        .collect()
}

/// Achievements newly earned by this event, excluding `already_unlocked`.
///
/// `cards` enables the shuffle battery and `at` the time checks; pass `None`
/// for events without a shuffle (saving, sharing). Milestones are settled
/// last so achievements earned in this same call count toward them.
pub fn evaluate_new_achievements(
    stats: &UserStats,
    cards: Option<&[Card]>,
    at: Option<PrimitiveDateTime>,
    already_unlocked: &HashSet<String>,
) -> Vec<&'static Achievement> {
    let time_flags = at.map(check_time_based_achievements);

    let mut earned: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !matches!(a.condition, Condition::AchievementsCount(_)))
        .filter(|a| !already_unlocked.contains(a.id))
        .filter(|a| match a.condition {
            Condition::Shuffle(check) => cards.is_some_and(|c| check.holds(c)),
            Condition::Time(check) => time_flags.as_ref().is_some_and(|f| check.holds(f)),
            other => other.is_met_by(stats),
        })
        .collect();

    let held = stats.achievements_count.max(already_unlocked.len() as u32);
    let projected = UserStats {
        achievements_count: held + earned.len() as u32,
        ..stats.clone()
    };
    earned.extend(
        ACHIEVEMENTS
            .iter()
            .filter(|a| matches!(a.condition, Condition::AchievementsCount(_)))
            .filter(|a| !already_unlocked.contains(a.id))
            .filter(|a| a.condition.is_met_by(&projected)),
    );

    // Restore catalog order after the two passes.
    earned.sort_by_key(|a| catalog_position(a.id));
    earned
}

fn catalog_position(id: &str) -> usize {
    ACHIEVEMENTS.iter().position(|a| a.id == id).unwrap_or(usize::MAX)
}

/// An achievement paired with whether the viewer has unlocked it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

/// The whole catalog with unlocked flags, for display.
pub fn achievement_statuses(unlocked: &HashSet<String>) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|achievement| AchievementStatus {
            achievement,
            unlocked: unlocked.contains(achievement.id),
        })
        .collect()
}
