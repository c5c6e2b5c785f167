//! Shuffle-based and time-based achievement triggers.
//!
//! Every check is a pure predicate: shuffle checks look only at the card
//! slice they are handed, time checks only at the timestamp they are handed.
//! Nothing here reads the system clock.

use time::{Month, PrimitiveDateTime, Weekday};

use crate::shuffle_engine::{
    evaluator::{blackjack_total, is_royal_sequence},
    models::{Card, Rank},
    patterns::{is_canonical_order, is_symmetric},
};

const ALL_ACES_REACH: usize = 13;
const TRIPLE_ACES_REACH: usize = 5;
const SUIT_STREAK_LEN: usize = 5;
const FACE_PARADE_LEN: usize = 5;
const LUCKY_SEVEN_INDEX: usize = 6;

// ---------------------------------------------------------------------------
// Shuffle checks
// ---------------------------------------------------------------------------

/// All four aces within the first 13 cards.
pub fn has_all_aces(cards: &[Card]) -> bool {
    count_aces(first(cards, ALL_ACES_REACH)) == 4
}

/// At least three aces within the first five cards.
pub fn has_triple_aces(cards: &[Card]) -> bool {
    count_aces(first(cards, TRIPLE_ACES_REACH)) >= 3
}

/// Five adjacent cards of one suit anywhere in the deck.
pub fn has_suit_streak(cards: &[Card]) -> bool {
    cards
        .windows(SUIT_STREAK_LEN)
        .any(|w| w.iter().all(|c| c.suit == w[0].suit))
}

/// 10-J-Q-K-A of one suit, adjacent and ascending, anywhere in the deck.
pub fn has_royal_sequence(cards: &[Card]) -> bool {
    cards.windows(5).any(is_royal_sequence)
}

pub fn is_perfect_order(cards: &[Card]) -> bool {
    is_canonical_order(cards)
}

pub fn is_perfect_alternation(cards: &[Card]) -> bool {
    is_symmetric(cards)
}

/// The first two cards make 21.
pub fn has_blackjack_start(cards: &[Card]) -> bool {
    cards.len() >= 2 && blackjack_total(&cards[..2]) == 21
}

/// The first five cards are all Jacks, Queens or Kings.
pub fn has_face_parade(cards: &[Card]) -> bool {
    cards.len() >= FACE_PARADE_LEN && cards[..FACE_PARADE_LEN].iter().all(|c| c.rank.is_face())
}

/// A seven in the seventh slot.
pub fn has_lucky_seven(cards: &[Card]) -> bool {
    cards.get(LUCKY_SEVEN_INDEX).is_some_and(|c| c.rank == Rank::SEVEN)
}

fn first(cards: &[Card], n: usize) -> &[Card] {
    &cards[..cards.len().min(n)]
}

fn count_aces(cards: &[Card]) -> usize {
    cards.iter().filter(|c| c.is_ace()).count()
}

/// One entry in the shuffle check battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuffleCheck {
    AllAces,
    TripleAces,
    SuitStreak,
    RoyalSequence,
    PerfectOrder,
    PerfectAlternation,
    BlackjackStart,
    FaceParade,
    LuckySeven,
}

impl ShuffleCheck {
    pub const ALL: [ShuffleCheck; 9] = [
        ShuffleCheck::AllAces,
        ShuffleCheck::TripleAces,
        ShuffleCheck::SuitStreak,
        ShuffleCheck::RoyalSequence,
        ShuffleCheck::PerfectOrder,
        ShuffleCheck::PerfectAlternation,
        ShuffleCheck::BlackjackStart,
        ShuffleCheck::FaceParade,
        ShuffleCheck::LuckySeven,
    ];

    /// Achievement id granted when the check holds.
    pub fn achievement_id(self) -> &'static str {
        match self {
            ShuffleCheck::AllAces            => "all_aces",
            ShuffleCheck::TripleAces         => "triple_aces",
            ShuffleCheck::SuitStreak         => "suit_streak",
            ShuffleCheck::RoyalSequence      => "royal_sequence",
            ShuffleCheck::PerfectOrder       => "perfect_order",
            ShuffleCheck::PerfectAlternation => "perfect_alternation",
            ShuffleCheck::BlackjackStart     => "blackjack_start",
            ShuffleCheck::FaceParade         => "face_parade",
            ShuffleCheck::LuckySeven         => "lucky_seven",
        }
    }

    pub fn holds(self, cards: &[Card]) -> bool {
        match self {
            ShuffleCheck::AllAces            => has_all_aces(cards),
            ShuffleCheck::TripleAces         => has_triple_aces(cards),
            ShuffleCheck::SuitStreak         => has_suit_streak(cards),
            ShuffleCheck::RoyalSequence      => has_royal_sequence(cards),
            ShuffleCheck::PerfectOrder       => is_perfect_order(cards),
            ShuffleCheck::PerfectAlternation => is_perfect_alternation(cards),
            ShuffleCheck::BlackjackStart     => has_blackjack_start(cards),
            ShuffleCheck::FaceParade         => has_face_parade(cards),
            ShuffleCheck::LuckySeven         => has_lucky_seven(cards),
        }
    }
}

/// Run the whole battery and return the ids of every check that fires.
pub fn check_shuffle_achievements(cards: &[Card]) -> Vec<&'static str> {
    ShuffleCheck::ALL
        .iter()
        .filter(|check| check.holds(cards))
        .map(|check| check.achievement_id())
        .collect()
}

// ---------------------------------------------------------------------------
// Time checks
// ---------------------------------------------------------------------------

/// Calendar and clock flags for one wall-clock moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBasedAchievements {
    /// 00:00 to 03:59.
    pub is_night_owl: bool,
    /// 05:00 to 06:59.
    pub is_early_bird: bool,
    /// Any time during the midnight hour.
    pub is_midnight: bool,
    /// Exactly on the hour (minute and second zero).
    pub is_top_of_hour: bool,
    pub is_weekend: bool,
    pub is_friday_13th: bool,
    pub is_leap_day: bool,
    pub is_new_years_day: bool,
    pub is_christmas: bool,
    pub is_halloween: bool,
    pub is_pi_day: bool,
    /// `YYYYMMDD` reads the same backwards.
    pub is_palindrome_date: bool,
}

/// Which flag of [`TimeBasedAchievements`] a catalog entry depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeCheck {
    NightOwl,
    EarlyBird,
    Midnight,
    TopOfHour,
    Weekend,
    Friday13th,
    LeapDay,
    NewYearsDay,
    Christmas,
    Halloween,
    PiDay,
    PalindromeDate,
}

impl TimeCheck {
    pub const ALL: [TimeCheck; 12] = [
        TimeCheck::NightOwl,
        TimeCheck::EarlyBird,
        TimeCheck::Midnight,
        TimeCheck::TopOfHour,
        TimeCheck::Weekend,
        TimeCheck::Friday13th,
        TimeCheck::LeapDay,
        TimeCheck::NewYearsDay,
        TimeCheck::Christmas,
        TimeCheck::Halloween,
        TimeCheck::PiDay,
        TimeCheck::PalindromeDate,
    ];

    pub fn achievement_id(self) -> &'static str {
        match self {
            TimeCheck::NightOwl       => "night_owl",
            TimeCheck::EarlyBird      => "early_bird",
            TimeCheck::Midnight       => "midnight_shuffler",
            TimeCheck::TopOfHour      => "top_of_the_hour",
            TimeCheck::Weekend        => "weekend_warrior",
            TimeCheck::Friday13th     => "friday_13th",
            TimeCheck::LeapDay        => "leap_day",
            TimeCheck::NewYearsDay    => "new_year",
            TimeCheck::Christmas      => "christmas",
            TimeCheck::Halloween      => "halloween",
            TimeCheck::PiDay          => "pi_day",
            TimeCheck::PalindromeDate => "palindrome_date",
        }
    }

    pub fn holds(self, flags: &TimeBasedAchievements) -> bool {
        match self {
            TimeCheck::NightOwl       => flags.is_night_owl,
            TimeCheck::EarlyBird      => flags.is_early_bird,
            TimeCheck::Midnight       => flags.is_midnight,
            TimeCheck::TopOfHour      => flags.is_top_of_hour,
            TimeCheck::Weekend        => flags.is_weekend,
            TimeCheck::Friday13th     => flags.is_friday_13th,
            TimeCheck::LeapDay        => flags.is_leap_day,
            TimeCheck::NewYearsDay    => flags.is_new_years_day,
            TimeCheck::Christmas      => flags.is_christmas,
            TimeCheck::Halloween      => flags.is_halloween,
            TimeCheck::PiDay          => flags.is_pi_day,
            TimeCheck::PalindromeDate => flags.is_palindrome_date,
        }
    }
}

impl TimeBasedAchievements {
    /// Ids of the time achievements these flags trigger, in check order.
    pub fn achievement_ids(&self) -> Vec<&'static str> {
        TimeCheck::ALL
            .iter()
            .filter(|check| check.holds(self))
            .map(|check| check.achievement_id())
            .collect()
    }
}

/// Derive every time flag from a local wall-clock timestamp.
pub fn check_time_based_achievements(at: PrimitiveDateTime) -> TimeBasedAchievements {
    let date = at.date();
    let (hour, minute, second) = (at.hour(), at.minute(), at.second());
    let (month, day) = (date.month(), date.day());

    TimeBasedAchievements {
        is_night_owl: hour < 4,
        is_early_bird: (5..7).contains(&hour),
        is_midnight: hour == 0,
        is_top_of_hour: minute == 0 && second == 0,
        is_weekend: matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday),
        is_friday_13th: date.weekday() == Weekday::Friday && day == 13,
        is_leap_day: month == Month::February && day == 29,
        is_new_years_day: month == Month::January && day == 1,
        is_christmas: month == Month::December && day == 25,
        is_halloween: month == Month::October && day == 31,
        is_pi_day: month == Month::March && day == 14,
        is_palindrome_date: is_palindrome_date(date),
    }
}

fn is_palindrome_date(date: time::Date) -> bool {
    let digits = format!("{:04}{:02}{:02}", date.year(), u8::from(date.month()), date.day());
    digits.chars().eq(digits.chars().rev())
}
