use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use time::Date;

// ---------------------------------------------------------------------------
// Card primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// Canonical suit order used by [`create_deck`](super::deck::create_deck).
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Position of the suit in canonical deck order.
    pub fn ordinal(self) -> usize {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Clubs => 2,
            Suit::Spades => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Hearts => write!(f, "H"),
            Suit::Diamonds => write!(f, "D"),
            Suit::Clubs => write!(f, "C"),
            Suit::Spades => write!(f, "S"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Rank 1..=13 where 1 = Ace and 13 = King.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rank(pub u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const SEVEN: Rank = Rank(7);
    pub const TEN: Rank = Rank(10);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);

    pub fn symbol(self) -> &'static str {
        match self.0 {
            1 => "A", 2 => "2", 3 => "3", 4 => "4", 5 => "5",
            6 => "6", 7 => "7", 8 => "8", 9 => "9", 10 => "10",
            11 => "J", 12 => "Q", 13 => "K",
            _ => "?",
        }
    }

    /// Ordering value: Ace = 1 through King = 13.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Value used in sum contexts: Ace counts 11, face cards 10.
    pub fn blackjack_value(self) -> u8 {
        match self.0 {
            1 => 11,
            11..=13 => 10,
            v => v,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self.0, 11..=13)
    }

    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A playing card plus its current position in the deck.
///
/// Equality and hashing only look at suit and rank; `index` is positional
/// bookkeeping rewritten on every shuffle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub index: u8,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit, index: 0 }
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn blackjack_value(&self) -> u8 {
        self.rank.blackjack_value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::ACE
    }

    /// Position this card occupies in a freshly created deck.
    pub fn canonical_position(&self) -> usize {
        self.suit.ordinal() * 13 + (self.rank.0 as usize).saturating_sub(1)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
        self.suit.hash(state);
    }
}

// Suit-major, then ascending rank: the order of a fresh deck.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.suit.cmp(&other.suit) {
            Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Sequence,
    Straight,
    Flush,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    StraightFlush,
    RoyalFlush,
    TwoPair,
    Special,
    Legendary,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternType::Sequence      => "sequence",
            PatternType::Straight      => "straight",
            PatternType::Flush         => "flush",
            PatternType::ThreeOfAKind  => "three_of_a_kind",
            PatternType::FourOfAKind   => "four_of_a_kind",
            PatternType::FullHouse     => "full_house",
            PatternType::StraightFlush => "straight_flush",
            PatternType::RoyalFlush    => "royal_flush",
            PatternType::TwoPair       => "two_pair",
            PatternType::Special       => "special",
            PatternType::Legendary     => "legendary",
        };
        write!(f, "{}", s)
    }
}

/// A structural property detected in a deck ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Positions of the cards involved; `None` for whole-deck patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
}

// ---------------------------------------------------------------------------
// User statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFrequency {
    pub card: Card,
    pub count: u32,
}

/// Aggregate per-user counters, as read from the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_shuffles: u32,
    pub shuffle_streak: u32,
    pub achievements_count: u32,
    #[serde(default)]
    pub most_common_cards: Vec<CardFrequency>,
    #[serde(default)]
    pub saved_shuffles: u32,
    #[serde(default)]
    pub shared_shuffles: u32,
    #[serde(default)]
    pub last_shuffle_on: Option<Date>,
}
