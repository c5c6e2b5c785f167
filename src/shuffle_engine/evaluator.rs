use crate::shuffle_engine::models::{Card, PatternType, Rank};

/// Poker-style classification of a contiguous card window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandRank {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl std::fmt::Display for HandRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandRank::HighCard      => write!(f, "High Card"),
            HandRank::Pair          => write!(f, "Pair"),
            HandRank::TwoPair       => write!(f, "Two Pair"),
            HandRank::ThreeOfAKind  => write!(f, "Three of a Kind"),
            HandRank::Straight      => write!(f, "Straight"),
            HandRank::Flush         => write!(f, "Flush"),
            HandRank::FullHouse     => write!(f, "Full House"),
            HandRank::FourOfAKind   => write!(f, "Four of a Kind"),
            HandRank::StraightFlush => write!(f, "Straight Flush"),
            HandRank::RoyalFlush    => write!(f, "Royal Flush"),
        }
    }
}

impl HandRank {
    /// Pattern category reported for this hand. High card and pair are too
    /// common to be worth reporting.
    pub fn pattern_type(self) -> Option<PatternType> {
        match self {
            HandRank::HighCard | HandRank::Pair => None,
            HandRank::TwoPair       => Some(PatternType::TwoPair),
            HandRank::ThreeOfAKind  => Some(PatternType::ThreeOfAKind),
            HandRank::Straight      => Some(PatternType::Straight),
            HandRank::Flush         => Some(PatternType::Flush),
            HandRank::FullHouse     => Some(PatternType::FullHouse),
            HandRank::FourOfAKind   => Some(PatternType::FourOfAKind),
            HandRank::StraightFlush => Some(PatternType::StraightFlush),
            HandRank::RoyalFlush    => Some(PatternType::RoyalFlush),
        }
    }
}

/// Classify a 5-card window as its single best poker hand.
pub fn classify_window(window: &[Card]) -> HandRank {
    let flush = is_flush(window) && window.len() == 5;
    let straight = is_straight(window);

    if is_royal_sequence(window) {
        return HandRank::RoyalFlush;
    }
    if flush && straight {
        return HandRank::StraightFlush;
    }

    match count_profile(window).as_slice() {
        [4, ..] => HandRank::FourOfAKind,
        [3, 2, ..] => HandRank::FullHouse,
        _ if flush => HandRank::Flush,
        _ if straight => HandRank::Straight,
        [3, ..] => HandRank::ThreeOfAKind,
        [2, 2, ..] => HandRank::TwoPair,
        [2, ..] => HandRank::Pair,
        _ => HandRank::HighCard,
    }
}

/// Occurrences per rank value, indexed 1..=13 (slot 0 unused).
pub fn rank_counts(cards: &[Card]) -> [u8; 14] {
    let mut counts = [0u8; 14];
    for c in cards {
        if let Some(slot) = counts.get_mut(c.rank.0 as usize) {
            *slot += 1;
        }
    }
    counts
}

/// Non-zero rank multiplicities, largest first (e.g. `[3, 2]` for a full house).
fn count_profile(cards: &[Card]) -> Vec<u8> {
    let mut profile: Vec<u8> = rank_counts(cards).into_iter().filter(|&n| n > 0).collect();
    profile.sort_unstable_by(|a, b| b.cmp(a));
    profile
}

/// True if every card shares one suit.
pub fn is_flush(cards: &[Card]) -> bool {
    match cards.first() {
        Some(first) => cards.iter().all(|c| c.suit == first.suit),
        None => false,
    }
}

/// True if 5 cards hold 5 sequential ranks in any order. Ace plays low
/// (A-2-3-4-5) or high (10-J-Q-K-A).
pub fn is_straight(cards: &[Card]) -> bool {
    if cards.len() != 5 {
        return false;
    }
    let mut values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() != 5 {
        return false;
    }
    values[4] - values[0] == 4 || values == [1, 10, 11, 12, 13]
}

/// True if the cards are exactly 10-J-Q-K-A of one suit, in that order.
pub fn is_royal_sequence(cards: &[Card]) -> bool {
    const ROYAL: [Rank; 5] = [Rank::TEN, Rank::JACK, Rank::QUEEN, Rank::KING, Rank::ACE];
    cards.len() == 5
        && is_flush(cards)
        && cards.iter().zip(ROYAL.iter()).all(|(c, r)| c.rank == *r)
}

/// Blackjack total: face cards 10, Aces 11 unless that busts, then 1.
pub fn blackjack_total(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(|c| c.blackjack_value() as u32).sum();
    let mut soft_aces = cards.iter().filter(|c| c.is_ace()).count();
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle_engine::models::{Card, Rank, Suit};

    fn card(r: u8, s: Suit) -> Card {
        Card::new(Rank(r), s)
    }

    #[test]
    fn high_card_and_pair() {
        let high = [
            card(2, Suit::Clubs), card(7, Suit::Diamonds), card(13, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&high), HandRank::HighCard);

        let pair = [
            card(2, Suit::Clubs), card(2, Suit::Diamonds), card(13, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&pair), HandRank::Pair);
        assert_eq!(HandRank::Pair.pattern_type(), None);
    }

    #[test]
    fn multiples_are_ranked() {
        let two_pair = [
            card(2, Suit::Clubs), card(2, Suit::Diamonds), card(9, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&two_pair), HandRank::TwoPair);

        let trips = [
            card(9, Suit::Clubs), card(2, Suit::Diamonds), card(9, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&trips), HandRank::ThreeOfAKind);

        let full_house = [
            card(9, Suit::Clubs), card(4, Suit::Diamonds), card(9, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&full_house), HandRank::FullHouse);

        let quads = [
            card(9, Suit::Clubs), card(9, Suit::Diamonds), card(9, Suit::Hearts),
            card(9, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&quads), HandRank::FourOfAKind);
    }

    #[test]
    fn straights_accept_both_ace_positions() {
        let wheel = [
            card(3, Suit::Clubs), card(1, Suit::Diamonds), card(5, Suit::Hearts),
            card(2, Suit::Spades), card(4, Suit::Clubs),
        ];
        assert_eq!(classify_window(&wheel), HandRank::Straight);

        let broadway = [
            card(13, Suit::Clubs), card(1, Suit::Diamonds), card(10, Suit::Hearts),
            card(12, Suit::Spades), card(11, Suit::Clubs),
        ];
        assert_eq!(classify_window(&broadway), HandRank::Straight);

        let wraparound = [
            card(12, Suit::Clubs), card(13, Suit::Diamonds), card(1, Suit::Hearts),
            card(2, Suit::Spades), card(3, Suit::Clubs),
        ];
        assert_eq!(classify_window(&wraparound), HandRank::HighCard);
    }

    #[test]
    fn flush_family() {
        let flush = [
            card(2, Suit::Hearts), card(7, Suit::Hearts), card(13, Suit::Hearts),
            card(9, Suit::Hearts), card(4, Suit::Hearts),
        ];
        assert_eq!(classify_window(&flush), HandRank::Flush);

        let straight_flush = [
            card(6, Suit::Spades), card(4, Suit::Spades), card(5, Suit::Spades),
            card(8, Suit::Spades), card(7, Suit::Spades),
        ];
        assert_eq!(classify_window(&straight_flush), HandRank::StraightFlush);

        let royal = [
            card(10, Suit::Clubs), card(11, Suit::Clubs), card(12, Suit::Clubs),
            card(13, Suit::Clubs), card(1, Suit::Clubs),
        ];
        assert_eq!(classify_window(&royal), HandRank::RoyalFlush);

        // Right cards, wrong order: only a straight flush.
        let scrambled = [
            card(1, Suit::Clubs), card(11, Suit::Clubs), card(12, Suit::Clubs),
            card(13, Suit::Clubs), card(10, Suit::Clubs),
        ];
        assert_eq!(classify_window(&scrambled), HandRank::StraightFlush);
    }

    #[test]
    fn blackjack_total_softens_aces() {
        assert_eq!(blackjack_total(&[card(1, Suit::Hearts), card(13, Suit::Spades)]), 21);
        assert_eq!(blackjack_total(&[card(1, Suit::Hearts), card(1, Suit::Spades)]), 12);
        assert_eq!(blackjack_total(&[card(10, Suit::Hearts), card(12, Suit::Spades)]), 20);
    }
}
