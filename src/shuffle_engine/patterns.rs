//! Pattern detection over a full deck ordering.
//!
//! Three families of checks run over the same card slice:
//!
//! - **global**: properties of the whole ordering (colour alternation,
//!   canonical order, value runs, the opening suit parade)
//! - **windowed**: every contiguous 5-card window is classified on its own as
//!   a poker hand; overlapping windows are reported separately
//! - **positional**: fixed slots or fixed-length openings (a seven in slot 7,
//!   an all-even opening, all four queens early, a blackjack deal)

use std::collections::HashSet;

use crate::shuffle_engine::{
    deck::DECK_SIZE,
    evaluator::{blackjack_total, classify_window, HandRank},
    models::{Card, Pattern, PatternType, Rank},
};

/// Width of the windows scanned for poker hands.
pub const WINDOW_SIZE: usize = 5;

const MIN_RUN_LEN: usize = 5;
const SUIT_PARADE_LEN: usize = 4;
const LUCKY_SEVEN_INDEX: usize = 6;
const EVEN_START_LEN: usize = 5;
const QUEENS_COURT_LEN: usize = 10;

/// Report every recognised pattern in `cards`.
pub fn find_patterns(cards: &[Card]) -> Vec<Pattern> {
    let mut found = Vec::new();
    global_patterns(cards, &mut found);
    windowed_patterns(cards, &mut found);
    positional_patterns(cards, &mut found);
    found
}

fn pattern(
    id: &str,
    name: &str,
    description: impl Into<String>,
    pattern_type: PatternType,
    indices: Option<Vec<usize>>,
) -> Pattern {
    Pattern {
        id: id.to_string(),
        name: name.to_string(),
        description: description.into(),
        pattern_type,
        indices,
    }
}

// ---------------------------------------------------------------------------
// Global
// ---------------------------------------------------------------------------

fn global_patterns(cards: &[Card], out: &mut Vec<Pattern>) {
    if is_symmetric(cards) {
        out.push(pattern(
            "symmetric",
            "Perfect Symmetry",
            "Red and black alternate across the entire deck",
            PatternType::Legendary,
            None,
        ));
    }

    if is_canonical_order(cards) {
        out.push(pattern(
            "perfect_order",
            "Perfect Order",
            "Every suit in order, Ace through King, exactly as the box packs it",
            PatternType::Legendary,
            None,
        ));
    }

    if let Some(opening) = cards.get(..SUIT_PARADE_LEN) {
        let suits: HashSet<_> = opening.iter().map(|c| c.suit).collect();
        if suits.len() == 4 {
            out.push(pattern(
                "suit_parade",
                "Suit Parade",
                "All four suits appear in the first four cards",
                PatternType::Special,
                Some((0..SUIT_PARADE_LEN).collect()),
            ));
        }
    }

    for (start, len) in value_runs(cards, 1) {
        out.push(run_pattern(cards, start, len, "ascending_run", "Ascending Run", "climbing"));
    }
    for (start, len) in value_runs(cards, -1) {
        out.push(run_pattern(cards, start, len, "descending_run", "Descending Run", "falling"));
    }
}

/// Red/black alternation across a complete deck.
pub fn is_symmetric(cards: &[Card]) -> bool {
    cards.len() == DECK_SIZE && cards.windows(2).all(|w| w[0].color() != w[1].color())
}

/// Exactly the order produced by `create_deck`.
pub fn is_canonical_order(cards: &[Card]) -> bool {
    cards.len() == DECK_SIZE
        && cards
            .iter()
            .enumerate()
            .all(|(pos, c)| c.canonical_position() == pos)
}

/// Maximal stretches of adjacent cards whose values change by `step`,
/// returned as `(start, len)` when at least `MIN_RUN_LEN` long.
fn value_runs(cards: &[Card], step: i8) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=cards.len() {
        let continues = i < cards.len()
            && cards[i].value() as i8 - cards[i - 1].value() as i8 == step;
        if !continues {
            if i - start >= MIN_RUN_LEN {
                runs.push((start, i - start));
            }
            start = i;
        }
    }
    runs
}

fn run_pattern(
    cards: &[Card],
    start: usize,
    len: usize,
    id: &str,
    name: &str,
    verb: &str,
) -> Pattern {
    let first = cards[start];
    let last = cards[start + len - 1];
    pattern(
        id,
        name,
        format!("{len} cards {verb} from {first} to {last}"),
        PatternType::Sequence,
        Some((start..start + len).collect()),
    )
}

// ---------------------------------------------------------------------------
// Windowed
// ---------------------------------------------------------------------------

fn windowed_patterns(cards: &[Card], out: &mut Vec<Pattern>) {
    for (start, window) in cards.windows(WINDOW_SIZE).enumerate() {
        let hand = classify_window(window);
        let Some(pattern_type) = hand.pattern_type() else {
            continue;
        };
        let shown: Vec<String> = window.iter().map(|c| c.to_string()).collect();
        out.push(pattern(
            hand_id(hand),
            &hand.to_string(),
            format!("{} at positions {}-{}: {}", hand, start + 1, start + WINDOW_SIZE, shown.join(" ")),
            pattern_type,
            Some((start..start + WINDOW_SIZE).collect()),
        ));
    }
}

fn hand_id(hand: HandRank) -> &'static str {
    match hand {
        HandRank::HighCard      => "high_card",
        HandRank::Pair          => "pair",
        HandRank::TwoPair       => "two_pair",
        HandRank::ThreeOfAKind  => "three_of_a_kind",
        HandRank::Straight      => "straight",
        HandRank::Flush         => "flush",
        HandRank::FullHouse     => "full_house",
        HandRank::FourOfAKind   => "four_of_a_kind",
        HandRank::StraightFlush => "straight_flush",
        HandRank::RoyalFlush    => "royal_flush",
    }
}

// ---------------------------------------------------------------------------
// Positional
// ---------------------------------------------------------------------------

fn positional_patterns(cards: &[Card], out: &mut Vec<Pattern>) {
    if cards.get(LUCKY_SEVEN_INDEX).is_some_and(|c| c.rank == Rank::SEVEN) {
        out.push(pattern(
            "lucky_seven",
            "Lucky Seven",
            "A seven landed in the seventh position",
            PatternType::Special,
            Some(vec![LUCKY_SEVEN_INDEX]),
        ));
    }

    if let Some(opening) = cards.get(..EVEN_START_LEN) {
        if opening.iter().all(|c| c.rank.is_even()) {
            out.push(pattern(
                "even_start",
                "Even Start",
                "The first five cards are all even ranks",
                PatternType::Special,
                Some((0..EVEN_START_LEN).collect()),
            ));
        }
    }

    if let Some(opening) = cards.get(..QUEENS_COURT_LEN) {
        let queens: Vec<usize> = opening
            .iter()
            .enumerate()
            .filter(|(_, c)| c.rank == Rank::QUEEN)
            .map(|(i, _)| i)
            .collect();
        if queens.len() == 4 {
            out.push(pattern(
                "queens_court",
                "Queens' Court",
                "All four queens appear in the first ten cards",
                PatternType::Legendary,
                Some(queens),
            ));
        }
    }

    if let Some(deal) = cards.get(..2) {
        if blackjack_total(deal) == 21 {
            out.push(pattern(
                "blackjack",
                "Blackjack",
                format!("{} and {} open the deck for 21", deal[0], deal[1]),
                PatternType::Special,
                Some(vec![0, 1]),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle_engine::deck::create_deck;
    use crate::shuffle_engine::models::Suit;

    fn card(r: u8, s: Suit) -> Card {
        Card::new(Rank(r), s)
    }

    fn ids(patterns: &[Pattern]) -> Vec<&str> {
        patterns.iter().map(|p| p.id.as_str()).collect()
    }

    /// Position i holds suit (i mod 4) and value (5i mod 13) + 1. By the
    /// Chinese remainder theorem this visits all 52 cards, and no 5-card
    /// window repeats a rank, shares a suit or forms a straight.
    fn scattered_deck() -> Vec<Card> {
        (0..DECK_SIZE)
            .map(|i| {
                let mut c = card(((i * 5) % 13) as u8 + 1, Suit::ALL[i % 4]);
                c.index = i as u8;
                c
            })
            .collect()
    }

    /// Hearts and clubs interleaved, then diamonds and spades.
    fn alternating_deck() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for (red, black) in [(Suit::Hearts, Suit::Clubs), (Suit::Diamonds, Suit::Spades)] {
            for r in 1..=13u8 {
                cards.push(card(r, red));
                cards.push(card(r, black));
            }
        }
        cards
    }

    #[test]
    fn canonical_deck_is_perfect_order() {
        let deck = create_deck();
        let found = find_patterns(deck.cards());
        assert!(ids(&found).contains(&"perfect_order"));
        assert!(!ids(&found).contains(&"symmetric"));

        // Each suit is a 13-card ascending run.
        let runs: Vec<&Pattern> = found.iter().filter(|p| p.id == "ascending_run").collect();
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0].indices.as_deref(), Some(&(0..13).collect::<Vec<_>>()[..]));
    }

    #[test]
    fn alternating_colours_are_symmetric() {
        let found = find_patterns(&alternating_deck());
        assert!(ids(&found).contains(&"symmetric"));
        assert!(!ids(&found).contains(&"perfect_order"));
    }

    #[test]
    fn scattered_deck_is_nearly_silent() {
        let deck = scattered_deck();
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);

        let found = find_patterns(&deck);
        assert_eq!(ids(&found), vec!["suit_parade"]);
    }

    #[test]
    fn overlapping_straights_are_reported_per_window() {
        // 2..8 of mixed suits: windows at 0, 1, 2 are each a straight.
        let suits = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];
        let cards: Vec<Card> = (2..=8u8).map(|r| card(r, suits[r as usize % 4])).collect();
        let straights: Vec<Pattern> = find_patterns(&cards)
            .into_iter()
            .filter(|p| p.pattern_type == PatternType::Straight)
            .collect();
        assert_eq!(straights.len(), 3);
        assert_eq!(straights[0].indices, Some(vec![0, 1, 2, 3, 4]));
        assert_eq!(straights[2].indices, Some(vec![2, 3, 4, 5, 6]));
    }

    #[test]
    fn royal_flush_in_order_is_detected() {
        let cards = vec![
            card(3, Suit::Hearts),
            card(10, Suit::Spades), card(11, Suit::Spades), card(12, Suit::Spades),
            card(13, Suit::Spades), card(1, Suit::Spades),
        ];
        let found = find_patterns(&cards);
        let royal = found.iter().find(|p| p.pattern_type == PatternType::RoyalFlush);
        assert_eq!(royal.and_then(|p| p.indices.clone()), Some(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn positional_openings() {
        let mut cards = vec![
            card(2, Suit::Hearts), card(4, Suit::Hearts), card(6, Suit::Clubs),
            card(8, Suit::Spades), card(10, Suit::Diamonds), card(3, Suit::Clubs),
            card(7, Suit::Diamonds),
        ];
        let found = find_patterns(&cards);
        assert!(ids(&found).contains(&"even_start"));
        assert!(ids(&found).contains(&"lucky_seven"));

        cards[0] = card(1, Suit::Spades);
        cards[1] = card(12, Suit::Hearts);
        let found = find_patterns(&cards);
        assert!(ids(&found).contains(&"blackjack"));
        assert!(!ids(&found).contains(&"even_start"));
    }

    #[test]
    fn queens_court_needs_all_four_early() {
        let mut cards: Vec<Card> = vec![
            card(12, Suit::Hearts), card(2, Suit::Clubs), card(12, Suit::Clubs),
            card(5, Suit::Hearts), card(12, Suit::Spades), card(9, Suit::Diamonds),
            card(3, Suit::Spades), card(12, Suit::Diamonds), card(4, Suit::Clubs),
            card(6, Suit::Hearts),
        ];
        let found = find_patterns(&cards);
        let court = found.iter().find(|p| p.id == "queens_court");
        assert_eq!(court.and_then(|p| p.indices.clone()), Some(vec![0, 2, 4, 7]));

        let late_queen = cards.remove(7);
        cards.push(card(8, Suit::Clubs));
        cards.push(late_queen);
        assert!(!ids(&find_patterns(&cards)).contains(&"queens_court"));
    }

    #[test]
    fn short_input_yields_nothing_out_of_reach() {
        assert!(find_patterns(&[]).is_empty());
        assert!(find_patterns(&[card(1, Suit::Hearts)]).is_empty());
    }
}
