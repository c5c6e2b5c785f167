use rand::Rng;
use serde::Serialize;

use crate::shuffle_engine::models::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 52;

/// An ordered 52-card deck. Shuffling produces a new `Deck`; the source is
/// never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a fresh ordered deck and shuffle it with `rng`.
    pub fn new_shuffled<R: Rng>(rng: &mut R) -> Self {
        shuffle_deck(&create_deck(), rng)
    }

    /// Wrap cards already known to form a complete deck (see `ingest`).
    pub(crate) fn from_cards(mut cards: Vec<Card>) -> Self {
        reindex(&mut cards);
        Deck { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// The 52 cards in canonical order: A..K of hearts, diamonds, clubs, spades.
pub fn create_deck() -> Deck {
    let cards: Vec<Card> = Suit::ALL
        .iter()
        .flat_map(|&suit| (1u8..=13).map(move |r| Card::new(Rank(r), suit)))
        .enumerate()
        .map(|(i, mut card)| {
            card.index = i as u8;
            card
        })
        .collect();
    Deck { cards }
}

/// Return a uniformly shuffled copy of `deck`.
pub fn shuffle_deck<R: Rng>(deck: &Deck, rng: &mut R) -> Deck {
    let mut cards = deck.cards.clone();

    // Fisher-Yates shuffle
    for i in (1..cards.len()).rev() {
        let j = rng.gen_range(0..=i);
        cards.swap(i, j);
    }

    reindex(&mut cards);
    Deck { cards }
}

fn reindex(cards: &mut [Card]) {
    for (i, card) in cards.iter_mut().enumerate() {
        card.index = i as u8;
    }
}
