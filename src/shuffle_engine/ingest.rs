//! Validation boundary between stored records and the engine.
//!
//! Records read back from the data store are loosely typed: a field may be
//! missing or spelled differently. They are converted here, once, so the
//! engine only ever sees well-formed [`Card`]s. A bad record is logged and
//! skipped rather than failing the whole batch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::IngestError;
use crate::shuffle_engine::{
    deck::{Deck, DECK_SIZE},
    models::{Card, Rank, Suit},
};

/// A card as it arrives from storage or a client payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub suit: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl From<&Card> for RawCard {
    fn from(card: &Card) -> Self {
        RawCard {
            suit: Some(card.suit.name().to_string()),
            value: Some(card.rank.symbol().to_string()),
        }
    }
}

fn parse_suit(s: &str) -> Result<Suit, IngestError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "hearts" | "heart" | "h" => Ok(Suit::Hearts),
        "diamonds" | "diamond" | "d" => Ok(Suit::Diamonds),
        "clubs" | "club" | "c" => Ok(Suit::Clubs),
        "spades" | "spade" | "s" => Ok(Suit::Spades),
        _ => Err(IngestError::UnknownSuit(s.to_string())),
    }
}

fn parse_rank(s: &str) -> Result<Rank, IngestError> {
    let rank = match s.trim().to_ascii_uppercase().as_str() {
        "A" | "1" => 1,
        "J" | "11" => 11,
        "Q" | "12" => 12,
        "K" | "13" => 13,
        other => match other.parse::<u8>() {
            Ok(n @ 2..=10) => n,
            _ => return Err(IngestError::UnknownValue(s.to_string())),
        },
    };
    Ok(Rank(rank))
}

/// Convert one raw record.
pub fn parse_card(raw: &RawCard) -> Result<Card, IngestError> {
    let suit = raw.suit.as_deref().ok_or(IngestError::MissingSuit)?;
    let value = raw.value.as_deref().ok_or(IngestError::MissingValue)?;
    Ok(Card::new(parse_rank(value)?, parse_suit(suit)?))
}

/// Convert a batch, dropping malformed records. Surviving cards are
/// re-indexed by their position in the result; a batch stops at the 256th
/// card, the last position a card index can hold.
pub fn cards_from_records(records: &[RawCard]) -> Vec<Card> {
    let mut cards = Vec::with_capacity(records.len().min(usize::from(u8::MAX) + 1));
    for (pos, raw) in records.iter().enumerate() {
        match parse_card(raw) {
            Ok(mut card) => {
                let Ok(index) = u8::try_from(cards.len()) else {
                    warn!(position = pos, kept = cards.len(), "card batch truncated");
                    break;
                };
                card.index = index;
                cards.push(card);
            }
            Err(err) => warn!(position = pos, error = %err, "skipping malformed card record"),
        }
    }
    cards
}

/// Rebuild a full deck from stored records. Malformed records are skipped;
/// the survivors must still be 52 distinct cards.
pub fn deck_from_records(records: &[RawCard]) -> Result<Deck, IngestError> {
    let cards = cards_from_records(records);
    let mut seen = HashSet::with_capacity(cards.len());
    for card in &cards {
        if !seen.insert(*card) {
            return Err(IngestError::DuplicateCard(card.to_string()));
        }
    }
    if cards.len() != DECK_SIZE {
        return Err(IngestError::IncompleteDeck { found: cards.len() });
    }
    Ok(Deck::from_cards(cards))
}
