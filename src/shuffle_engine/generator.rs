use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;

use crate::shuffle_engine::{
    achievement_checks::check_shuffle_achievements,
    deck::Deck,
    models::Pattern,
    patterns::find_patterns,
};

/// Input to [`generate_shuffle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShuffleRequest {
    /// Fixed seed for a reproducible shuffle; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl ShuffleRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        ShuffleRequest { rng_seed: Some(seed) }
    }
}

/// One shuffled deck and everything detected in it.
#[derive(Debug, Clone, Serialize)]
pub struct ShuffleResult {
    pub shuffle_id: String,
    pub deck: Deck,
    pub patterns: Vec<Pattern>,
    /// Pattern achievements this ordering satisfies, before any per-user
    /// filtering.
    pub shuffle_achievements: Vec<&'static str>,
}

fn make_shuffle_id(rng: &mut impl RngCore) -> String {
    format!("SH-{:08X}", rng.next_u32())
}

/// Shuffle a fresh deck and classify it.
pub fn generate_shuffle(request: ShuffleRequest) -> ShuffleResult {
    let mut rng: StdRng = match request.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };

    let shuffle_id = make_shuffle_id(&mut rng);
    let deck = Deck::new_shuffled(&mut rng);
    let patterns = find_patterns(deck.cards());
    let shuffle_achievements = check_shuffle_achievements(deck.cards());

    ShuffleResult {
        shuffle_id,
        deck,
        patterns,
        shuffle_achievements,
    }
}
