use std::collections::HashSet;

use serde_json::{json, Value};

use crate::shuffle_engine::{
    achievements::AchievementStatus,
    generator::ShuffleResult,
    models::{Card, Pattern},
};

/// Card code for the client: rank then suit letter, i.e. "AH", "10S", "QD".
pub fn to_client_card(c: &Card) -> String {
    c.to_string()
}

/// Positions that belong to at least one reported pattern. Whole-deck
/// patterns carry no indices and highlight nothing.
fn highlighted_positions(patterns: &[Pattern]) -> HashSet<usize> {
    patterns
        .iter()
        .filter_map(|p| p.indices.as_deref())
        .flatten()
        .copied()
        .collect()
}

/// Build one card slot.
fn card_entry(c: &Card, highlighted: &HashSet<usize>) -> Value {
    json!({
        "id":        c.index,
        "card":      to_client_card(c),
        "color":     c.color().to_string(),
        "isPattern": highlighted.contains(&usize::from(c.index))
    })
}

/// Build the cards array in deck order.
fn cards_array(cards: &[Card], patterns: &[Pattern]) -> Value {
    let highlighted = highlighted_positions(patterns);
    Value::Array(cards.iter().map(|c| card_entry(c, &highlighted)).collect())
}

fn pattern_entry(p: &Pattern) -> Value {
    json!({
        "id":          p.id,
        "name":        p.name,
        "description": p.description,
        "type":        p.pattern_type,
        "indices":     p.indices
    })
}

fn achievement_entry(status: &AchievementStatus) -> Value {
    let a = status.achievement;
    json!({
        "id":          a.id,
        "name":        a.name,
        "description": a.description,
        "category":    a.category,
        "unlocked":    status.unlocked
    })
}

/// Map a `ShuffleResult` and the viewer's achievement list to the JSON
/// object the presentation layer renders.
pub fn to_client_view(result: &ShuffleResult, achievements: &[AchievementStatus]) -> Value {
    let cards = result.deck.cards();
    let unlocked = achievements.iter().filter(|s| s.unlocked).count();

    json!({
        "shuffle_id":   result.shuffle_id,
        "cards":        cards_array(cards, &result.patterns),
        "patterns":     result.patterns.iter().map(pattern_entry).collect::<Vec<_>>(),
        "achievements": achievements.iter().map(achievement_entry).collect::<Vec<_>>(),
        "summary": {
            "pattern_count":     result.patterns.len(),
            "unlocked_count":    unlocked,
            "achievement_total": achievements.len()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle_engine::{
        achievements::achievement_statuses,
        generator::{generate_shuffle, ShuffleRequest},
        models::{Rank, Suit},
    };

    #[test]
    fn card_codes() {
        assert_eq!(to_client_card(&Card::new(Rank::ACE, Suit::Hearts)), "AH");
        assert_eq!(to_client_card(&Card::new(Rank::TEN, Suit::Spades)), "10S");
        assert_eq!(to_client_card(&Card::new(Rank(2), Suit::Clubs)), "2C");
        assert_eq!(to_client_card(&Card::new(Rank::QUEEN, Suit::Diamonds)), "QD");
    }

    #[test]
    fn view_lists_every_card_and_achievement() {
        let result = generate_shuffle(ShuffleRequest::seeded(42));
        let unlocked: HashSet<String> = ["first_shuffle".to_string()].into_iter().collect();
        let view = to_client_view(&result, &achievement_statuses(&unlocked));

        assert_eq!(view["shuffle_id"], result.shuffle_id.as_str());
        let cards = view["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 52);
        for (i, c) in cards.iter().enumerate() {
            assert_eq!(c["id"], i);
            let color = c["color"].as_str().unwrap();
            assert!(color == "red" || color == "black");
        }

        let achievements = view["achievements"].as_array().unwrap();
        assert_eq!(achievements.len(), 35);
        assert_eq!(achievements[0]["id"], "first_shuffle");
        assert_eq!(achievements[0]["unlocked"], true);
        assert_eq!(achievements[1]["unlocked"], false);
        assert_eq!(view["summary"]["unlocked_count"], 1);
    }

    #[test]
    fn pattern_cards_are_highlighted() {
        let patterns = vec![Pattern {
            id: "flush".into(),
            name: "Flush".into(),
            description: "Five cards of one suit".into(),
            pattern_type: crate::shuffle_engine::models::PatternType::Flush,
            indices: Some(vec![3, 4, 5, 6, 7]),
        }];
        let result = generate_shuffle(ShuffleRequest::seeded(1));
        let cards = cards_array(result.deck.cards(), &patterns);
        let flags: Vec<bool> = cards
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["isPattern"].as_bool().unwrap())
            .collect();
        assert_eq!(flags.iter().filter(|f| **f).count(), 5);
        assert!(flags[3] && flags[7] && !flags[2] && !flags[8]);

        let entry = pattern_entry(&patterns[0]);
        assert_eq!(entry["type"], "flush");
        assert_eq!(entry["indices"][0], 3);
    }
}
