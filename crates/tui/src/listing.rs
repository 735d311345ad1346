use anyhow::{Context, Result};
use serde::Serialize;

use hilo_core::{card::Card, deck::Deck};

/// One row of a printed deck.
#[derive(Debug, Clone, Serialize)]
pub struct ListingEntry {
    pub position: usize,
    pub card: String,
    #[serde(flatten)]
    pub face: Card,
    pub value: i32,
    pub running_count: i32,
}

/// A whole deck annotated with Hi-Lo values and the count after each card.
#[derive(Debug, Clone, Serialize)]
pub struct DeckListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub cards: Vec<ListingEntry>,
}

impl DeckListing {
    pub fn new(deck: &Deck, seed: Option<u64>) -> Self {
        let mut running_count = 0;
        let cards = deck
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| {
                running_count += card.value();
                ListingEntry {
                    position: index + 1,
                    card: card.to_string(),
                    face: *card,
                    value: card.value(),
                    running_count,
                }
            })
            .collect();
        Self { seed, cards }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(seed) = self.seed {
            out.push_str(&format!("seed {seed}\n"));
        }
        for entry in &self.cards {
            out.push_str(&format!(
                "{:>2}. {:<3}  {:>2}  count {:>3}\n",
                entry.position,
                entry.card,
                signed(entry.value),
                signed(entry.running_count)
            ));
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize deck listing")
    }
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_core::deck::{DeckFactory, DECK_SIZE};

    #[test]
    fn listing_ends_at_zero() {
        let deck = DeckFactory::seeded(12).new_deck();
        let listing = DeckListing::new(&deck, Some(12));
        assert_eq!(listing.cards.len(), DECK_SIZE);
        assert_eq!(listing.cards.last().map(|entry| entry.running_count), Some(0));
        assert_eq!(listing.cards[0].position, 1);
    }

    #[test]
    fn text_shows_signed_values() {
        let deck = Deck::standard();
        let text = DeckListing::new(&deck, None).to_text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(" 1. A♥   -1  count  -1"));
        assert_eq!(lines.next(), Some(" 2. 2♥   +1  count   0"));
        assert_eq!(text.lines().count(), DECK_SIZE);
    }

    #[test]
    fn json_carries_rank_and_suit() -> Result<()> {
        let deck = Deck::standard();
        let json: serde_json::Value =
            serde_json::from_str(&DeckListing::new(&deck, Some(5)).to_json()?)?;
        assert_eq!(json["seed"], 5);
        assert_eq!(json["cards"][0]["card"], "A♥");
        assert_eq!(json["cards"][0]["rank"], "Ace");
        assert_eq!(json["cards"][0]["suit"], "Hearts");
        assert_eq!(json["cards"][1]["running_count"], 0);
        Ok(())
    }
}
