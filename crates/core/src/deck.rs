//! Deck construction and shuffling.

use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::card::{Card, Rank, Suit};

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Rejection reasons for an explicitly ordered deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// The order did not contain exactly 52 cards.
    #[error("expected 52 cards, got {0}")]
    WrongSize(usize),
    /// The same card appeared twice.
    #[error("card {0} appears more than once")]
    Duplicate(Card),
}

/// A single 52-card deck dealt from the front.
///
/// Cards are never removed from the backing vector; dealing advances a
/// cursor so `remaining` and `cards` always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// The unshuffled deck, suit by suit in rank order.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards, cursor: 0 }
    }

    /// Build a deck in a caller-chosen order.
    ///
    /// The order must be a permutation of the standard deck.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() != DECK_SIZE {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &cards {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Self { cards, cursor: 0 })
    }

    /// Move `top` to the front in the given order. The other undealt cards
    /// keep their relative order behind it.
    ///
    /// Only meaningful on an undealt deck: the result must again be a full
    /// permutation, so repeated or already dealt cards are rejected.
    pub fn with_top(self, top: &[Card]) -> Result<Self, DeckError> {
        let mut seen = HashSet::with_capacity(top.len());
        for card in top {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        let mut cards = top.to_vec();
        cards.extend(self.cards().iter().filter(|card| !top.contains(card)).copied());
        Self::from_cards(cards)
    }

    /// Take the next card, or `None` once the deck is exhausted.
    pub fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(card)
    }

    /// Cards left to deal.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    /// Cards dealt so far.
    pub fn dealt(&self) -> usize {
        self.cursor
    }

    /// Undealt cards in dealing order.
    pub fn cards(&self) -> &[Card] {
        &self.cards[self.cursor..]
    }
}

/// Produces freshly shuffled decks from an owned random source.
#[derive(Debug, Clone)]
pub struct DeckFactory {
    rng: StdRng,
    seed: Option<u64>,
}

impl DeckFactory {
    /// Factory seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Reproducible factory. Successive decks continue the same stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Seed the factory was built with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// A full deck under a uniform random permutation.
    ///
    /// `SliceRandom::shuffle` is a Fisher–Yates pass from the last index
    /// down, swapping each slot with a uniform pick from `[0, i]`.
    pub fn new_deck(&mut self) -> Deck {
        let mut deck = Deck::standard();
        deck.cards.shuffle(&mut self.rng);
        debug!(seed = ?self.seed, "shuffled new deck");
        deck
    }
}
