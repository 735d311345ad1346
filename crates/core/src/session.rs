//! Running-count practice session.
//!
//! A [`CountingSession`] owns the deck being dealt and the running Hi-Lo
//! count. It is mutated only through [`CountingSession::deal_next`],
//! [`CountingSession::reveal_count`] and [`CountingSession::reset`]; front
//! ends render it through [`CountingSession::view`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    card::Card,
    deck::{Deck, DeckFactory},
};

/// What `deal_next` does once the deck runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Stop in the finished state until the session is reset.
    #[default]
    Finish,
    /// Shuffle a fresh deck, zero the count and keep dealing.
    Reshuffle,
}

/// Top-level session state. Count visibility is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cards may still be dealt.
    Ready,
    /// The deck ran out.
    Finished,
}

/// Result of a single `deal_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealOutcome {
    /// A card was dealt from the current deck.
    Dealt(Card),
    /// The deck was empty; a new one was shuffled and its first card dealt.
    Reshuffled(Card),
    /// No card was dealt and the session is finished.
    Finished,
}

/// Main line of the session display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headline {
    /// Nothing dealt yet.
    AwaitingDeal,
    /// The card most recently dealt.
    Card(Card),
    /// The deck has been exhausted.
    Finished,
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Headline::AwaitingDeal => f.write_str("Deal a card to begin"),
            Headline::Card(card) => write!(f, "{card}"),
            Headline::Finished => f.write_str("Deck Finished"),
        }
    }
}

/// Everything a front end needs to draw the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    /// Card, finished marker or prompt.
    pub headline: Headline,
    /// Running count, present only once revealed.
    pub count: Option<i32>,
    /// Whether the deal trigger should be enabled.
    pub deal_enabled: bool,
    /// Cards left in the current deck.
    pub remaining: usize,
    /// Cards dealt from the current deck.
    pub dealt: usize,
}

/// State machine for one practice run.
#[derive(Debug, Clone)]
pub struct CountingSession {
    factory: DeckFactory,
    policy: ExhaustionPolicy,
    deck: Deck,
    current: Option<Card>,
    running_count: i32,
    revealed: bool,
    exhausted: bool,
}

impl CountingSession {
    /// Start a session with a fresh deck from `factory`.
    pub fn new(mut factory: DeckFactory, policy: ExhaustionPolicy) -> Self {
        let deck = factory.new_deck();
        Self::with_deck(factory, policy, deck)
    }

    /// Start a session on a prepared deck. `reset` still draws from `factory`.
    pub fn with_deck(factory: DeckFactory, policy: ExhaustionPolicy, deck: Deck) -> Self {
        info!(seed = ?factory.seed(), ?policy, "counting session started");
        Self {
            factory,
            policy,
            deck,
            current: None,
            running_count: 0,
            revealed: false,
            exhausted: false,
        }
    }

    /// Deal the next card and fold its value into the running count.
    ///
    /// Each deal hides the count again. On an empty deck the session either
    /// finishes (a no-op on every later call) or reshuffles, per policy.
    pub fn deal_next(&mut self) -> DealOutcome {
        if let Some(card) = self.deck.deal() {
            self.take(card);
            debug!(%card, count = self.running_count, remaining = self.deck.remaining(), "dealt");
            return DealOutcome::Dealt(card);
        }

        match self.policy {
            ExhaustionPolicy::Finish => {
                if !self.exhausted {
                    info!(count = self.running_count, "deck finished");
                }
                self.current = None;
                self.exhausted = true;
                DealOutcome::Finished
            }
            ExhaustionPolicy::Reshuffle => {
                self.deck = self.factory.new_deck();
                self.running_count = 0;
                // A freshly shuffled deck always has a first card.
                let Some(card) = self.deck.deal() else {
                    return DealOutcome::Finished;
                };
                self.take(card);
                info!(%card, "deck exhausted, reshuffled");
                DealOutcome::Reshuffled(card)
            }
        }
    }

    fn take(&mut self, card: Card) {
        self.current = Some(card);
        self.running_count += card.value();
        self.revealed = false;
    }

    /// Show the running count. Stays visible until the next deal.
    pub fn reveal_count(&mut self) {
        self.revealed = true;
        debug!(count = self.running_count, "count revealed");
    }

    /// Discard all progress and start over on a newly shuffled deck.
    pub fn reset(&mut self) {
        self.deck = self.factory.new_deck();
        self.current = None;
        self.running_count = 0;
        self.revealed = false;
        self.exhausted = false;
        info!("session reset");
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.is_exhausted() {
            SessionState::Finished
        } else {
            SessionState::Ready
        }
    }

    /// Most recently dealt card.
    pub fn current_card(&self) -> Option<Card> {
        self.current
    }

    /// Sum of Hi-Lo values dealt from the current deck.
    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    /// Whether the count is currently shown.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether a deal was attempted on an empty deck.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Cards left in the current deck.
    pub fn remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Cards dealt from the current deck.
    pub fn dealt(&self) -> usize {
        self.deck.dealt()
    }

    /// Policy applied when the deck runs out.
    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    /// Pure projection of the state for rendering.
    pub fn view(&self) -> SessionView {
        let state = self.state();
        let headline = match (self.current_card(), state) {
            (Some(card), _) => Headline::Card(card),
            (None, SessionState::Finished) => Headline::Finished,
            (None, SessionState::Ready) => Headline::AwaitingDeal,
        };
        SessionView {
            headline,
            count: self.is_revealed().then_some(self.running_count),
            deal_enabled: state == SessionState::Ready,
            remaining: self.remaining(),
            dealt: self.dealt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        card::{Rank, Suit},
        deck::DECK_SIZE,
    };

    fn session(seed: u64) -> CountingSession {
        CountingSession::new(DeckFactory::seeded(seed), ExhaustionPolicy::Finish)
    }

    fn stacked(top: &[Card]) -> Deck {
        Deck::standard().with_top(top).expect("stacked deck")
    }

    #[test]
    fn starts_ready_and_hidden() {
        let session = session(1);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.current_card(), None);
        assert_eq!(session.running_count(), 0);
        assert!(!session.is_revealed());
        assert!(!session.is_exhausted());
        assert_eq!(session.remaining(), DECK_SIZE);
        assert_eq!(session.view().headline, Headline::AwaitingDeal);
        assert_eq!(session.view().count, None);
    }

    #[test]
    fn scripted_deal_tracks_count() {
        let five = Card::new(Rank::Five, Suit::Hearts);
        let king = Card::new(Rank::King, Suit::Diamonds);
        let seven = Card::new(Rank::Seven, Suit::Clubs);
        let mut session = CountingSession::with_deck(
            DeckFactory::seeded(0),
            ExhaustionPolicy::Finish,
            stacked(&[five, king, seven]),
        );

        let mut counts = Vec::new();
        for expected in [five, king, seven] {
            assert_eq!(session.deal_next(), DealOutcome::Dealt(expected));
            counts.push(session.running_count());
        }
        assert_eq!(counts, vec![1, 0, 0]);

        session.reveal_count();
        let view = session.view();
        assert_eq!(view.headline, Headline::Card(seven));
        assert_eq!(view.count.map(|count| count.to_string()), Some("0".to_string()));
    }

    #[test]
    fn full_deck_counts_back_to_zero() {
        let mut session = session(5);
        for expected_remaining in (0..DECK_SIZE).rev() {
            assert!(matches!(session.deal_next(), DealOutcome::Dealt(_)));
            assert_eq!(session.remaining(), expected_remaining);
            assert!(!session.is_exhausted());
        }
        assert_eq!(session.running_count(), 0);
        assert!(session.current_card().is_some());

        assert_eq!(session.deal_next(), DealOutcome::Finished);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.current_card(), None);
        assert_eq!(session.running_count(), 0);
        assert_eq!(session.view().headline, Headline::Finished);
        assert!(!session.view().deal_enabled);
    }

    #[test]
    fn dealing_after_finish_is_a_noop() {
        let mut session = session(9);
        for _ in 0..=DECK_SIZE {
            session.deal_next();
        }
        session.reveal_count();
        for _ in 0..3 {
            assert_eq!(session.deal_next(), DealOutcome::Finished);
            assert!(session.is_exhausted());
            assert_eq!(session.remaining(), 0);
            assert_eq!(session.running_count(), 0);
        }
        assert_eq!(session.view().count, Some(0));
    }

    #[test]
    fn deal_hides_revealed_count() {
        let mut session = session(2);
        session.deal_next();
        session.reveal_count();
        assert!(session.is_revealed());
        session.deal_next();
        assert!(!session.is_revealed());
        assert_eq!(session.view().count, None);
    }

    #[test]
    fn reveal_touches_only_visibility() {
        let mut session = session(4);
        session.reveal_count();
        assert_eq!(session.view().count, Some(0));
        assert_eq!(session.view().headline, Headline::AwaitingDeal);

        session.deal_next();
        session.deal_next();
        let before = (session.current_card(), session.running_count(), session.remaining());
        session.reveal_count();
        session.reveal_count();
        assert!(session.is_revealed());
        assert_eq!(
            (session.current_card(), session.running_count(), session.remaining()),
            before
        );
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = session(6);
        for _ in 0..60 {
            session.deal_next();
        }
        session.reveal_count();
        session.reset();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.current_card(), None);
        assert_eq!(session.running_count(), 0);
        assert!(!session.is_revealed());
        assert!(!session.is_exhausted());
        assert_eq!(session.remaining(), DECK_SIZE);

        session.deal_next();
        session.reset();
        assert_eq!(session.remaining(), DECK_SIZE);
        assert_eq!(session.running_count(), 0);
    }

    #[test]
    fn reshuffle_policy_keeps_dealing() {
        let mut session = CountingSession::new(DeckFactory::seeded(8), ExhaustionPolicy::Reshuffle);
        for _ in 0..DECK_SIZE {
            session.deal_next();
        }
        let DealOutcome::Reshuffled(card) = session.deal_next() else {
            panic!("expected a reshuffle on the empty deck");
        };
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.remaining(), DECK_SIZE - 1);
        assert_eq!(session.running_count(), card.value());
        assert!(session.view().deal_enabled);
    }
}
