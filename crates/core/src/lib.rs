#![warn(clippy::all, missing_docs)]

//! Core logic for the hilo card-counting trainer.
//!
//! This crate hosts the card model, deck shuffling, the running-count
//! session state machine, key binding resolution, and configuration
//! handling used by the terminal UI and any future frontends.

pub mod card;
pub mod config;
pub mod controls;
pub mod deck;
pub mod session;

pub use crate::card::{Card, ParseCardError, Rank, Suit};
pub use crate::config::AppConfig;
pub use crate::controls::{Action, Applied, BindingError, KeyBindings, Keymap};
pub use crate::deck::{Deck, DeckError, DeckFactory, DECK_SIZE};
pub use crate::session::{
    CountingSession, DealOutcome, ExhaustionPolicy, Headline, SessionState, SessionView,
};
