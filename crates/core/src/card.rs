//! Playing cards and their Hi-Lo weights.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Card rank, ace through king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    /// Ace.
    Ace,
    /// Two.
    Two,
    /// Three.
    Three,
    /// Four.
    Four,
    /// Five.
    Five,
    /// Six.
    Six,
    /// Seven.
    Seven,
    /// Eight.
    Eight,
    /// Nine.
    Nine,
    /// Ten.
    Ten,
    /// Jack.
    Jack,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl Rank {
    /// All thirteen ranks in display order.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Hi-Lo weight: low cards +1, seven through nine 0, tens and aces -1.
    pub const fn hi_lo(self) -> i32 {
        match self {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
        }
    }

    /// Short label used on the card face.
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let rank = match text.to_ascii_uppercase().as_str() {
            "A" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return None,
        };
        Some(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Unicode suit symbol.
    pub const fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    /// Whether the suit is printed in red.
    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    fn parse(ch: char) -> Option<Self> {
        match ch {
            '♥' | 'h' | 'H' => Some(Suit::Hearts),
            '♦' | 'd' | 'D' => Some(Suit::Diamonds),
            '♣' | 'c' | 'C' => Some(Suit::Clubs),
            '♠' | 's' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single playing card.
///
/// The Hi-Lo value is derived from the rank on every call rather than stored,
/// so two cards with the same rank can never disagree on their weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Face rank.
    pub rank: Rank,
    /// Suit.
    pub suit: Suit,
}

impl Card {
    /// Build a card from rank and suit.
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Hi-Lo weight of this card.
    pub const fn value(&self) -> i32 {
        self.rank.hi_lo()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Failure to parse a card such as `10♠` or `qh`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    /// Input was empty after trimming.
    #[error("card text is empty")]
    Empty,
    /// The rank portion was not recognised.
    #[error("unknown rank '{0}'")]
    Rank(String),
    /// The trailing suit character was not recognised.
    #[error("unknown suit '{0}'")]
    Suit(char),
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let suit_char = trimmed.chars().last().ok_or(ParseCardError::Empty)?;
        let suit = Suit::parse(suit_char).ok_or(ParseCardError::Suit(suit_char))?;
        let rank_text = &trimmed[..trimmed.len() - suit_char.len_utf8()];
        let rank =
            Rank::parse(rank_text).ok_or_else(|| ParseCardError::Rank(rank_text.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hi_lo_weights_follow_rank() {
        for rank in [Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six] {
            assert_eq!(rank.hi_lo(), 1, "{rank}");
        }
        for rank in [Rank::Seven, Rank::Eight, Rank::Nine] {
            assert_eq!(rank.hi_lo(), 0, "{rank}");
        }
        for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace] {
            assert_eq!(rank.hi_lo(), -1, "{rank}");
        }
    }

    #[test]
    fn card_value_ignores_suit() {
        for suit in Suit::ALL {
            assert_eq!(Card::new(Rank::Five, suit).value(), 1);
            assert_eq!(Card::new(Rank::King, suit).value(), -1);
        }
    }

    #[test]
    fn display_uses_suit_symbols() {
        assert_eq!(Card::new(Rank::Five, Suit::Hearts).to_string(), "5♥");
        assert_eq!(Card::new(Rank::Ten, Suit::Spades).to_string(), "10♠");
    }

    #[test]
    fn parses_symbols_and_letters() {
        assert_eq!("K♦".parse(), Ok(Card::new(Rank::King, Suit::Diamonds)));
        assert_eq!("7c".parse(), Ok(Card::new(Rank::Seven, Suit::Clubs)));
        assert_eq!(" th ".parse(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("10S".parse(), Ok(Card::new(Rank::Ten, Suit::Spades)));
    }

    #[test]
    fn rejects_malformed_cards() {
        assert_eq!("".parse::<Card>(), Err(ParseCardError::Empty));
        assert_eq!("5x".parse::<Card>(), Err(ParseCardError::Suit('x')));
        assert_eq!("1h".parse::<Card>(), Err(ParseCardError::Rank("1".to_string())));
        assert_eq!("♥".parse::<Card>(), Err(ParseCardError::Rank(String::new())));
    }
}
