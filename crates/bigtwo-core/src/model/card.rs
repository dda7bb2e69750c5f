use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const THREE_OF_DIAMONDS: Card = Card::new(Rank::Three, Suit::Diamonds);
    pub const TWO_OF_SPADES: Card = Card::new(Rank::Two, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_three_of_diamonds(self) -> bool {
        matches!(self.rank, Rank::Three) && matches!(self.suit, Suit::Diamonds)
    }

    pub const fn is_two_of_spades(self) -> bool {
        matches!(self.rank, Rank::Two) && matches!(self.suit, Suit::Spades)
    }
}

/// Canonical order: rank value first, suit as the tie-break.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .value()
            .cmp(&other.rank.value())
            .then(self.suit.cmp(&other.suit))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse card from {0:?}")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        let suit_symbol = chars
            .next_back()
            .ok_or_else(|| ParseCardError(text.to_string()))?;
        let suit = Suit::from_symbol(suit_symbol).ok_or_else(|| ParseCardError(text.to_string()))?;
        let rank =
            Rank::from_symbol(chars.as_str()).ok_or_else(|| ParseCardError(text.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parses a whitespace or comma separated list such as `"3D 3S"`.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
