//! Combination rules: which card sets form a legal play, how two plays of the
//! same size compare, and which plays of a given type a hand can make.
//!
//! - `classify`: cards → [`HandResult`] (type plus tie-break key).
//! - `compare`: total order over equal-sized plays built on `classify`.
//! - `candidates`: enumerates every subset of a hand forming a requested type.
//! - `combinations`: iterative k-subset enumerator used by `candidates`.

mod candidates;
mod classify;
mod combinations;
mod compare;

pub use candidates::generate;
pub use classify::classify;
pub use combinations::Combinations;
pub use compare::{beats, compare};

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandType {
    Single,
    Pair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandType {
    pub const ALL: [HandType; 8] = [
        HandType::Single,
        HandType::Pair,
        HandType::ThreeOfAKind,
        HandType::Straight,
        HandType::Flush,
        HandType::FullHouse,
        HandType::FourOfAKind,
        HandType::StraightFlush,
    ];

    pub const fn card_count(self) -> usize {
        match self {
            HandType::Single => 1,
            HandType::Pair => 2,
            HandType::ThreeOfAKind => 3,
            HandType::Straight
            | HandType::Flush
            | HandType::FullHouse
            | HandType::FourOfAKind
            | HandType::StraightFlush => 5,
        }
    }

    /// Strength among five-card types; `None` for the fixed-arity types.
    pub const fn five_card_priority(self) -> Option<u8> {
        match self {
            HandType::Straight => Some(0),
            HandType::Flush => Some(1),
            HandType::FullHouse => Some(2),
            HandType::FourOfAKind => Some(3),
            HandType::StraightFlush => Some(4),
            HandType::Single | HandType::Pair | HandType::ThreeOfAKind => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            HandType::Single => "single",
            HandType::Pair => "pair",
            HandType::ThreeOfAKind => "three_of_a_kind",
            HandType::Straight => "straight",
            HandType::Flush => "flush",
            HandType::FullHouse => "full_house",
            HandType::FourOfAKind => "four_of_a_kind",
            HandType::StraightFlush => "straight_flush",
        }
    }
}

impl fmt::Display for HandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict: the combination type plus the rank and suit that break
/// ties between two plays of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_type: HandType,
    pub rank: Rank,
    pub suit: Suit,
}

impl HandResult {
    pub const fn new(hand_type: HandType, rank: Rank, suit: Suit) -> Self {
        Self {
            hand_type,
            rank,
            suit,
        }
    }

    pub fn key(&self) -> Card {
        Card::new(self.rank, self.suit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComboError {
    #[error("a play must hold 1, 2, 3 or 5 cards, got {0}")]
    InvalidHandSize(usize),
    #[error("cards of a pair or triple must share one rank")]
    NotASet,
    #[error("five cards do not form a recognised combination")]
    NotAFiveCardHand,
    #[error("cannot compare a {left}-card play with a {right}-card play")]
    SizeMismatch { left: usize, right: usize },
}

/// Groups cards by rank, each group kept in the order the cards were given.
pub(crate) fn rank_groups(cards: &[Card]) -> BTreeMap<Rank, Vec<Card>> {
    let mut groups: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for card in cards {
        groups.entry(card.rank).or_default().push(*card);
    }
    groups
}

pub(crate) fn suit_groups(cards: &[Card]) -> BTreeMap<Suit, Vec<Card>> {
    let mut groups: BTreeMap<Suit, Vec<Card>> = BTreeMap::new();
    for card in cards {
        groups.entry(card.suit).or_default().push(*card);
    }
    groups
}
