use crate::model::card::Card;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Fixed turn-order position. Play proceeds North, East, South, West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::North => Seat::East,
            Seat::East => Seat::South,
            Seat::South => Seat::West,
            Seat::West => Seat::North,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    Human,
    Computer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    seat: Seat,
    controller: Controller,
    hand: Hand,
}

impl Player {
    pub fn new(name: impl Into<String>, seat: Seat, controller: Controller) -> Self {
        Self {
            name: name.into(),
            seat,
            controller,
            hand: Hand::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_human(&self) -> bool {
        matches!(self.controller, Controller::Human)
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(card)
    }

    pub fn receive(&mut self, hand: Hand) {
        self.hand = hand;
    }

    pub fn add_cards(&mut self, cards: &[Card]) {
        self.hand.add_all(cards);
    }

    /// Removes a played combination. Returns false, leaving the hand untouched,
    /// when any card is missing.
    pub fn play_cards(&mut self, cards: &[Card]) -> bool {
        self.hand.remove_all(cards)
    }
}
