use crate::model::card::Card;

/// Cards held by one player, kept sorted in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn add_all(&mut self, cards: &[Card]) {
        self.cards.extend_from_slice(cards);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes every card or none of them. Equal cards are interchangeable, so
    /// each requested card consumes one matching copy.
    pub fn remove_all(&mut self, cards: &[Card]) -> bool {
        if !self.contains_all(cards) {
            return false;
        }
        for card in cards {
            self.remove(*card);
        }
        true
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Multiset containment: `cards` may not use a copy the hand lacks.
    pub fn contains_all(&self, cards: &[Card]) -> bool {
        let mut available = self.cards.clone();
        cards.iter().all(|card| {
            match available.iter().position(|c| c == card) {
                Some(index) => {
                    available.swap_remove(index);
                    true
                }
                None => false,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort();
    }
}
