use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;

pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals consecutive 13-card blocks: seat 0 receives the first block,
    /// seat 1 the second, and so on.
    pub fn deal(&self) -> [Hand; 4] {
        let mut blocks = self.cards.chunks(HAND_SIZE);
        array::from_fn(|_| {
            blocks
                .next()
                .map(|block| Hand::with_cards(block.to_vec()))
                .unwrap_or_default()
        })
    }
}
