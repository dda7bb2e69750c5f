use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// Penalty for the cards a player still holds when the round ends.
///
/// Up to seven cards cost one point each; eight or nine cost double, ten to
/// twelve triple, and a full thirteen quadruple. Holding the Two of Spades
/// with eight or more cards left doubles the result again.
pub fn base_score(remaining: usize, holds_two_of_spades: bool) -> i32 {
    let n = remaining as i32;
    let score = match remaining {
        0..=7 => n,
        8..=9 => 2 * n,
        10..=12 => 3 * n,
        _ => 4 * n,
    };
    if remaining >= 8 && holds_two_of_spades {
        score * 2
    } else {
        score
    }
}

pub fn hand_base_score(hand: &Hand) -> i32 {
    base_score(hand.len(), hand.contains(Card::TWO_OF_SPADES))
}

/// Settlement of a finished round. Final scores are zero-sum: each player pays
/// the difference between their own base score and every other player's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Seat,
    pub base_scores: [i32; 4],
    pub final_scores: [i32; 4],
}

impl GameResult {
    pub fn settle(winner: Seat, hands: [&Hand; 4]) -> Self {
        let base_scores = hands.map(hand_base_score);
        Self::from_base_scores(winner, base_scores)
    }

    pub fn from_base_scores(winner: Seat, base_scores: [i32; 4]) -> Self {
        let total: i32 = base_scores.iter().sum();
        let final_scores = base_scores.map(|own| total - 4 * own);
        Self {
            winner,
            base_scores,
            final_scores,
        }
    }

    pub fn base_score(&self, seat: Seat) -> i32 {
        self.base_scores[seat.index()]
    }

    pub fn final_score(&self, seat: Seat) -> i32 {
        self.final_scores[seat.index()]
    }

    /// Seats ordered from best to worst final score.
    pub fn standings(&self) -> [Seat; 4] {
        let mut seats = Seat::LOOP;
        seats.sort_by_key(|seat| std::cmp::Reverse(self.final_score(*seat)));
        seats
    }
}

/// Running totals across several rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    totals: [i64; 4],
    rounds: u32,
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            totals: [0; 4],
            rounds: 0,
        }
    }

    pub fn apply_result(&mut self, result: &GameResult) {
        for seat in Seat::LOOP {
            self.totals[seat.index()] += i64::from(result.final_score(seat));
        }
        self.rounds += 1;
    }

    pub fn score(&self, seat: Seat) -> i64 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[i64; 4] {
        &self.totals
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn leading_player(&self) -> Seat {
        Seat::LOOP
            .iter()
            .copied()
            .max_by_key(|seat| (self.score(*seat), std::cmp::Reverse(seat.index())))
            .unwrap_or(Seat::North)
    }
}
