mod cheapest;

pub use cheapest::CheapestBeatPolicy;

use bigtwo_core::model::card::Card;
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::player::Seat;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    /// The play to beat; empty when the table is open.
    pub previous: &'a [Card],
    /// Consecutive passes since the last successful play.
    pub passes: u8,
}

/// Decision interface for computer-controlled seats
pub trait Policy: Send {
    /// Choose the cards to play. An empty selection passes the turn.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Vec<Card>;

    fn name(&self) -> &'static str {
        "policy"
    }
}
