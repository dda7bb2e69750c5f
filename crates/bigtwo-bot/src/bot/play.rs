use bigtwo_core::combo::{classify, compare, generate};
use bigtwo_core::model::card::Card;
use core::cmp::Ordering;

/// Why the planner produced its answer. Carried into decision logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanReason {
    LeadThreeOfDiamonds,
    LeadLowestSingle,
    CheapestBeat,
    NoBeatingPlay,
    EmptyHand,
    UnreadableTable,
}

impl PlanReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlanReason::LeadThreeOfDiamonds => "lead_three_of_diamonds",
            PlanReason::LeadLowestSingle => "lead_lowest_single",
            PlanReason::CheapestBeat => "cheapest_beat",
            PlanReason::NoBeatingPlay => "no_beating_play",
            PlanReason::EmptyHand => "empty_hand",
            PlanReason::UnreadableTable => "unreadable_table",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPlan {
    /// Cards to play; empty means pass.
    pub cards: Vec<Card>,
    pub reason: PlanReason,
    /// Same-type candidates that beat the table.
    pub beating: usize,
}

impl PlayPlan {
    fn pass(reason: PlanReason, beating: usize) -> Self {
        Self {
            cards: Vec::new(),
            reason,
            beating,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks the play for a computer seat.
    ///
    /// On an open table the Three of Diamonds leads if held, otherwise the
    /// lowest single card; multi-card leads are never attempted. Facing a play,
    /// the planner looks only at combinations of the same type and returns the
    /// weakest one that still beats it, or passes.
    pub fn plan(hand: &[Card], previous: &[Card]) -> PlayPlan {
        if previous.is_empty() {
            return Self::lead(hand);
        }

        let Ok(table) = classify(previous) else {
            return PlayPlan::pass(PlanReason::UnreadableTable, 0);
        };

        let beating: Vec<Vec<Card>> = generate(hand, table.hand_type)
            .into_iter()
            .filter(|candidate| matches!(compare(candidate, previous), Ok(Ordering::Greater)))
            .collect();
        let count = beating.len();

        let cheapest = beating.into_iter().min_by(|a, b| {
            compare(a, b).unwrap_or(Ordering::Equal)
        });

        match cheapest {
            Some(cards) => PlayPlan {
                cards,
                reason: PlanReason::CheapestBeat,
                beating: count,
            },
            None => PlayPlan::pass(PlanReason::NoBeatingPlay, 0),
        }
    }

    fn lead(hand: &[Card]) -> PlayPlan {
        if hand.contains(&Card::THREE_OF_DIAMONDS) {
            return PlayPlan {
                cards: vec![Card::THREE_OF_DIAMONDS],
                reason: PlanReason::LeadThreeOfDiamonds,
                beating: 0,
            };
        }
        match hand.iter().min() {
            Some(lowest) => PlayPlan {
                cards: vec![*lowest],
                reason: PlanReason::LeadLowestSingle,
                beating: 0,
            },
            None => PlayPlan::pass(PlanReason::EmptyHand, 0),
        }
    }
}

/// Pure decision function: the cards to play, or empty to pass.
pub fn decide(hand: &[Card], previous: &[Card]) -> Vec<Card> {
    PlayPlanner::plan(hand, previous).cards
}
