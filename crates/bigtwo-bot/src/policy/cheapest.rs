use super::{Policy, PolicyContext};
use crate::bot::{PlayPlan, PlayPlanner};
use bigtwo_core::model::card::{Card, format_cards};
use tracing::{Level, event};

/// Plays the weakest combination that beats the table; leads low singles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestBeatPolicy;

impl CheapestBeatPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for CheapestBeatPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Vec<Card> {
        let plan = PlayPlanner::plan(ctx.hand.cards(), ctx.previous);
        log_play_decision(ctx, &plan);
        plan.cards
    }

    fn name(&self) -> &'static str {
        "cheapest_beat"
    }
}

fn log_play_decision(ctx: &PolicyContext, plan: &PlayPlan) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let previous = if ctx.previous.is_empty() {
        "-".to_string()
    } else {
        format_cards(ctx.previous)
    };
    let chosen = if plan.is_pass() {
        "pass".to_string()
    } else {
        format_cards(&plan.cards)
    };

    event!(
        target: "bigtwo_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        hand_size = ctx.hand.len(),
        passes = ctx.passes,
        previous = %previous,
        beating = plan.beating,
        chosen = %chosen,
        reason = plan.reason.as_str(),
    );
}
