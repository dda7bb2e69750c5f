pub mod bot;
pub mod policy;

pub use bot::{PlanReason, PlayPlan, PlayPlanner, decide};
pub use policy::{CheapestBeatPolicy, Policy, PolicyContext};
