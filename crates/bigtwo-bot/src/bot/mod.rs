mod play;

pub use play::{PlanReason, PlayPlan, PlayPlanner, decide};
