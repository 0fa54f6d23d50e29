pub mod planner;
pub mod schedule;
pub mod types;
pub mod validator;

pub use planner::WarmupStageGenerator;
pub use types::{PlanSummary, WarmupConfig, WarmupPlan, WarmupStage};
pub use validator::{ScheduleValidator, ValidationError, MIN_GROWTH_FACTOR};
