//! stride-core: fitness projection, pace zones, goal feasibility and
//! training-plan generation for runners.
//!
//! Every engine function is pure and synchronous; callers supply plain,
//! already-validated values and own all persistence.

pub mod capability;
pub mod error;
pub mod feasibility;
pub mod goal;
pub mod kernel;
pub mod model;
pub mod planner;
pub mod projection;
pub mod session;
pub mod settings;
pub mod time;
pub mod zones;

pub use capability::{CapabilityProjection, CapabilitySnapshot, latest_snapshot, project_capability};
pub use error::{CoreError, CoreResult};
pub use feasibility::{
    FeasibilityRequest, FeasibilityResult, Lever, Tradeoff, assess_feasibility,
    assess_feasibility_with,
};
pub use goal::Goal;
pub use kernel::{PlanningKernel, SnapshotSource};
pub use model::{HALF_MARATHON_M, MARATHON_M, TrainingModel};
pub use planner::{
    Plan, PlanRequest, PlanStatus, WorkoutSpec, WorkoutType, generate_plan, generate_plan_with,
};
pub use projection::{FitnessProjection, STANDARD_DISTANCES_M, riegel_predict};
pub use session::{SessionActuals, SessionLog};
pub use settings::Settings;
pub use time::{Clock, FixedClock, ZonedClock};
pub use zones::{PaceZones, ZoneName, ZoneWindow, derive_zones};
