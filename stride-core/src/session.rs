//! Session logs: what actually happened on a planned workout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::planner::{Plan, WorkoutType};

pub const RPE_MIN: u8 = 1;
pub const RPE_MAX: u8 = 10;

/// Reported figures for one session. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionActuals {
    pub actual_distance_m: Option<u32>,
    pub actual_time_sec: Option<u32>,
    /// Rate of perceived exertion, 1 (very easy) to 10 (maximal).
    pub rpe: Option<u8>,
    pub notes: Option<String>,
}

impl SessionActuals {
    pub fn validate(&self) -> CoreResult<()> {
        match self.rpe {
            Some(rpe) if !(RPE_MIN..=RPE_MAX).contains(&rpe) => Err(CoreError::invalid(format!(
                "rpe must be between {RPE_MIN} and {RPE_MAX}, got {rpe}"
            ))),
            _ => Ok(()),
        }
    }
}

/// A logged session, attached to the workout scheduled on `workout_date`
/// in the plan that starts on `plan_start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    pub plan_start_date: NaiveDate,
    pub workout_date: NaiveDate,
    pub workout_type: WorkoutType,
    #[serde(flatten)]
    pub actuals: SessionActuals,
    pub logged_at: DateTime<Utc>,
}

impl SessionLog {
    /// Attach `actuals` to the workout `plan` schedules on `date`.
    pub fn for_workout(
        plan: &Plan,
        date: NaiveDate,
        actuals: SessionActuals,
        logged_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        actuals.validate()?;
        let workout = plan
            .workouts
            .iter()
            .find(|w| w.date == date)
            .ok_or_else(|| CoreError::invalid(format!("no workout scheduled on {date}")))?;
        Ok(Self {
            plan_start_date: plan.start_date,
            workout_date: workout.date,
            workout_type: workout.workout_type,
            actuals,
            logged_at,
        })
    }

    pub fn belongs_to(&self, plan: &Plan) -> bool {
        self.plan_start_date == plan.start_date
    }
}
