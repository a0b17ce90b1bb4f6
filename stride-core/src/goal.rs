//! A runner's race goal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub distance_m: u32,
    /// Optional finishing time; distance-only goals leave this empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_time_sec: Option<u32>,
    pub target_date: NaiveDate,
}

impl Goal {
    pub fn new(
        distance_m: u32,
        target_time_sec: Option<u32>,
        target_date: NaiveDate,
    ) -> CoreResult<Self> {
        let goal = Self {
            distance_m,
            target_time_sec,
            target_date,
        };
        goal.validate()?;
        Ok(goal)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.distance_m == 0 {
            return Err(CoreError::invalid("goal distance must be positive"));
        }
        if self.target_time_sec == Some(0) {
            return Err(CoreError::invalid("goal time must be positive when given"));
        }
        Ok(())
    }
}
