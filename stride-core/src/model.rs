//! Training-model parameters.
//!
//! Every heuristic number the feasibility check and the plan generator rely on
//! lives here, so the model can be tuned without touching control flow.
//! `TrainingModel::default()` is the reference model.

use serde::{Deserialize, Serialize};

/// Half-marathon distance in meters.
pub const HALF_MARATHON_M: u32 = 21_097;
/// Marathon distance in meters.
pub const MARATHON_M: u32 = 42_195;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingModel {
    /// Fewer whole weeks than this before race day is never feasible.
    pub min_weeks: u32,
    /// A comfortable effort is assumed repeatable this many times a week.
    pub comfortable_runs_per_week: f64,
    /// Starting weekly volume never drops below this (meters).
    pub volume_floor_m: f64,

    /// Goals at or above this distance count as "long" races.
    pub half_marathon_m: u32,
    pub marathon_m: u32,
    /// Peak long run as a share of race distance, long races.
    pub long_race_long_run_share: f64,
    /// Peak long run as a share of race distance, shorter races.
    pub short_race_long_run_share: f64,
    /// Target weekly volume is at least this many peak long runs...
    pub long_runs_per_peak_week: f64,
    /// ...and at least this multiple of race distance.
    pub race_distance_volume_multiple: f64,
    /// Volume ramp simulation gives up after this many weeks.
    pub max_ramp_weeks: u32,
    /// Training buys at most this fraction off the projected time (0.95 = 5%).
    pub best_case_time_factor: f64,
    /// Distance suggested instead of a marathon.
    pub marathon_alternative_m: u32,
    /// Distance suggested instead of a half marathon.
    pub half_alternative_m: u32,

    /// Long run cap as a share of both race distance and weekly volume.
    pub long_run_share: f64,
    /// Quality session cap as a share of weekly volume.
    pub quality_share: f64,
    /// Quality session cap as a share of the long run.
    pub quality_to_long_run: f64,
    /// Split of the remaining easy volume across the two easy days.
    pub easy_low_share: f64,
    pub easy_high_share: f64,
    /// A cutback week follows every `cutback_every` building weeks.
    pub cutback_every: usize,
    /// Cutback volume relative to the week before it.
    pub cutback_factor: f64,
}

impl Default for TrainingModel {
    fn default() -> Self {
        Self {
            min_weeks: 4,
            comfortable_runs_per_week: 3.0,
            volume_floor_m: 10_000.0,

            half_marathon_m: HALF_MARATHON_M,
            marathon_m: MARATHON_M,
            long_race_long_run_share: 0.7,
            short_race_long_run_share: 0.5,
            long_runs_per_peak_week: 3.0,
            race_distance_volume_multiple: 2.5,
            max_ramp_weeks: 200,
            best_case_time_factor: 0.95,
            marathon_alternative_m: 10_000,
            half_alternative_m: 5_000,

            long_run_share: 0.35,
            quality_share: 0.25,
            quality_to_long_run: 0.8,
            easy_low_share: 0.4,
            easy_high_share: 0.6,
            cutback_every: 3,
            cutback_factor: 0.8,
        }
    }
}

impl TrainingModel {
    /// Weekly volume (meters) a runner is assumed to handle today.
    pub fn starting_weekly_volume(&self, comfortable_distance_m: u32) -> f64 {
        (f64::from(comfortable_distance_m) * self.comfortable_runs_per_week)
            .max(self.volume_floor_m)
    }

    pub fn is_long_race(&self, goal_distance_m: u32) -> bool {
        goal_distance_m >= self.half_marathon_m
    }

    /// Longest run the goal calls for at peak.
    pub fn target_long_run(&self, goal_distance_m: u32) -> f64 {
        let share = if self.is_long_race(goal_distance_m) {
            self.long_race_long_run_share
        } else {
            self.short_race_long_run_share
        };
        f64::from(goal_distance_m) * share
    }

    /// Weekly volume the goal calls for at peak.
    pub fn target_weekly_volume(&self, goal_distance_m: u32) -> f64 {
        let by_long_run = self.target_long_run(goal_distance_m) * self.long_runs_per_peak_week;
        let by_distance = f64::from(goal_distance_m) * self.race_distance_volume_multiple;
        by_long_run.max(by_distance)
    }

    /// Shorter race to suggest when the goal is a half marathon or longer.
    pub fn alternative_distance(&self, goal_distance_m: u32) -> Option<u32> {
        if !self.is_long_race(goal_distance_m) {
            return None;
        }
        if goal_distance_m >= self.marathon_m {
            Some(self.marathon_alternative_m)
        } else {
            Some(self.half_alternative_m)
        }
    }
}
