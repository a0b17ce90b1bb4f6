//! Goal feasibility: can the runner ramp volume in time, and is the target
//! time within reach of current fitness? When not, propose tradeoffs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::CapabilitySnapshot;
use crate::goal::Goal;
use crate::model::TrainingModel;
use crate::projection::riegel;
use crate::settings::Settings;
use crate::time::whole_weeks_between;

pub const REASON_TIME_AGGRESSIVE: &str = "Target time aggressive vs current fitness";
pub const REASON_VOLUME_UNREACHABLE: &str = "Target weekly volume unreachable under growth cap";

/// Reason given when fewer than `min_weeks` remain before race day.
pub fn reason_too_soon(min_weeks: u32) -> String {
    format!("Less than {min_weeks} weeks available")
}

/// Everything the assessment looks at, as plain values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRequest {
    pub today: NaiveDate,
    pub target_date: NaiveDate,
    pub goal_distance_m: u32,
    pub target_time_sec: Option<u32>,
    pub comfortable_distance_m: u32,
    pub comfortable_time_sec: u32,
    /// Weekly volume growth fraction (0.10 = 10%).
    pub weekly_volume_cap: f64,
    pub riegel_exponent: f64,
}

impl FeasibilityRequest {
    pub fn new(
        today: NaiveDate,
        goal: &Goal,
        snapshot: &CapabilitySnapshot,
        settings: &Settings,
    ) -> Self {
        Self {
            today,
            target_date: goal.target_date,
            goal_distance_m: goal.distance_m,
            target_time_sec: goal.target_time_sec,
            comfortable_distance_m: snapshot.comfortable_distance_m,
            comfortable_time_sec: snapshot.comfortable_time_sec,
            weekly_volume_cap: settings.weekly_volume_cap,
            riegel_exponent: settings.riegel_exponent,
        }
    }
}

/// Which part of the goal to give on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lever {
    Date,
    Time,
    Distance,
}

/// A concrete way to make the goal feasible.
///
/// Serializes as `{"lever": "date", "recommendation": {"push_weeks": 3}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "lever", content = "recommendation", rename_all = "snake_case")]
pub enum Tradeoff {
    Date { push_weeks: u32 },
    Time { relax_seconds: u32 },
    Distance { suggest_distance_m: u32 },
}

impl Tradeoff {
    pub fn lever(&self) -> Lever {
        match self {
            Self::Date { .. } => Lever::Date,
            Self::Time { .. } => Lever::Time,
            Self::Distance { .. } => Lever::Distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub feasible: bool,
    pub reasons: Vec<String>,
    pub tradeoffs: Vec<Tradeoff>,
}

impl FeasibilityResult {
    pub fn has_lever(&self, lever: Lever) -> bool {
        self.tradeoffs.iter().any(|t| t.lever() == lever)
    }
}

/// Outcome of ramping weekly volume toward the goal's peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeRamp {
    pub start_volume_m: f64,
    pub target_volume_m: f64,
    pub weeks_needed: u32,
    pub reached: bool,
}

/// Count weeks of compounding growth until `target` is met, giving up after
/// `max_weeks`.
pub fn simulate_volume_ramp(start: f64, target: f64, growth: f64, max_weeks: u32) -> VolumeRamp {
    let mut volume = start;
    let mut weeks = 0;
    while volume < target && weeks < max_weeks {
        volume *= 1.0 + growth;
        weeks += 1;
    }
    VolumeRamp {
        start_volume_m: start,
        target_volume_m: target,
        weeks_needed: weeks,
        reached: volume >= target,
    }
}

/// Assess with the reference training model.
pub fn assess_feasibility(req: &FeasibilityRequest) -> FeasibilityResult {
    assess_feasibility_with(req, &TrainingModel::default())
}

pub fn assess_feasibility_with(req: &FeasibilityRequest, model: &TrainingModel) -> FeasibilityResult {
    let mut reasons = Vec::new();

    let weeks_available = u32::try_from(whole_weeks_between(req.today, req.target_date).max(0))
        .unwrap_or(u32::MAX);
    if weeks_available < model.min_weeks {
        reasons.push(reason_too_soon(model.min_weeks));
    }

    let ramp = simulate_volume_ramp(
        model.starting_weekly_volume(req.comfortable_distance_m),
        model.target_weekly_volume(req.goal_distance_m),
        req.weekly_volume_cap,
        model.max_ramp_weeks,
    );
    debug!(
        start_volume_m = ramp.start_volume_m,
        target_volume_m = ramp.target_volume_m,
        weeks_needed = ramp.weeks_needed,
        weeks_available,
        reached = ramp.reached,
        "volume ramp"
    );
    if !ramp.reached {
        reasons.push(REASON_VOLUME_UNREACHABLE.to_string());
    }

    // Time check: training buys at most a fixed fraction off the projection.
    let mut relax_seconds = None;
    if let Some(target) = req.target_time_sec.filter(|t| *t > 0) {
        let predicted = riegel(
            f64::from(req.comfortable_time_sec),
            f64::from(req.comfortable_distance_m),
            f64::from(req.goal_distance_m),
            req.riegel_exponent,
        );
        let best_case = (f64::from(predicted) * model.best_case_time_factor) as u32;
        debug!(predicted, best_case, target, "time check");
        if target < best_case {
            relax_seconds = Some(best_case - target);
            reasons.push(REASON_TIME_AGGRESSIVE.to_string());
        }
    }

    let feasible = ramp.reached
        && ramp.weeks_needed <= weeks_available
        && relax_seconds.is_none()
        && reasons.is_empty();

    let mut tradeoffs = Vec::new();
    if !feasible {
        let push_weeks = ramp.weeks_needed.saturating_sub(weeks_available);
        if push_weeks > 0 {
            tradeoffs.push(Tradeoff::Date { push_weeks });
        }
        if let Some(relax_seconds) = relax_seconds {
            tradeoffs.push(Tradeoff::Time { relax_seconds });
        }
        if let Some(suggest_distance_m) = model.alternative_distance(req.goal_distance_m) {
            tradeoffs.push(Tradeoff::Distance { suggest_distance_m });
        }
    }

    info!(
        feasible,
        reasons = reasons.len(),
        tradeoffs = tradeoffs.len(),
        "feasibility assessed"
    );

    FeasibilityResult {
        feasible,
        reasons,
        tradeoffs,
    }
}
