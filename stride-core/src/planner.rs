//! Plan generator: weekly volume progression with cutback weeks, laid out as
//! a fixed four-run week (easy, quality, easy, long).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::CapabilitySnapshot;
use crate::goal::Goal;
use crate::model::TrainingModel;
use crate::settings::Settings;
use crate::time::whole_weeks_between;
use crate::zones::ZoneName;

/// Day offsets from the week anchor: Mon, Wed, Fri, Sun for a Monday anchor.
pub const WEEKDAY_OFFSETS: [i64; 4] = [0, 2, 4, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Easy,
    Tempo,
    Interval,
    Long,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Tempo => "tempo",
            Self::Interval => "interval",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One scheduled session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSpec {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub target_distance_m: Option<u32>,
    pub target_duration_sec: Option<u32>,
    pub target_zone: Option<ZoneName>,
    pub description: String,
    pub is_key: bool,
}

impl WorkoutSpec {
    fn run(
        date: NaiveDate,
        workout_type: WorkoutType,
        distance_m: f64,
        zone: ZoneName,
        description: &str,
        is_key: bool,
    ) -> Self {
        Self {
            date,
            workout_type,
            target_distance_m: Some(distance_m.max(0.0) as u32),
            target_duration_sec: None,
            target_zone: Some(zone),
            description: description.to_string(),
            is_key,
        }
    }
}

/// Inputs to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal_distance_m: u32,
    /// Week-one volume in meters.
    pub start_weekly_volume_m: f64,
    /// Week-over-week growth fraction.
    pub weekly_growth: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PlanRequest {
    /// Plan from the snapshot date to race day, starting at the volume the
    /// snapshot implies and growing at the configured cap.
    pub fn for_goal(
        goal: &Goal,
        snapshot: &CapabilitySnapshot,
        settings: &Settings,
        model: &TrainingModel,
    ) -> Self {
        Self {
            goal_distance_m: goal.distance_m,
            start_weekly_volume_m: model.starting_weekly_volume(snapshot.comfortable_distance_m),
            weekly_growth: settings.weekly_volume_cap,
            start_date: snapshot.date,
            end_date: goal.target_date,
        }
    }

    /// Number of scheduled weeks; never less than one.
    pub fn weeks(&self) -> usize {
        usize::try_from(whole_weeks_between(self.start_date, self.end_date).max(1)).unwrap_or(1)
    }
}

/// Compound `start` by `growth` once per week.
pub fn weekly_volumes(start: f64, growth: f64, weeks: usize) -> Vec<f64> {
    std::iter::successors(Some(start), |v| Some(v * (1.0 + growth)))
        .take(weeks)
        .collect()
}

/// Insert a reduced week after every `every`-th week (unless it is the
/// last), then cut the sequence back to its original length.
///
/// Cutbacks displace later weeks rather than extending the schedule.
pub fn insert_cutbacks(volumes: &[f64], every: usize, factor: f64) -> Vec<f64> {
    if every == 0 {
        return volumes.to_vec();
    }
    let mut out = Vec::with_capacity(volumes.len() + volumes.len() / every);
    for (i, &v) in volumes.iter().enumerate() {
        out.push(v);
        if (i + 1) % every == 0 && i + 1 < volumes.len() {
            out.push((v * factor).max(0.0));
        }
    }
    out.truncate(volumes.len());
    out
}

/// Generate with the reference training model.
pub fn generate_plan(req: &PlanRequest) -> Vec<WorkoutSpec> {
    generate_plan_with(req, &TrainingModel::default())
}

pub fn generate_plan_with(req: &PlanRequest, model: &TrainingModel) -> Vec<WorkoutSpec> {
    let weeks = req.weeks();
    let volumes = insert_cutbacks(
        &weekly_volumes(req.start_weekly_volume_m, req.weekly_growth, weeks),
        model.cutback_every,
        model.cutback_factor,
    );
    debug!(weeks, ?volumes, "weekly volumes");

    let goal_m = f64::from(req.goal_distance_m);
    let mut workouts = Vec::with_capacity(weeks * WEEKDAY_OFFSETS.len());
    let mut anchor = req.start_date;

    for (week, &volume) in volumes.iter().enumerate() {
        let long_run = (goal_m * model.long_run_share).min(volume * model.long_run_share);
        let quality = (volume * model.quality_share).min(long_run * model.quality_to_long_run);
        let easy_total = (volume - long_run - quality).max(0.0);

        let [easy_day, quality_day, easy_day_2, long_day] =
            WEEKDAY_OFFSETS.map(|o| anchor + Duration::days(o));

        let (quality_type, quality_zone) = if week % 2 == 0 {
            (WorkoutType::Tempo, ZoneName::Threshold)
        } else {
            (WorkoutType::Interval, ZoneName::Interval)
        };

        workouts.push(WorkoutSpec::run(
            easy_day,
            WorkoutType::Easy,
            easy_total * model.easy_low_share,
            ZoneName::Easy,
            "Easy run",
            false,
        ));
        workouts.push(WorkoutSpec::run(
            quality_day,
            quality_type,
            quality,
            quality_zone,
            "Quality session",
            true,
        ));
        workouts.push(WorkoutSpec::run(
            easy_day_2,
            WorkoutType::Easy,
            easy_total * model.easy_high_share,
            ZoneName::Easy,
            "Easy run",
            false,
        ));
        workouts.push(WorkoutSpec::run(
            long_day,
            WorkoutType::Long,
            long_run,
            ZoneName::Aerobic,
            "Long run",
            true,
        ));

        anchor += Duration::days(7);
    }

    info!(weeks, workouts = workouts.len(), "plan generated");
    workouts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Active,
    Superseded,
}

/// A generated schedule for one goal over a date range.
///
/// Only one plan per goal is meant to be active; the caller flips older
/// plans to superseded before storing a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: PlanStatus,
    pub workouts: Vec<WorkoutSpec>,
}

impl Plan {
    pub fn generate(req: &PlanRequest, model: &TrainingModel) -> Self {
        Self {
            start_date: req.start_date,
            end_date: req.end_date,
            status: PlanStatus::Active,
            workouts: generate_plan_with(req, model),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlanStatus::Active
    }

    pub fn supersede(&mut self) {
        self.status = PlanStatus::Superseded;
    }

    /// Workouts dated within `[from, to]`; either bound may be open.
    pub fn workouts_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> impl Iterator<Item = &WorkoutSpec> {
        self.workouts.iter().filter(move |w| {
            from.is_none_or(|f| w.date >= f) && to.is_none_or(|t| w.date <= t)
        })
    }

    pub fn key_sessions(&self) -> impl Iterator<Item = &WorkoutSpec> {
        self.workouts.iter().filter(|w| w.is_key)
    }

    pub fn total_distance_m(&self) -> u64 {
        self.workouts
            .iter()
            .filter_map(|w| w.target_distance_m)
            .map(u64::from)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn half_request(weeks: i64) -> PlanRequest {
        let start = d(2026, 1, 5);
        PlanRequest {
            goal_distance_m: 21_097,
            start_weekly_volume_m: 20_000.0,
            weekly_growth: 0.1,
            start_date: start,
            end_date: start + Duration::weeks(weeks),
        }
    }

    #[test]
    fn test_generate_plan_invariants() {
        let workouts = generate_plan(&half_request(8));
        assert_eq!(workouts.len(), 8 * 4);
        let longs = workouts.iter().filter(|w| w.workout_type == WorkoutType::Long).count();
        assert_eq!(longs, 8);
        assert!(workouts.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_no_back_to_back_key_sessions() {
        let workouts = generate_plan(&half_request(8));
        let key_dates: Vec<NaiveDate> = workouts.iter().filter(|w| w.is_key).map(|w| w.date).collect();
        assert_eq!(key_dates.len(), 16);
        for pair in key_dates.windows(2) {
            assert!((pair[1] - pair[0]).num_days() > 1, "{pair:?}");
        }
    }

    #[test]
    fn test_week_template() {
        let workouts = generate_plan(&half_request(2));
        let types: Vec<WorkoutType> = workouts.iter().map(|w| w.workout_type).collect();
        assert_eq!(
            types,
            vec![
                WorkoutType::Easy,
                WorkoutType::Tempo,
                WorkoutType::Easy,
                WorkoutType::Long,
                WorkoutType::Easy,
                WorkoutType::Interval,
                WorkoutType::Easy,
                WorkoutType::Long,
            ]
        );
        assert_eq!(workouts[1].target_zone, Some(ZoneName::Threshold));
        assert_eq!(workouts[5].target_zone, Some(ZoneName::Interval));
        assert_eq!(workouts[3].target_zone, Some(ZoneName::Aerobic));
        assert_eq!(workouts[0].date, d(2026, 1, 5));
        assert_eq!(workouts[3].date, d(2026, 1, 11));
        assert_eq!(workouts[4].date, d(2026, 1, 12));
    }

    #[test]
    fn test_week_one_distances() {
        // 20000 m: long min(7383.95, 7000) = 7000, quality min(5000, 5600) = 5000,
        // easy 8000 split 3200 / 4800.
        let workouts = generate_plan(&half_request(1));
        let dists: Vec<u32> = workouts.iter().filter_map(|w| w.target_distance_m).collect();
        assert_eq!(dists, vec![3_200, 5_000, 4_800, 7_000]);
    }

    #[test]
    fn test_long_run_capped_by_goal() {
        let mut req = half_request(1);
        req.goal_distance_m = 5_000;
        req.start_weekly_volume_m = 40_000.0;
        let workouts = generate_plan(&req);
        // long min(1750, 14000); quality min(10000, 1400); easy 36850.
        assert_eq!(workouts[3].target_distance_m, Some(1_750));
        assert_eq!(workouts[1].target_distance_m, Some(1_400));
        assert_eq!(workouts[0].target_distance_m, Some(14_740));
        assert_eq!(workouts[2].target_distance_m, Some(22_110));
    }

    #[test]
    fn test_cutback_after_third_week() {
        let vols = weekly_volumes(20_000.0, 0.1, 9);
        let out = insert_cutbacks(&vols, 3, 0.8);
        assert_eq!(out.len(), 9);
        assert_eq!(&out[..3], &vols[..3]);
        assert!((out[3] - vols[2] * 0.8).abs() < 1e-9);
        assert!(out[3] < out[2]);
        assert_eq!(&out[4..7], &vols[3..6]);
        assert!((out[7] - vols[5] * 0.8).abs() < 1e-9);
        assert_eq!(out[8], vols[6]);
    }

    #[test]
    fn test_no_cutback_after_final_week() {
        let vols = weekly_volumes(10_000.0, 0.1, 3);
        assert_eq!(insert_cutbacks(&vols, 3, 0.8), vols);
        let four = weekly_volumes(10_000.0, 0.1, 4);
        let out = insert_cutbacks(&four, 3, 0.8);
        assert!((out[3] - four[2] * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_cutback_does_not_shift_dates() {
        let workouts = generate_plan(&half_request(5));
        let long_dates: Vec<NaiveDate> = workouts
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Long)
            .map(|w| w.date)
            .collect();
        for pair in long_dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
    }

    #[test]
    fn test_short_window_clamps_to_one_week() {
        let start = d(2026, 1, 5);
        let req = PlanRequest {
            end_date: start + Duration::days(3),
            ..half_request(0)
        };
        assert_eq!(req.weeks(), 1);
        assert_eq!(generate_plan(&req).len(), 4);

        let backwards = PlanRequest {
            end_date: start - Duration::days(30),
            ..half_request(0)
        };
        assert_eq!(generate_plan(&backwards).len(), 4);
    }

    #[test]
    fn test_idempotent() {
        let req = half_request(12);
        assert_eq!(generate_plan(&req), generate_plan(&req));
    }

    #[test]
    fn test_plan_queries() {
        let mut plan = Plan::generate(&half_request(4), &TrainingModel::default());
        assert!(plan.is_active());
        assert_eq!(plan.key_sessions().count(), 8);
        let week_two: Vec<_> = plan
            .workouts_between(Some(d(2026, 1, 12)), Some(d(2026, 1, 18)))
            .collect();
        assert_eq!(week_two.len(), 4);
        assert_eq!(plan.workouts_between(None, Some(d(2026, 1, 7))).count(), 2);
        assert_eq!(plan.workouts_between(Some(d(2026, 1, 30)), None).count(), 2);
        assert!(plan.total_distance_m() > 0);
        plan.supersede();
        assert_eq!(plan.status, PlanStatus::Superseded);
    }

    #[test]
    fn test_workout_wire_shape() {
        let workouts = generate_plan(&half_request(1));
        let v = serde_json::to_value(&workouts[1]).unwrap();
        assert_eq!(v["type"], "tempo");
        assert_eq!(v["target_zone"], "threshold");
        assert_eq!(v["is_key"], true);
        assert!(v["target_duration_sec"].is_null());
    }
}
