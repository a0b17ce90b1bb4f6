//! Human-readable output and CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use stride_core::time::format_duration;
use stride_core::{
    CapabilityProjection, CapabilitySnapshot, FeasibilityResult, Goal, Plan, SessionLog, Tradeoff,
    WorkoutSpec,
};

pub fn distance_label(meters: u32) -> String {
    match meters {
        5_000 => "5K".to_string(),
        10_000 => "10K".to_string(),
        21_097 => "Half".to_string(),
        42_195 => "Marathon".to_string(),
        m => format!("{:.1} km", f64::from(m) / 1000.0),
    }
}

fn pace_range(bounds: [i64; 2]) -> String {
    format!("{}-{}", format_duration(bounds[0]), format_duration(bounds[1]))
}

pub fn print_snapshot(snap: &CapabilitySnapshot) {
    println!(
        "{}: {} in {}",
        snap.date,
        distance_label(snap.comfortable_distance_m),
        format_duration(i64::from(snap.comfortable_time_sec))
    );
}

pub fn print_projection(proj: &CapabilityProjection) {
    println!("## Predictions\n");
    for (distance, secs) in &proj.predictions {
        println!("- {:<9} {}", distance_label(*distance), format_duration(i64::from(*secs)));
    }
    println!("\n## Pace zones\n");
    println!("{:<10} {:>13} {:>13}", "zone", "per km", "per mi");
    for (zone, window) in proj.zones.iter() {
        println!(
            "{:<10} {:>13} {:>13}",
            zone,
            pace_range(window.sec_per_km),
            pace_range(window.sec_per_mi)
        );
    }
}

pub fn print_goal(goal: &Goal) {
    let time = goal
        .target_time_sec
        .map(|t| format!(" in {}", format_duration(i64::from(t))))
        .unwrap_or_default();
    println!("{}{} on {}", distance_label(goal.distance_m), time, goal.target_date);
}

pub fn print_session_log(log: &SessionLog) {
    let a = &log.actuals;
    let mut parts = Vec::new();
    if let Some(m) = a.actual_distance_m {
        parts.push(distance_label(m));
    }
    if let Some(t) = a.actual_time_sec {
        parts.push(format_duration(i64::from(t)));
    }
    if let Some(rpe) = a.rpe {
        parts.push(format!("RPE {rpe}"));
    }
    println!("Logged {} {}: {}", log.workout_date, log.workout_type, parts.join(", "));
    if let Some(notes) = &a.notes {
        println!("  {notes}");
    }
}

pub fn print_feasibility(res: &FeasibilityResult) {
    if res.feasible {
        println!("Feasible.");
        return;
    }
    println!("Not feasible as set.\n");
    for reason in &res.reasons {
        println!("- {reason}");
    }
    if res.tradeoffs.is_empty() {
        return;
    }
    println!("\nOptions:");
    for t in &res.tradeoffs {
        match t {
            Tradeoff::Date { push_weeks } => println!("- move race day back {push_weeks} week(s)"),
            Tradeoff::Time { relax_seconds } => println!(
                "- relax the target time by {}",
                format_duration(i64::from(*relax_seconds))
            ),
            Tradeoff::Distance { suggest_distance_m } => {
                println!("- race a {} instead", distance_label(*suggest_distance_m))
            }
        }
    }
}

pub fn print_workouts<'a>(workouts: impl IntoIterator<Item = &'a WorkoutSpec>) {
    for w in workouts {
        let km = w
            .target_distance_m
            .map(|m| format!("{:>5.1} km", f64::from(m) / 1000.0))
            .unwrap_or_default();
        let zone = w.target_zone.map(|z| z.to_string()).unwrap_or_default();
        let key = if w.is_key { "*" } else { " " };
        println!(
            "{} {} {key} {:<9} {km} {:<10} {}",
            w.date,
            w.date.format("%a"),
            w.workout_type.as_str(),
            zone,
            w.description
        );
    }
}

#[derive(Debug, Serialize)]
struct WorkoutRow<'a> {
    date: String,
    #[serde(rename = "type")]
    workout_type: &'a str,
    target_distance_m: Option<u32>,
    target_duration_sec: Option<u32>,
    target_zone: Option<&'static str>,
    is_key: bool,
    description: &'a str,
}

pub fn write_plan_csv(path: &Path, plan: &Plan) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for w in &plan.workouts {
        wtr.serialize(WorkoutRow {
            date: w.date.to_string(),
            workout_type: w.workout_type.as_str(),
            target_distance_m: w.target_distance_m,
            target_duration_sec: w.target_duration_sec,
            target_zone: w.target_zone.map(|z| z.as_str()),
            is_key: w.is_key,
            description: &w.description,
        })?;
    }
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(plan.workouts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stride_core::{PlanRequest, TrainingModel};

    #[test]
    fn test_distance_label() {
        assert_eq!(distance_label(21_097), "Half");
        assert_eq!(distance_label(15_000), "15.0 km");
    }

    #[test]
    fn test_write_plan_csv() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let req = PlanRequest {
            goal_distance_m: 10_000,
            start_weekly_volume_m: 15_000.0,
            weekly_growth: 0.1,
            start_date: start,
            end_date: start + chrono::Duration::weeks(2),
        };
        let plan = Plan::generate(&req, &TrainingModel::default());

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plan.csv");
        assert_eq!(write_plan_csv(&path, &plan).unwrap(), 8);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,type,target_distance_m,target_duration_sec,target_zone,is_key,description")
        );
        assert!(lines.next().unwrap().starts_with("2026-03-02,easy,"));
        assert_eq!(text.lines().count(), 9);
    }
}
