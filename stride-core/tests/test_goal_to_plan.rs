use chrono::{Duration, NaiveDate, TimeZone, Utc};
use stride_core::{
    CapabilitySnapshot, FixedClock, Goal, Lever, PlanningKernel, Settings, SnapshotSource,
    WorkoutType, ZoneName, derive_zones,
};

/// In-memory stand-in for the persistence layer: keeps snapshots in
/// insertion order and answers "latest" the way the service would.
#[derive(Default)]
struct MemoryStore {
    snapshots: Vec<CapabilitySnapshot>,
}

impl MemoryStore {
    fn record(&mut self, date: NaiveDate, distance_m: u32, time_sec: u32) {
        let recorded_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(self.snapshots.len() as i64);
        self.snapshots
            .push(CapabilitySnapshot::new(date, distance_m, time_sec, recorded_at).unwrap());
    }
}

impl SnapshotSource for MemoryStore {
    fn latest(&self) -> Option<CapabilitySnapshot> {
        stride_core::latest_snapshot(&self.snapshots).cloned()
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// A runner records a base effort, sets a 10K goal, checks it and plans it.
#[test]
fn test_ten_k_goal_end_to_end() {
    let today = d(2026, 3, 2);
    let mut store = MemoryStore::default();
    store.record(d(2026, 2, 15), 3_000, 1_080);
    store.record(today, 5_000, 1_800);

    let kernel = PlanningKernel::new(FixedClock(today), &store, Settings::default());

    let projection = kernel.capability_projection().unwrap();
    let ten_k = projection.predicted_time(10_000).unwrap();
    assert!(ten_k > 1_800);
    assert_eq!(projection.zones, derive_zones(ten_k).unwrap());

    let goal = Goal::new(10_000, None, today + Duration::weeks(16)).unwrap();
    let res = kernel.assess_goal(&goal).unwrap();
    assert!(res.feasible, "{res:?}");

    let plan = kernel.plan_for_goal(&goal).unwrap();
    assert_eq!(plan.workouts.len(), 16 * 4);
    assert_eq!(plan.workouts.first().unwrap().date, today);
    assert!(plan.workouts.last().unwrap().date < goal.target_date);

    for w in &plan.workouts {
        match w.workout_type {
            WorkoutType::Tempo => assert_eq!(w.target_zone, Some(ZoneName::Threshold)),
            WorkoutType::Interval => assert_eq!(w.target_zone, Some(ZoneName::Interval)),
            WorkoutType::Long => assert_eq!(w.target_zone, Some(ZoneName::Aerobic)),
            WorkoutType::Easy => assert!(!w.is_key),
        }
    }
}

/// A half marathon three weeks out from a short base needs more time.
#[test]
fn test_half_marathon_too_soon() {
    let today = d(2026, 3, 2);
    let mut store = MemoryStore::default();
    store.record(today, 3_000, 18 * 60);

    let kernel = PlanningKernel::new(FixedClock(today), &store, Settings::default());
    let goal = Goal::new(21_097, None, today + Duration::weeks(3)).unwrap();
    let res = kernel.assess_goal(&goal).unwrap();

    assert!(!res.feasible);
    assert!(res.has_lever(Lever::Date));
    assert!(res.has_lever(Lever::Distance));
    assert!(!res.has_lever(Lever::Time));
}

/// A newer snapshot changes every downstream answer.
#[test]
fn test_newer_snapshot_supersedes() {
    let today = d(2026, 3, 2);
    let mut store = MemoryStore::default();
    store.record(today, 5_000, 1_800);
    let before = PlanningKernel::new(FixedClock(today), &store, Settings::default())
        .capability_projection()
        .unwrap();

    store.record(today, 5_000, 1_500);
    let after = PlanningKernel::new(FixedClock(today), &store, Settings::default())
        .capability_projection()
        .unwrap();

    assert!(after.predicted_time(42_195) < before.predicted_time(42_195));
}

/// The serialized result keeps the lever/recommendation wire shape.
#[test]
fn test_feasibility_json() {
    let today = d(2026, 3, 2);
    let mut store = MemoryStore::default();
    store.record(today, 5_000, 1_800);
    let kernel = PlanningKernel::new(FixedClock(today), &store, Settings::default());

    let goal = Goal::new(42_195, Some(3 * 3600), today + Duration::weeks(6)).unwrap();
    let res = kernel.assess_goal(&goal).unwrap();
    let v = serde_json::to_value(&res).unwrap();

    assert_eq!(v["feasible"], false);
    assert_eq!(v["tradeoffs"][0]["lever"], "date");
    assert_eq!(v["tradeoffs"][1]["lever"], "time");
    assert_eq!(v["tradeoffs"][2]["recommendation"]["suggest_distance_m"], 10_000);
}
