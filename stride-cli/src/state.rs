//! File-backed state under `~/.stride` (or `$STRIDE_HOME`): capability
//! snapshots, the current goal, generated plans and session logs.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use stride_core::{CapabilitySnapshot, Goal, Plan, SessionLog};

pub const HOME_ENV: &str = "STRIDE_HOME";

pub fn stride_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".stride"))
}

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn open_default() -> Result<Self> {
        let dir = Self::new(stride_home()?);
        dir.ensure()?;
        Ok(dir)
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| format!("create {}", self.root.display()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    fn snapshots_path(&self) -> PathBuf {
        self.root.join("snapshots.json")
    }

    fn goal_path(&self) -> PathBuf {
        self.root.join("goal.json")
    }

    fn plans_path(&self) -> PathBuf {
        self.root.join("plans.json")
    }

    fn logs_path(&self) -> PathBuf {
        self.root.join("logs.json")
    }

    /// All snapshots in insertion order.
    pub fn load_snapshots(&self) -> Result<Vec<CapabilitySnapshot>> {
        Ok(read_json(&self.snapshots_path())?.unwrap_or_default())
    }

    pub fn append_snapshot(&self, snap: CapabilitySnapshot) -> Result<()> {
        let mut all = self.load_snapshots()?;
        all.push(snap);
        write_json(&self.snapshots_path(), &all)
    }

    pub fn load_goal(&self) -> Result<Option<Goal>> {
        read_json(&self.goal_path())
    }

    pub fn save_goal(&self, goal: &Goal) -> Result<()> {
        write_json(&self.goal_path(), goal)
    }

    /// Save `goal`; when it differs from the stored one, plans built for the
    /// old goal stop being active. Returns how many plans were superseded.
    pub fn replace_goal(&self, goal: &Goal) -> Result<usize> {
        let retired = if self.load_goal()?.as_ref() == Some(goal) {
            0
        } else {
            self.supersede_active_plans()?
        };
        self.save_goal(goal)?;
        Ok(retired)
    }

    pub fn load_plans(&self) -> Result<Vec<Plan>> {
        Ok(read_json(&self.plans_path())?.unwrap_or_default())
    }

    /// Most recently stored active plan.
    pub fn active_plan(&self) -> Result<Option<Plan>> {
        Ok(self.load_plans()?.into_iter().rev().find(Plan::is_active))
    }

    pub fn supersede_active_plans(&self) -> Result<usize> {
        let mut plans = self.load_plans()?;
        let mut n = 0;
        for p in plans.iter_mut().filter(|p| p.is_active()) {
            p.supersede();
            n += 1;
        }
        if n > 0 {
            write_json(&self.plans_path(), &plans)?;
        }
        Ok(n)
    }

    /// Mark every stored plan superseded, then append `plan` as the active one.
    pub fn store_active_plan(&self, plan: Plan) -> Result<()> {
        self.supersede_active_plans()?;
        let mut plans = self.load_plans()?;
        plans.push(plan);
        write_json(&self.plans_path(), &plans)
    }

    pub fn load_logs(&self) -> Result<Vec<SessionLog>> {
        Ok(read_json(&self.logs_path())?.unwrap_or_default())
    }

    pub fn append_log(&self, log: SessionLog) -> Result<()> {
        let mut all = self.load_logs()?;
        all.push(log);
        write_json(&self.logs_path(), &all)
    }

    /// Logs recorded against `plan`, oldest first.
    pub fn logs_for(&self, plan: &Plan) -> Result<Vec<SessionLog>> {
        let mut logs: Vec<_> = self
            .load_logs()?
            .into_iter()
            .filter(|l| l.belongs_to(plan))
            .collect();
        logs.sort_by_key(|l| (l.workout_date, l.logged_at));
        Ok(logs)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use stride_core::{PlanRequest, PlanStatus, SessionActuals, TrainingModel};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn plan(start: NaiveDate) -> Plan {
        let req = PlanRequest {
            goal_distance_m: 10_000,
            start_weekly_volume_m: 15_000.0,
            weekly_growth: 0.1,
            start_date: start,
            end_date: start + chrono::Duration::weeks(2),
        };
        Plan::generate(&req, &TrainingModel::default())
    }

    #[test]
    fn test_empty_state() {
        let tmp = tempfile::tempdir().unwrap();
        let state = StateDir::new(tmp.path());
        assert!(state.load_snapshots().unwrap().is_empty());
        assert!(state.load_goal().unwrap().is_none());
        assert!(state.active_plan().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_and_goal_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let state = StateDir::new(tmp.path());

        let snap = CapabilitySnapshot::new(d(2026, 3, 2), 5_000, 1_800, Utc::now()).unwrap();
        state.append_snapshot(snap.clone()).unwrap();
        assert_eq!(state.load_snapshots().unwrap(), vec![snap]);

        let goal = Goal::new(21_097, Some(6_300), d(2026, 6, 1)).unwrap();
        state.save_goal(&goal).unwrap();
        assert_eq!(state.load_goal().unwrap(), Some(goal));
    }

    #[test]
    fn test_new_plan_supersedes_old() {
        let tmp = tempfile::tempdir().unwrap();
        let state = StateDir::new(tmp.path());

        state.store_active_plan(plan(d(2026, 3, 2))).unwrap();
        state.store_active_plan(plan(d(2026, 3, 9))).unwrap();

        let plans = state.load_plans().unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].status, PlanStatus::Superseded);
        assert_eq!(plans.iter().filter(|p| p.is_active()).count(), 1);
        assert_eq!(state.active_plan().unwrap().unwrap().start_date, d(2026, 3, 9));
    }

    #[test]
    fn test_new_goal_retires_active_plan() {
        let tmp = tempfile::tempdir().unwrap();
        let state = StateDir::new(tmp.path());

        let half = Goal::new(21_097, None, d(2026, 6, 1)).unwrap();
        assert_eq!(state.replace_goal(&half).unwrap(), 0);
        state.store_active_plan(plan(d(2026, 3, 2))).unwrap();

        // Same goal again keeps the plan.
        assert_eq!(state.replace_goal(&half).unwrap(), 0);
        assert!(state.active_plan().unwrap().is_some());

        let tenk = Goal::new(10_000, None, d(2026, 5, 3)).unwrap();
        assert_eq!(state.replace_goal(&tenk).unwrap(), 1);
        assert!(state.active_plan().unwrap().is_none());
        assert_eq!(state.load_goal().unwrap(), Some(tenk));
    }

    #[test]
    fn test_session_log_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let state = StateDir::new(tmp.path());
        let current = plan(d(2026, 3, 9));
        let old = plan(d(2026, 3, 2));

        let actuals = SessionActuals {
            actual_distance_m: Some(4_800),
            actual_time_sec: Some(1_740),
            rpe: Some(5),
            notes: Some("felt smooth".into()),
        };
        let late = SessionLog::for_workout(&current, d(2026, 3, 11), actuals.clone(), Utc::now()).unwrap();
        let early = SessionLog::for_workout(&current, d(2026, 3, 9), actuals.clone(), Utc::now()).unwrap();
        let other = SessionLog::for_workout(&old, d(2026, 3, 2), actuals, Utc::now()).unwrap();
        state.append_log(late.clone()).unwrap();
        state.append_log(other).unwrap();
        state.append_log(early.clone()).unwrap();

        assert_eq!(state.load_logs().unwrap().len(), 3);
        assert_eq!(state.logs_for(&current).unwrap(), vec![early, late]);
    }
}
