//! Planning kernel: wires the injected collaborators (today, latest snapshot)
//! to the pure engine functions.
//!
//! Persistence, supersession of older plans and snapshot selection races stay
//! with the caller; the kernel only ever sees one already-selected snapshot.

use anyhow::{Context, Result};

use crate::capability::{CapabilityProjection, CapabilitySnapshot, latest_snapshot, project_capability};
use crate::feasibility::{FeasibilityRequest, FeasibilityResult, assess_feasibility_with};
use crate::goal::Goal;
use crate::model::TrainingModel;
use crate::planner::{Plan, PlanRequest};
use crate::settings::Settings;
use crate::time::Clock;

/// Lookup of the runner's most recent capability snapshot.
pub trait SnapshotSource {
    fn latest(&self) -> Option<CapabilitySnapshot>;
}

impl SnapshotSource for [CapabilitySnapshot] {
    fn latest(&self) -> Option<CapabilitySnapshot> {
        latest_snapshot(self).cloned()
    }
}

impl SnapshotSource for Vec<CapabilitySnapshot> {
    fn latest(&self) -> Option<CapabilitySnapshot> {
        self.as_slice().latest()
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for &S {
    fn latest(&self) -> Option<CapabilitySnapshot> {
        (**self).latest()
    }
}

#[derive(Debug, Clone)]
pub struct PlanningKernel<C: Clock, S: SnapshotSource> {
    clock: C,
    snapshots: S,
    settings: Settings,
    model: TrainingModel,
}

impl<C: Clock, S: SnapshotSource> PlanningKernel<C, S> {
    pub fn new(clock: C, snapshots: S, settings: Settings) -> Self {
        Self {
            clock,
            snapshots,
            settings,
            model: TrainingModel::default(),
        }
    }

    pub fn with_model(mut self, model: TrainingModel) -> Self {
        self.model = model;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn model(&self) -> &TrainingModel {
        &self.model
    }

    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    fn current_snapshot(&self) -> Result<CapabilitySnapshot> {
        self.snapshots
            .latest()
            .context("no capability snapshot; record one first")
    }

    /// Standard-distance predictions and zones for the latest snapshot.
    pub fn capability_projection(&self) -> Result<CapabilityProjection> {
        let snap = self.current_snapshot()?;
        Ok(project_capability(&snap, &self.settings)?)
    }

    /// Assess `goal` against the latest snapshot as of today.
    pub fn assess_goal(&self, goal: &Goal) -> Result<FeasibilityResult> {
        goal.validate()?;
        let snap = self.current_snapshot()?;
        let req = FeasibilityRequest::new(self.clock.today(), goal, &snap, &self.settings);
        Ok(assess_feasibility_with(&req, &self.model))
    }

    /// Build a fresh active plan running from the snapshot date to race day.
    pub fn plan_for_goal(&self, goal: &Goal) -> Result<Plan> {
        goal.validate()?;
        let snap = self.current_snapshot()?;
        let req = PlanRequest::for_goal(goal, &snap, &self.settings, &self.model);
        Ok(Plan::generate(&req, &self.model))
    }
}
