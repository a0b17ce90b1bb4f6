//! Capability snapshots: one self-reported comfortable effort, and what it
//! projects to.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::projection::{STANDARD_DISTANCES_M, project_distances};
use crate::settings::Settings;
use crate::zones::{PaceZones, derive_zones};

/// A comfortable effort as reported on `date`. Never edited; a newer
/// snapshot supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub date: NaiveDate,
    pub comfortable_distance_m: u32,
    pub comfortable_time_sec: u32,
    /// Insertion time; breaks ties between snapshots sharing a date.
    pub recorded_at: DateTime<Utc>,
}

impl CapabilitySnapshot {
    pub fn new(
        date: NaiveDate,
        comfortable_distance_m: u32,
        comfortable_time_sec: u32,
        recorded_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let snap = Self {
            date,
            comfortable_distance_m,
            comfortable_time_sec,
            recorded_at,
        };
        snap.validate()?;
        Ok(snap)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.comfortable_distance_m == 0 {
            return Err(CoreError::invalid("comfortable distance must be positive"));
        }
        if self.comfortable_time_sec == 0 {
            return Err(CoreError::invalid("comfortable time must be positive"));
        }
        Ok(())
    }
}

/// The most recent snapshot by `(date, recorded_at)`.
///
/// On a full tie the entry inserted last wins.
pub fn latest_snapshot(snapshots: &[CapabilitySnapshot]) -> Option<&CapabilitySnapshot> {
    snapshots.iter().max_by_key(|s| (s.date, s.recorded_at))
}

/// Predictions at the standard race distances plus the pace zones they imply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityProjection {
    /// Distance (m) -> predicted time (s).
    pub predictions: BTreeMap<u32, u32>,
    pub zones: PaceZones,
}

impl CapabilityProjection {
    pub fn predicted_time(&self, distance_m: u32) -> Option<u32> {
        self.predictions.get(&distance_m).copied()
    }
}

pub fn project_capability(
    snapshot: &CapabilitySnapshot,
    settings: &Settings,
) -> CoreResult<CapabilityProjection> {
    let projections = project_distances(
        snapshot.comfortable_time_sec,
        snapshot.comfortable_distance_m,
        &STANDARD_DISTANCES_M,
        settings.riegel_exponent,
    )?;
    let predictions: BTreeMap<u32, u32> = projections
        .iter()
        .map(|p| (p.distance_m, p.predicted_time_sec))
        .collect();

    let ten_k = predictions
        .get(&10_000)
        .copied()
        .ok_or_else(|| CoreError::invalid("no 10K prediction"))?;
    let zones = derive_zones(ten_k)?;

    Ok(CapabilityProjection { predictions, zones })
}
