//! Training pace zones derived from a 10K prediction.
//!
//! Every zone is an offset window around 10K pace. Per-km and per-mile bounds
//! are computed independently: easy/aerobic/long scale their km offsets by
//! the km-to-mile factor, while threshold and interval apply fixed per-mile
//! offsets to the per-mile 10K pace. All bounds truncate toward zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const KM_PER_MILE: f64 = 1.60934;
pub const MILES_PER_10K: f64 = 6.21371;

/// Named training intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneName {
    Easy,
    Aerobic,
    Threshold,
    Interval,
    Long,
}

impl ZoneName {
    pub const ALL: [ZoneName; 5] = [
        ZoneName::Easy,
        ZoneName::Aerobic,
        ZoneName::Threshold,
        ZoneName::Interval,
        ZoneName::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Aerobic => "aerobic",
            Self::Threshold => "threshold",
            Self::Interval => "interval",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ZoneName {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneName::ALL
            .into_iter()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| format!("Unknown zone: {s}"))
    }
}

/// A pace band, `[low, high]` seconds per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneWindow {
    pub sec_per_km: [i64; 2],
    pub sec_per_mi: [i64; 2],
}

/// The five zones, always derived together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceZones {
    pub easy: ZoneWindow,
    pub aerobic: ZoneWindow,
    pub threshold: ZoneWindow,
    pub interval: ZoneWindow,
    pub long: ZoneWindow,
}

impl PaceZones {
    pub fn get(&self, zone: ZoneName) -> &ZoneWindow {
        match zone {
            ZoneName::Easy => &self.easy,
            ZoneName::Aerobic => &self.aerobic,
            ZoneName::Threshold => &self.threshold,
            ZoneName::Interval => &self.interval,
            ZoneName::Long => &self.long,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneName, &ZoneWindow)> + '_ {
        ZoneName::ALL.into_iter().map(move |z| (z, self.get(z)))
    }
}

/// Derive pace zones from a predicted 10K time in seconds.
pub fn derive_zones(predicted_10k_sec: u32) -> CoreResult<PaceZones> {
    if predicted_10k_sec == 0 {
        return Err(CoreError::invalid("predicted 10K time must be positive"));
    }

    let per_km = f64::from(predicted_10k_sec) / 10.0;
    let per_mi = f64::from(predicted_10k_sec) / MILES_PER_10K;

    // Slower-than-10K bands: km offsets, mile offsets scaled from them.
    let slower = |plus_low: f64, plus_high: f64| ZoneWindow {
        sec_per_km: [trunc(per_km + plus_low), trunc(per_km + plus_high)],
        sec_per_mi: [
            trunc(per_mi + plus_low * KM_PER_MILE),
            trunc(per_mi + plus_high * KM_PER_MILE),
        ],
    };

    Ok(PaceZones {
        easy: slower(60.0, 120.0),
        aerobic: slower(30.0, 60.0),
        threshold: ZoneWindow {
            sec_per_km: [trunc(per_km), trunc(per_km + 20.0 / KM_PER_MILE)],
            sec_per_mi: [trunc(per_mi - 10.0), trunc(per_mi + 20.0)],
        },
        interval: ZoneWindow {
            sec_per_km: [
                trunc(per_km - 20.0 / KM_PER_MILE),
                trunc(per_km - 5.0 / KM_PER_MILE),
            ],
            sec_per_mi: [trunc(per_mi - 20.0), trunc(per_mi - 5.0)],
        },
        long: slower(45.0, 105.0),
    })
}

fn trunc(v: f64) -> i64 {
    v as i64
}
