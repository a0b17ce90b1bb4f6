//! Riegel race-time projection.
//!
//! `T2 = T1 * (D2 / D1)^k`. A larger `k` penalizes longer target distances
//! more; it is a tunable model parameter, see [`crate::settings::Settings`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Distances reported for every capability snapshot.
pub const STANDARD_DISTANCES_M: [u32; 4] = [5_000, 10_000, 21_097, 42_195];

/// A predicted finishing time at one distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessProjection {
    pub distance_m: u32,
    pub predicted_time_sec: u32,
}

/// Predict the time at `target_distance_m` from a known effort.
///
/// Rounded to the nearest second (halves to even) and never below one second.
pub fn riegel_predict(
    known_time_sec: u32,
    known_distance_m: u32,
    target_distance_m: u32,
    exponent: f64,
) -> CoreResult<u32> {
    if known_distance_m == 0 || target_distance_m == 0 {
        return Err(CoreError::invalid("distances must be positive"));
    }
    Ok(riegel(
        f64::from(known_time_sec),
        f64::from(known_distance_m),
        f64::from(target_distance_m),
        exponent,
    ))
}

/// Project a known effort onto each of `distances_m`, in order.
pub fn project_distances(
    known_time_sec: u32,
    known_distance_m: u32,
    distances_m: &[u32],
    exponent: f64,
) -> CoreResult<Vec<FitnessProjection>> {
    distances_m
        .iter()
        .map(|&distance_m| {
            riegel_predict(known_time_sec, known_distance_m, distance_m, exponent).map(
                |predicted_time_sec| FitnessProjection {
                    distance_m,
                    predicted_time_sec,
                },
            )
        })
        .collect()
}

// Float casts saturate, so a degenerate ratio yields u32::MAX rather than panicking.
pub(crate) fn riegel(t1: f64, d1: f64, d2: f64, k: f64) -> u32 {
    let t2 = t1 * (d2 / d1).powf(k);
    (t2.round_ties_even() as u32).max(1)
}
