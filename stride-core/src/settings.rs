//! Process-wide model settings: the Riegel exponent and the weekly volume cap.
//!
//! Both are read once at startup and never change afterwards. The hosting
//! environment overrides them through `RIEGEL_K` and `WEEKLY_VOLUME_CAP`.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_RIEGEL_EXPONENT: f64 = 1.06;
pub const DEFAULT_WEEKLY_VOLUME_CAP: f64 = 0.10;

pub const RIEGEL_EXPONENT_ENV: &str = "RIEGEL_K";
pub const WEEKLY_VOLUME_CAP_ENV: &str = "WEEKLY_VOLUME_CAP";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fatigue exponent in `T2 = T1 * (D2/D1)^k`.
    #[serde(default = "default_riegel_exponent")]
    pub riegel_exponent: f64,
    /// Fractional week-over-week growth allowed in running volume.
    #[serde(default = "default_weekly_volume_cap")]
    pub weekly_volume_cap: f64,
}

fn default_riegel_exponent() -> f64 {
    DEFAULT_RIEGEL_EXPONENT
}

fn default_weekly_volume_cap() -> f64 {
    DEFAULT_WEEKLY_VOLUME_CAP
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            riegel_exponent: DEFAULT_RIEGEL_EXPONENT,
            weekly_volume_cap: DEFAULT_WEEKLY_VOLUME_CAP,
        }
    }
}

impl Settings {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay(lookup)
    }

    /// Apply overrides from `lookup` on top of `self`.
    ///
    /// Values that do not parse as a positive finite number are ignored.
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(k) = read_positive(&lookup, RIEGEL_EXPONENT_ENV) {
            self.riegel_exponent = k;
        }
        if let Some(cap) = read_positive(&lookup, WEEKLY_VOLUME_CAP_ENV) {
            self.weekly_volume_cap = cap;
        }
        self
    }
}

fn read_positive<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring invalid settings override");
            None
        }
    }
}
