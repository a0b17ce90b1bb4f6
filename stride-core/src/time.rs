//! Calendar helpers: date/duration parsing, whole-week spans, and the
//! injectable "today" source.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;

/// Parse an ISO calendar date such as "2026-03-01".
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

/// Parse a run duration into whole seconds.
///
/// Accepts "h:mm:ss", "m:ss" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<u32> {
    let s = s.trim();
    let re = Regex::new(r"^(?:(\d+):)?(\d+):([0-5]\d)$")?;

    let secs = if let Some(caps) = re.captures(s) {
        let hours: u64 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse())?;
        let minutes: u64 = caps[2].parse()?;
        let seconds: u64 = caps[3].parse()?;
        if hours > 0 && minutes >= 60 {
            bail!("invalid duration '{s}': minutes must be below 60 when hours are given");
        }
        hours * 3600 + minutes * 60 + seconds
    } else if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse()?
    } else {
        bail!("invalid duration '{s}' (expected h:mm:ss, m:ss or seconds)");
    };

    u32::try_from(secs).map_err(|_| anyhow::anyhow!("duration '{s}' is too long"))
}

/// Render seconds as "h:mm:ss", or "m:ss" under an hour.
pub fn format_duration(total_secs: i64) -> String {
    let sign = if total_secs < 0 { "-" } else { "" };
    let t = total_secs.unsigned_abs();
    let (h, m, s) = (t / 3600, (t % 3600) / 60, t % 60);
    if h > 0 {
        format!("{sign}{h}:{m:02}:{s:02}")
    } else {
        format!("{sign}{m}:{s:02}")
    }
}

/// Whole weeks from `start` to `end`, floored (negative spans floor downwards).
pub fn whole_weeks_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().div_euclid(7)
}

/// Source of "today". Injected so assessments are deterministic under test.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Wall clock, reporting the calendar date in a given IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(tz: &str) -> Result<Self> {
        let tz: Tz = tz
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}
