//! Duration and sleep-score arithmetic for a single night.
//!
//! Everything here is pure: callers pass raw times and ratings straight from
//! the stored row and get derived values back. Nothing is cached.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

/// Duration the score treats as a full night.
pub const REFERENCE_SLEEP_MINUTES: f64 = 8.0 * 60.0;

const DURATION_WEIGHT: f64 = 60.0;
const QUALITY_WEIGHT: f64 = 40.0;
const MAX_QUALITY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SleepDuration {
    pub hours: i64,
    pub minutes: i64,
    pub total_minutes: i64,
}

impl SleepDuration {
    pub const ZERO: SleepDuration = SleepDuration {
        hours: 0,
        minutes: 0,
        total_minutes: 0,
    };

    pub fn as_hours(&self) -> f64 {
        self.total_minutes as f64 / 60.0
    }
}

/// Parse a clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Elapsed time between going to bed and waking up.
///
/// A wake time earlier than the bedtime is taken to be on the next day.
/// Identical times give zero, never a full 24 hours.
pub fn calculate_duration(bedtime: NaiveTime, wake_time: NaiveTime) -> SleepDuration {
    let mut elapsed = wake_time - bedtime;
    if wake_time < bedtime {
        elapsed = elapsed + Duration::days(1);
    }

    let secs = elapsed.num_seconds();
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    SleepDuration {
        hours,
        minutes,
        total_minutes: hours * 60 + minutes,
    }
}

/// Composite 0-100 score: 60 points for duration (capped at eight hours)
/// and 40 points for the 1-5 quality rating.
pub fn calculate_sleep_score(total_minutes: i64, quality: i32) -> i32 {
    let duration_ratio = (total_minutes as f64 / REFERENCE_SLEEP_MINUTES).min(1.0);
    let duration_score = duration_ratio * DURATION_WEIGHT;
    let quality_score = (quality as f64 / MAX_QUALITY) * QUALITY_WEIGHT;
    (duration_score + quality_score).round() as i32
}
