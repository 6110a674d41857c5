use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::services::sleep_metrics::{calculate_duration, calculate_sleep_score, SleepDuration};

pub const MAX_FACTORS_PER_LOG: usize = 10;
pub const MAX_FACTOR_NAME_LEN: usize = 50;

/// Factors offered to users when logging a night. Logs may still carry
/// names outside this list.
pub const DEFAULT_FACTORS: [&str; 7] = [
    "Caffeine",
    "Exercise",
    "Stress",
    "Read book",
    "Screen time",
    "Ate late",
    "Meditation",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepLog {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub bedtime: NaiveTime,
    pub wake_time: NaiveTime,
    pub quality: i32,
    pub notes: Option<String>,
    pub factors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SleepLog {
    pub fn duration(&self) -> SleepDuration {
        calculate_duration(self.bedtime, self.wake_time)
    }

    pub fn score(&self) -> i32 {
        calculate_sleep_score(self.duration().total_minutes, self.quality)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSleepLogRequest {
    /// Night being logged. Default: today (UTC).
    pub date: Option<NaiveDate>,

    /// `HH:MM` or `HH:MM:SS`
    pub bedtime: String,

    #[serde(alias = "wakeTime")]
    pub wake_time: String,

    #[validate(range(min = 1, max = 5, message = "Quality must be between 1 and 5"))]
    pub quality: i32,

    #[validate(length(max = 2000, message = "Notes must be under 2000 characters"))]
    pub notes: Option<String>,

    #[validate(custom = "validate_factor_names")]
    pub factors: Option<Vec<String>>,
}

fn validate_factor_names(factors: &Vec<String>) -> Result<(), ValidationError> {
    if factors.len() > MAX_FACTORS_PER_LOG {
        let mut err = ValidationError::new("too_many_factors");
        err.message = Some("A log can carry at most 10 factors".into());
        return Err(err);
    }
    for name in factors {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_FACTOR_NAME_LEN {
            let mut err = ValidationError::new("factor_name");
            err.message = Some("Factor names must be 1-50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Deserialize)]
pub struct SleepLogQuery {
    pub order: Option<SortOrder>,
    pub limit: Option<i64>,
}

impl SleepLogQuery {
    pub const DEFAULT_LIMIT: i64 = 30;
    pub const MAX_LIMIT: i64 = 365;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// A stored log plus the values derived from it on read.
#[derive(Debug, Serialize)]
pub struct SleepLogView {
    #[serde(flatten)]
    pub log: SleepLog,
    pub duration: SleepDuration,
    pub score: i32,
}

impl From<SleepLog> for SleepLogView {
    fn from(log: SleepLog) -> Self {
        Self {
            duration: log.duration(),
            score: log.score(),
            log,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FactorOption {
    pub name: &'static str,
}
