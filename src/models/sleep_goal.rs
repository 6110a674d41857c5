use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepGoal {
    pub user_id: String,
    pub goal_hours: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertSleepGoalRequest {
    #[validate(range(min = 1.0, max = 24.0, message = "Goal must be between 1 and 24 hours"))]
    pub goal_hours: f64,
}
