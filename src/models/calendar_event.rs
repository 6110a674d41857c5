use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Color tags a calendar event may carry. The first is the default.
pub const EVENT_COLORS: [&str; 6] = [
    "bg-purple-500",
    "bg-pink-500",
    "bg-green-500",
    "bg-yellow-400",
    "bg-blue-500",
    "bg-red-500",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub note: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCalendarEventRequest {
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Note must be under 2000 characters"))]
    pub note: Option<String>,

    #[validate(custom = "validate_color")]
    pub color: Option<String>,
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if EVENT_COLORS.contains(&color) {
        return Ok(());
    }
    let mut err = ValidationError::new("color");
    err.message = Some("Unknown event color".into());
    Err(err)
}

impl CreateCalendarEventRequest {
    /// Trim the title before validation so whitespace-only titles are rejected.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.note = self.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(EVENT_COLORS[0])
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CalendarMonthQuery {
    /// First and last day of the requested month, defaulting to the month of `today`.
    pub fn month_bounds(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), String> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        if !(1..=12).contains(&month) {
            return Err("Month must be between 1 and 12".into());
        }

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or("Invalid year")?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or("Invalid year")?;
        Ok((start, end))
    }
}
