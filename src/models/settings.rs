use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_SLEEP_GOAL_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Per-user display preferences. Held in memory only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Settings {
    pub sleep_goal_hours: f64,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sleep_goal_hours: DEFAULT_SLEEP_GOAL_HOURS,
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 4.0, max = 12.0, message = "Sleep goal must be between 4 and 12 hours"))]
    pub sleep_goal_hours: Option<f64>,
    pub theme: Option<Theme>,
}

impl UpdateSettingsRequest {
    /// The goal moves in half-hour steps.
    pub fn validate_goal_step(&self) -> Result<(), String> {
        match self.sleep_goal_hours {
            Some(hours) if (hours * 2.0).fract() != 0.0 => {
                Err("Sleep goal must be set in half-hour steps".into())
            }
            _ => Ok(()),
        }
    }
}

impl Settings {
    pub fn apply(&mut self, update: &UpdateSettingsRequest) {
        if let Some(hours) = update.sleep_goal_hours {
            self.sleep_goal_hours = hours;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }
}
