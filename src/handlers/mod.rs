pub mod analysis;
pub mod calendar;
pub mod export;
pub mod health;
pub mod journal;
pub mod settings;
pub mod sleep_goal;
pub mod sleep_logs;
