pub mod calendar_event;
pub mod journal;
pub mod settings;
pub mod sleep_goal;
pub mod sleep_log;
