pub mod analysis;
pub mod settings_store;
pub mod sleep_metrics;
