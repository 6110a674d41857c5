use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::models::settings::{Settings, UpdateSettingsRequest};

/// In-memory settings keyed by user id. Nothing is written to the
/// database, so settings reset when the process restarts.
#[derive(Clone, Default)]
pub struct SettingsStore {
    entries: Arc<RwLock<HashMap<String, Settings>>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current settings for the user, or the defaults if none were saved.
    pub async fn get(&self, user_id: &str) -> Settings {
        self.entries
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge a partial update and return the result.
    pub async fn update(&self, user_id: &str, update: &UpdateSettingsRequest) -> Settings {
        let mut entries = self.entries.write().await;
        let settings = entries.entry(user_id.to_string()).or_default();
        settings.apply(update);
        settings.clone()
    }

    pub async fn sleep_goal_hours(&self, user_id: &str) -> f64 {
        self.get(user_id).await.sleep_goal_hours
    }
}
