use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};

use crate::auth::middleware::AuthUser;
use crate::dto::ExportBundle;
use crate::error::{AppError, AppResult, StorageContext};
use crate::models::{journal::JournalEntry, sleep_goal::SleepGoal, sleep_log::SleepLog};
use crate::AppState;

pub const EXPORT_FILENAME: &str = "sleep_data.json";

/// Download every sleep log, goal, and journal note the caller owns.
pub async fn export_data(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Response> {
    let logs = sqlx::query_as::<_, SleepLog>(
        "SELECT * FROM sleep_logs WHERE user_id = $1 ORDER BY date ASC, created_at ASC",
    )
    .bind(&auth_user.id)
    .fetch_all(&state.db);
    let goals = sqlx::query_as::<_, SleepGoal>("SELECT * FROM sleep_goals WHERE user_id = $1")
        .bind(&auth_user.id)
        .fetch_all(&state.db);
    let journal = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM sleep_journal WHERE user_id = $1 ORDER BY date ASC, created_at ASC",
    )
    .bind(&auth_user.id)
    .fetch_all(&state.db);

    let (logs, goals, journal) = tokio::try_join!(logs, goals, journal)
        .or_storage("Failed to export data.")?;

    tracing::info!(
        user_id = %auth_user.id,
        logs = logs.len(),
        goals = goals.len(),
        journal = journal.len(),
        "Data exported"
    );

    let body = serde_json::to_string_pretty(&ExportBundle { logs, goals, journal })
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
