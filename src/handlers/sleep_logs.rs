use axum::{extract::State, Extension, Json};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::DeleteResponse;
use crate::error::{AppError, AppResult, StorageContext};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::sleep_log::{
    CreateSleepLogRequest, FactorOption, SleepLog, SleepLogQuery, SleepLogView, SortOrder,
    DEFAULT_FACTORS,
};
use crate::services::sleep_metrics::parse_clock_time;
use crate::AppState;

/// The user's most recent `limit` logs, oldest first.
pub async fn fetch_recent_logs(db: &PgPool, user_id: &str, limit: i64) -> AppResult<Vec<SleepLog>> {
    sqlx::query_as::<_, SleepLog>(
        r#"
        SELECT * FROM (
            SELECT * FROM sleep_logs
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
        ) recent
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .or_storage("Failed to load sleep logs.")
}

pub async fn list_sleep_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<SleepLogQuery>,
) -> AppResult<Json<Vec<SleepLogView>>> {
    let mut logs = fetch_recent_logs(&state.db, &auth_user.id, query.limit()).await?;
    if query.order.unwrap_or_default() == SortOrder::Desc {
        logs.reverse();
    }

    Ok(Json(logs.into_iter().map(SleepLogView::from).collect()))
}

pub async fn get_sleep_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(log_id): AppPath<Uuid>,
) -> AppResult<Json<SleepLogView>> {
    let log = sqlx::query_as::<_, SleepLog>(
        "SELECT * FROM sleep_logs WHERE id = $1 AND user_id = $2",
    )
    .bind(log_id)
    .bind(&auth_user.id)
    .fetch_optional(&state.db)
    .await
    .or_storage("Failed to load sleep log.")?
    .ok_or(AppError::NotFound("Sleep log not found".into()))?;

    Ok(Json(log.into()))
}

pub async fn create_sleep_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateSleepLogRequest>,
) -> AppResult<Json<SleepLogView>> {
    body.validate()?;

    let bedtime = parse_clock_time(&body.bedtime)
        .ok_or_else(|| AppError::Validation("Bedtime must be a time like 22:30".into()))?;
    let wake_time = parse_clock_time(&body.wake_time)
        .ok_or_else(|| AppError::Validation("Wake time must be a time like 06:30".into()))?;
    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());

    let factors: Vec<String> = body
        .factors
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.trim().to_string())
        .collect();
    let notes = body
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let log = sqlx::query_as::<_, SleepLog>(
        r#"
        INSERT INTO sleep_logs (id, user_id, date, bedtime, wake_time, quality, notes, factors)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&auth_user.id)
    .bind(date)
    .bind(bedtime)
    .bind(wake_time)
    .bind(body.quality)
    .bind(&notes)
    .bind(&factors)
    .fetch_one(&state.db)
    .await
    .or_storage("Failed to save log.")?;

    tracing::info!(user_id = %auth_user.id, log_id = %log.id, date = %log.date, "Sleep log created");

    Ok(Json(log.into()))
}

pub async fn delete_sleep_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(log_id): AppPath<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let result = sqlx::query("DELETE FROM sleep_logs WHERE id = $1 AND user_id = $2")
        .bind(log_id)
        .bind(&auth_user.id)
        .execute(&state.db)
        .await
        .or_storage("Failed to delete log.")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Sleep log not found".into()));
    }

    tracing::info!(user_id = %auth_user.id, log_id = %log_id, "Sleep log deleted");

    Ok(Json(DeleteResponse {
        deleted: true,
        id: log_id,
    }))
}

pub async fn list_factors() -> Json<Vec<FactorOption>> {
    Json(
        DEFAULT_FACTORS
            .iter()
            .map(|&name| FactorOption { name })
            .collect(),
    )
}
