use axum::{extract::State, Extension, Json};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppResult, StorageContext};
use crate::extract::AppJson;
use crate::models::journal::{CreateJournalEntryRequest, JournalEntry};
use crate::AppState;

pub async fn list_journal_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM sleep_journal
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(&auth_user.id)
    .fetch_all(&state.db)
    .await
    .or_storage("Failed to load journal.")?;

    Ok(Json(entries))
}

pub async fn create_journal_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(mut body): AppJson<CreateJournalEntryRequest>,
) -> AppResult<Json<JournalEntry>> {
    body.note = body.note.trim().to_string();
    body.validate()?;

    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        INSERT INTO sleep_journal (id, user_id, note, date)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&auth_user.id)
    .bind(&body.note)
    .bind(body.date.unwrap_or_else(|| Utc::now().date_naive()))
    .fetch_one(&state.db)
    .await
    .or_storage("Error saving note.")?;

    Ok(Json(entry))
}
