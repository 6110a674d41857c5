use axum::{extract::State, Extension, Json};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::DeleteResponse;
use crate::error::{AppError, AppResult, StorageContext};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::calendar_event::{
    CalendarEvent, CalendarMonthQuery, CreateCalendarEventRequest,
};
use crate::AppState;

pub async fn list_calendar_events(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<CalendarMonthQuery>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let (start, end) = query
        .month_bounds(Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    let events = sqlx::query_as::<_, CalendarEvent>(
        r#"
        SELECT * FROM calendar_events
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(&auth_user.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db)
    .await
    .or_storage("Failed to load events.")?;

    Ok(Json(events))
}

pub async fn create_calendar_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateCalendarEventRequest>,
) -> AppResult<Json<CalendarEvent>> {
    let body = body.normalized();
    body.validate()?;

    let event = sqlx::query_as::<_, CalendarEvent>(
        r#"
        INSERT INTO calendar_events (id, user_id, date, title, note, color)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&auth_user.id)
    .bind(body.date)
    .bind(&body.title)
    .bind(&body.note)
    .bind(body.color_or_default())
    .fetch_one(&state.db)
    .await
    .or_storage("Failed to save event.")?;

    tracing::info!(user_id = %auth_user.id, event_id = %event.id, date = %event.date, "Calendar event created");

    Ok(Json(event))
}

pub async fn delete_calendar_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(event_id): AppPath<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(&auth_user.id)
        .execute(&state.db)
        .await
        .or_storage("Failed to delete event.")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Calendar event not found".into()));
    }

    Ok(Json(DeleteResponse {
        deleted: true,
        id: event_id,
    }))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sqlx::PgPool;

    use super::*;
    use crate::handlers::test_support::{caller, state};

    fn event(date: (i32, u32, u32), title: &str) -> AppJson<CreateCalendarEventRequest> {
        AppJson(CreateCalendarEventRequest {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            title: title.into(),
            note: None,
            color: None,
        })
    }

    fn month(year: i32, month: u32) -> AppQuery<CalendarMonthQuery> {
        AppQuery(CalendarMonthQuery {
            year: Some(year),
            month: Some(month),
        })
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_month_lists_only_that_month_in_date_order(pool: PgPool) {
        let state = state(pool);
        for (date, title) in [
            ((2026, 5, 20), "Late May"),
            ((2026, 4, 30), "End of April"),
            ((2026, 5, 1), "First of May"),
            ((2026, 5, 31), "Last of May"),
            ((2026, 6, 1), "June"),
        ] {
            create_calendar_event(State(state.clone()), caller("user_a"), event(date, title))
                .await
                .unwrap();
        }
        create_calendar_event(State(state.clone()), caller("user_b"), event((2026, 5, 10), "Theirs"))
            .await
            .unwrap();

        let Json(events) = list_calendar_events(State(state), caller("user_a"), month(2026, 5))
            .await
            .unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First of May", "Late May", "Last of May"]);
        assert!(events.iter().all(|e| e.color == "bg-purple-500"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_is_scoped_to_owner(pool: PgPool) {
        let state = state(pool);
        let Json(created) =
            create_calendar_event(State(state.clone()), caller("owner"), event((2026, 5, 2), "Trip"))
                .await
                .unwrap();

        let stranger =
            delete_calendar_event(State(state.clone()), caller("stranger"), AppPath(created.id)).await;
        assert!(matches!(stranger, Err(AppError::NotFound(_))));

        let Json(deleted) =
            delete_calendar_event(State(state.clone()), caller("owner"), AppPath(created.id))
                .await
                .unwrap();
        assert_eq!(deleted.id, created.id);

        let Json(left) = list_calendar_events(State(state), caller("owner"), month(2026, 5))
            .await
            .unwrap();
        assert!(left.is_empty());
    }
}
