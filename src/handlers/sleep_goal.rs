use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppResult, StorageContext};
use crate::extract::AppJson;
use crate::models::sleep_goal::{SleepGoal, UpsertSleepGoalRequest};
use crate::AppState;

pub async fn get_sleep_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Option<SleepGoal>>> {
    let goal = sqlx::query_as::<_, SleepGoal>("SELECT * FROM sleep_goals WHERE user_id = $1")
        .bind(&auth_user.id)
        .fetch_optional(&state.db)
        .await
        .or_storage("Failed to load goal.")?;

    Ok(Json(goal))
}

pub async fn upsert_sleep_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpsertSleepGoalRequest>,
) -> AppResult<Json<SleepGoal>> {
    body.validate()?;

    let goal = sqlx::query_as::<_, SleepGoal>(
        r#"
        INSERT INTO sleep_goals (user_id, goal_hours)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            goal_hours = EXCLUDED.goal_hours,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(&auth_user.id)
    .bind(body.goal_hours)
    .fetch_one(&state.db)
    .await
    .or_storage("Error saving goal.")?;

    tracing::info!(user_id = %auth_user.id, goal_hours = goal.goal_hours, "Sleep goal saved");

    Ok(Json(goal))
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::handlers::test_support::{caller, state};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upsert_replaces_the_existing_goal(pool: PgPool) {
        let state = state(pool);

        let Json(none) = get_sleep_goal(State(state.clone()), caller("user_a")).await.unwrap();
        assert!(none.is_none());

        for hours in [8.0, 7.5] {
            upsert_sleep_goal(
                State(state.clone()),
                caller("user_a"),
                AppJson(UpsertSleepGoalRequest { goal_hours: hours }),
            )
            .await
            .unwrap();
        }

        let Json(goal) = get_sleep_goal(State(state.clone()), caller("user_a")).await.unwrap();
        assert_eq!(goal.unwrap().goal_hours, 7.5);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sleep_goals")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
