use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::handlers::sleep_logs::fetch_recent_logs;
use crate::services::analysis::{build_analysis, dashboard_summary, DashboardSummary, SleepAnalysis};
use crate::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DashboardSummary>> {
    let logs =
        fetch_recent_logs(&state.db, &auth_user.id, state.config.dashboard_log_limit).await?;
    let goal_hours = state.settings.sleep_goal_hours(&auth_user.id).await;

    Ok(Json(dashboard_summary(&logs, goal_hours)))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<SleepAnalysis>> {
    let logs =
        fetch_recent_logs(&state.db, &auth_user.id, state.config.dashboard_log_limit).await?;
    let goal_hours = state.settings.sleep_goal_hours(&auth_user.id).await;

    let analysis = build_analysis(&logs, goal_hours);
    tracing::debug!(
        user_id = %auth_user.id,
        nights = analysis.nights.len(),
        factors = analysis.factor_impact.len(),
        "Analysis computed"
    );

    Ok(Json(analysis))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use sqlx::PgPool;

    use super::*;
    use crate::config::Config;
    use crate::extract::AppJson;
    use crate::handlers::sleep_logs::create_sleep_log;
    use crate::handlers::test_support::{caller, state};
    use crate::models::sleep_log::CreateSleepLogRequest;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_dashboard_reads_the_configured_recent_window(pool: PgPool) {
        let mut state = state(pool);
        let mut config = Config::for_tests();
        config.dashboard_log_limit = 3;
        state.config = Arc::new(config);

        // Six hours a night against the default eight hour goal.
        for day in 1..=5 {
            let body = CreateSleepLogRequest {
                date: NaiveDate::from_ymd_opt(2026, 3, day),
                bedtime: "00:00".into(),
                wake_time: "06:00".into(),
                quality: 3,
                notes: None,
                factors: None,
            };
            create_sleep_log(State(state.clone()), caller("user_a"), AppJson(body))
                .await
                .unwrap();
        }

        let Json(summary) = get_dashboard(State(state.clone()), caller("user_a"))
            .await
            .unwrap();
        assert_eq!(summary.last_night.date, NaiveDate::from_ymd_opt(2026, 3, 5));
        assert_eq!(summary.recent.len(), 3);
        assert_eq!(summary.recent[0].date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(summary.sleep_debt_hours, 6.0);

        let Json(analysis) = get_analysis(State(state), caller("user_a")).await.unwrap();
        assert_eq!(analysis.nights.len(), 3);
        assert_eq!(analysis.average_duration_hours, 6.0);
    }
}
