use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::settings::{Settings, UpdateSettingsRequest};
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<Settings> {
    Json(state.settings.get(&auth_user.id).await)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpdateSettingsRequest>,
) -> AppResult<Json<Settings>> {
    body.validate()?;
    body.validate_goal_step().map_err(AppError::Validation)?;

    let settings = state.settings.update(&auth_user.id, &body).await;
    tracing::debug!(user_id = %auth_user.id, ?settings, "Settings updated");

    Ok(Json(settings))
}
