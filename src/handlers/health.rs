use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, ReadyzChecks, ReadyzResponse};
use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "sleepwell-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyzResponse>) {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .map_err(|e| tracing::warn!(error = %e, "Readiness check could not reach the database"))
        .is_ok();

    readiness(database)
}

fn readiness(database: bool) -> (StatusCode, Json<ReadyzResponse>) {
    let (code, status, check) = match database {
        true => (StatusCode::OK, "ready", "ok"),
        false => (StatusCode::SERVICE_UNAVAILABLE, "not_ready", "failed"),
    };
    (
        code,
        Json(ReadyzResponse {
            status,
            checks: ReadyzChecks { database: check },
        }),
    )
}
