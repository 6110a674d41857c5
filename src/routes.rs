use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        // Sleep logs
        .route("/api/sleep-logs", get(handlers::sleep_logs::list_sleep_logs))
        .route("/api/sleep-logs", post(handlers::sleep_logs::create_sleep_log))
        .route("/api/sleep-logs/:id", get(handlers::sleep_logs::get_sleep_log))
        .route("/api/sleep-logs/:id", delete(handlers::sleep_logs::delete_sleep_log))
        .route("/api/factors", get(handlers::sleep_logs::list_factors))
        // Aggregates
        .route("/api/dashboard", get(handlers::analysis::get_dashboard))
        .route("/api/analysis", get(handlers::analysis::get_analysis))
        // Calendar
        .route(
            "/api/calendar-events",
            get(handlers::calendar::list_calendar_events),
        )
        .route(
            "/api/calendar-events",
            post(handlers::calendar::create_calendar_event),
        )
        .route(
            "/api/calendar-events/:id",
            delete(handlers::calendar::delete_calendar_event),
        )
        // Goal & journal
        .route("/api/sleep-goal", get(handlers::sleep_goal::get_sleep_goal))
        .route("/api/sleep-goal", put(handlers::sleep_goal::upsert_sleep_goal))
        .route("/api/journal", get(handlers::journal::list_journal_entries))
        .route("/api/journal", post(handlers::journal::create_journal_entry))
        // Settings
        .route("/api/settings", get(handlers::settings::get_settings))
        .route("/api/settings", put(handlers::settings::update_settings))
        // Export
        .route("/api/export", get(handlers::export::export_data))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allow_credentials(true)
}
