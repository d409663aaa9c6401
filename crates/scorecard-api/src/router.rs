//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, patch, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Timeline
        .route("/api/gantt-data", get(handlers::gantt_data))
        // Perspectives
        .route("/api/perspectives", get(handlers::list_perspectives))
        .route("/api/perspectives/:id", get(handlers::get_perspective))
        // Initiatives
        .route(
            "/api/initiatives",
            get(handlers::list_initiatives).post(handlers::create_initiative),
        )
        .route(
            "/api/initiatives/:id",
            get(handlers::get_initiative)
                .put(handlers::update_initiative)
                .delete(handlers::delete_initiative),
        )
        .route(
            "/api/initiatives/:id/schedule",
            patch(handlers::upsert_initiative_schedule),
        )
        // Schedules
        .route(
            "/api/schedules",
            get(handlers::list_schedules).post(handlers::create_schedule),
        )
        .route("/api/schedules/bulk", put(handlers::bulk_update_schedules))
        .route(
            "/api/schedules/:id",
            get(handlers::get_schedule)
                .put(handlers::update_schedule)
                .delete(handlers::delete_schedule),
        )
        // Teams
        .route(
            "/api/teams",
            get(handlers::list_teams).post(handlers::create_team),
        )
        .route(
            "/api/teams/:id",
            get(handlers::get_team)
                .put(handlers::update_team)
                .delete(handlers::delete_team),
        )
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}
