//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS (allow-any, the skill-matrix frontend is served from a
//! different origin), request tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Claim workflow
        .route("/skills/submit", post(handlers::skills::submit_skills))
        .route("/skills/review", post(handlers::skills::review_skills))
        // Manager dashboard
        .route(
            "/reviews/pending",
            get(handlers::pending::pending_for_manager),
        )
        // Employee profile
        .route(
            "/employees/{email}/skills",
            get(handlers::employee::get_employee_skills),
        )
        .route(
            "/employees/{email}/manager",
            put(handlers::employee::update_manager),
        )
        // Catalog (read-only)
        .route("/skills/catalog", get(handlers::catalog::list_catalog));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
