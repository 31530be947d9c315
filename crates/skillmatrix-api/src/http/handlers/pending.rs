//! Manager review dashboard handler.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use skillmatrix_types::claim::PendingEmployee;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    /// Manager email the pending claims are routed to.
    #[serde(default)]
    pub manager: String,
}

/// GET /api/v1/reviews/pending?manager=... - Every employee with claims
/// awaiting this manager's review.
pub async fn pending_for_manager(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ApiResponse<Vec<PendingEmployee>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let pending = state
        .pending_service
        .pending_for_manager(&query.manager)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(pending, request_id, elapsed)
        .with_link("self", "/api/v1/reviews/pending")
        .with_link("review", "/api/v1/skills/review");

    Ok(Json(resp))
}
