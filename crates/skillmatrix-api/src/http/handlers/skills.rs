//! Submission and review handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use skillmatrix_types::claim::{
    ReviewOutcome, ReviewRequest, SubmitOutcome, SubmitSkillsRequest,
};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/skills/submit - Reconcile an employee's full skill set.
pub async fn submit_skills(
    State(state): State<AppState>,
    Json(body): Json<SubmitSkillsRequest>,
) -> Result<Json<ApiResponse<SubmitOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state.submission_service.submit(body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(outcome, request_id, elapsed)
        .with_link("self", "/api/v1/skills/submit")
        .with_link("pending", "/api/v1/reviews/pending");

    Ok(Json(resp))
}

/// POST /api/v1/skills/review - Apply a manager's approve/reject decision
/// to a batch of pending claims.
pub async fn review_skills(
    State(state): State<AppState>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<ReviewOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state.review_service.review(body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(outcome, request_id, elapsed)
        .with_link("self", "/api/v1/skills/review")
        .with_link("pending", "/api/v1/reviews/pending");

    Ok(Json(resp))
}
