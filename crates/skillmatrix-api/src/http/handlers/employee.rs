//! Employee profile handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use skillmatrix_types::claim::ClaimWithSkill;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/employees/:email/skills - The employee's stored claims with
/// catalog metadata.
pub async fn get_employee_skills(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<ClaimWithSkill>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let claims = state.profile_service.claims_for_employee(&email).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(claims, request_id, elapsed)
        .with_link("self", &format!("/api/v1/employees/{email}/skills"))
        .with_link("submit", "/api/v1/skills/submit");

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManagerRequest {
    #[serde(default)]
    pub manager_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManagerResponse {
    pub manager_email: String,
}

/// PUT /api/v1/employees/:email/manager - Overwrite the stored manager
/// email (the submission path only fills it lazily).
pub async fn update_manager(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<UpdateManagerRequest>,
) -> Result<Json<ApiResponse<UpdateManagerResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let manager_email = state
        .profile_service
        .update_manager_email(&email, &body.manager_email)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        UpdateManagerResponse { manager_email },
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/employees/{email}/manager"));

    Ok(Json(resp))
}
