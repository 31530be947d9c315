//! Skill catalog read handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use skillmatrix_core::repository::catalog::SkillCatalog;
use skillmatrix_types::skill::SkillDefinition;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/skills/catalog - All catalog entries.
pub async fn list_catalog(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SkillDefinition>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let skills = state
        .catalog
        .list()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(skills, request_id, elapsed)
        .with_link("self", "/api/v1/skills/catalog");

    Ok(Json(resp))
}
