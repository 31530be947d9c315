//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use skillmatrix_types::error::WorkflowError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Claim workflow errors (validation, not-found, authorization, storage).
    Workflow(WorkflowError),
    /// Generic internal error.
    Internal(String),
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        AppError::Workflow(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Workflow(WorkflowError::InvalidRequest(msg)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Workflow(WorkflowError::EmployeeNotFound) => (
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
                "Employee not found".to_string(),
                None,
            ),
            AppError::Workflow(WorkflowError::ClaimsNotFound) => (
                StatusCode::NOT_FOUND,
                "CLAIMS_NOT_FOUND",
                "No matching claims found".to_string(),
                None,
            ),
            AppError::Workflow(WorkflowError::UnauthorizedReviewer(ids)) => (
                StatusCode::FORBIDDEN,
                "UNAUTHORIZED_REVIEWER",
                "Not authorized to review some claims".to_string(),
                Some(json!({
                    "unauthorizedClaimIds": ids
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>(),
                })),
            ),
            AppError::Workflow(WorkflowError::Storage(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [error]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
