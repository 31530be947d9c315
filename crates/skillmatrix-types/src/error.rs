use thiserror::Error;

use crate::claim::ClaimId;

/// Errors from the claim submission/review workflow.
///
/// Validation failures never touch storage; storage failures roll back the
/// whole operation. Notification failures are not represented here -- the
/// submission path logs them and returns the committed result.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("employee not found")]
    EmployeeNotFound,

    #[error("no matching claims found")]
    ClaimsNotFound,

    /// The caller is not the assigned approver for one or more claims.
    /// Carries every offending id; the batch was not applied.
    #[error("not authorized to review {} claim(s)", .0.len())]
    UnauthorizedReviewer(Vec<ClaimId>),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in skillmatrix-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for WorkflowError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => WorkflowError::ClaimsNotFound,
            other => WorkflowError::Storage(other.to_string()),
        }
    }
}

/// Errors from the notification dispatcher. Best-effort by contract:
/// callers log these and never propagate them.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail relay returned status {0}")]
    RelayStatus(u16),

    #[error("mail relay unreachable: {0}")]
    Transport(String),

    #[error("notification dispatch disabled: no relay endpoint configured")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_error_display() {
        let err = WorkflowError::InvalidRequest("missing email".to_string());
        assert_eq!(err.to_string(), "invalid request: missing email");
    }

    #[test]
    fn test_unauthorized_counts_ids() {
        let err = WorkflowError::UnauthorizedReviewer(vec![ClaimId::new(), ClaimId::new()]);
        assert!(err.to_string().contains("2 claim(s)"));
    }

    #[test]
    fn test_repository_error_maps_to_storage() {
        let err: WorkflowError = RepositoryError::Query("syntax error".to_string()).into();
        assert!(matches!(err, WorkflowError::Storage(_)));
    }
}
