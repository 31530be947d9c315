//! Employee profile operations: the self-view read path and explicit
//! manager reassignment.

use skillmatrix_types::claim::ClaimWithSkill;
use skillmatrix_types::employee::normalize_email;
use skillmatrix_types::error::{RepositoryError, WorkflowError};

use crate::repository::claim::ClaimRepository;
use crate::repository::directory::EmployeeDirectory;

/// Service for employee-facing profile reads and directory updates.
pub struct EmployeeProfileService<D: EmployeeDirectory, R: ClaimRepository> {
    directory: D,
    claims: R,
}

impl<D: EmployeeDirectory, R: ClaimRepository> EmployeeProfileService<D, R> {
    pub fn new(directory: D, claims: R) -> Self {
        Self { directory, claims }
    }

    /// The employee's stored claims joined with catalog metadata.
    pub async fn claims_for_employee(
        &self,
        email: &str,
    ) -> Result<Vec<ClaimWithSkill>, WorkflowError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(WorkflowError::InvalidRequest("email is required".to_string()));
        }
        let employee = self
            .directory
            .resolve(&email)
            .await
            .map_err(|e| WorkflowError::Storage(e.to_string()))?
            .ok_or(WorkflowError::EmployeeNotFound)?;

        self.claims
            .list_with_skills_for_employee(&employee.id)
            .await
            .map_err(|e| WorkflowError::Storage(e.to_string()))
    }

    /// Overwrite the stored manager email (unlike the lazy fill during
    /// submission). Returns the newly stored value.
    pub async fn update_manager_email(
        &self,
        email: &str,
        manager_email: &str,
    ) -> Result<String, WorkflowError> {
        let email = normalize_email(email);
        let manager = normalize_email(manager_email);
        if email.is_empty() || manager.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "email and managerEmail are required".to_string(),
            ));
        }

        match self.directory.update_manager(&email, &manager).await {
            Ok(stored) => {
                tracing::info!(employee = %email, manager = %stored, "manager email updated");
                Ok(stored)
            }
            Err(RepositoryError::NotFound) => Err(WorkflowError::EmployeeNotFound),
            Err(e) => Err(WorkflowError::Storage(e.to_string())),
        }
    }
}
