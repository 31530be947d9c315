//! Manager review dashboard projection.
//!
//! Read-only: groups a manager's pending expert claims by employee. The
//! repository returns flat join rows ordered by employee id; grouping
//! happens here rather than in SQL.

use skillmatrix_types::claim::{PendingClaim, PendingEmployee};
use skillmatrix_types::employee::normalize_email;
use skillmatrix_types::error::WorkflowError;

use crate::repository::claim::ClaimRepository;

/// Service backing the manager review dashboard.
pub struct PendingReviewService<R: ClaimRepository> {
    claims: R,
}

impl<R: ClaimRepository> PendingReviewService<R> {
    pub fn new(claims: R) -> Self {
        Self { claims }
    }

    /// Every employee with at least one claim pending this manager's
    /// review, each carrying the claim ids and skill metadata the review
    /// UI needs.
    pub async fn pending_for_manager(
        &self,
        manager_email: &str,
    ) -> Result<Vec<PendingEmployee>, WorkflowError> {
        let manager = normalize_email(manager_email);
        if manager.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "manager email is required".to_string(),
            ));
        }

        let rows = self.claims.list_pending_for_manager(&manager).await?;

        let mut grouped: Vec<PendingEmployee> = Vec::new();
        for row in rows {
            let entry = PendingClaim {
                claim_id: row.claim_id,
                skill_ref: row.skill_ref,
                category: row.category,
                subcategory: row.subcategory,
                subsubcategory: row.subsubcategory,
                tools: row.tools,
                level: row.level,
                status: row.status,
                requested_at: row.requested_at,
            };
            match grouped.last_mut() {
                Some(group) if group.employee_id == row.employee_id => {
                    group.claims.push(entry);
                }
                _ => grouped.push(PendingEmployee {
                    employee_id: row.employee_id,
                    employee_name: row.employee_name,
                    claims: vec![entry],
                }),
            }
        }

        Ok(grouped)
    }
}
