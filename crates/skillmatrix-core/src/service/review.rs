//! Bulk review authorizer.
//!
//! Two-phase by construction: validate the whole request, authorize every
//! fetched claim, and only then apply one bulk update. A batch containing
//! any claim owned by a different approver updates nothing and reports the
//! full offending id list.

use chrono::Utc;

use skillmatrix_types::claim::{
    ApprovalStatus, ClaimId, ReviewAction, ReviewOutcome, ReviewRequest, SkillLevel,
};
use skillmatrix_types::employee::normalize_email;
use skillmatrix_types::error::WorkflowError;

use crate::repository::claim::{ClaimRepository, ReviewUpdate};

/// Service applying manager review decisions to pending claims.
pub struct ReviewService<R: ClaimRepository> {
    claims: R,
}

impl<R: ClaimRepository> ReviewService<R> {
    pub fn new(claims: R) -> Self {
        Self { claims }
    }

    /// Apply one approve/reject decision to a batch of claims.
    ///
    /// Validation failures surface before any storage access. The
    /// authorization pass is all-or-nothing: a claim whose stored approver
    /// differs (case-insensitively) from the caller aborts the batch. A
    /// claim with no stored approver is assignable to any reviewer
    /// (legacy/unassigned claims).
    pub async fn review(&self, request: ReviewRequest) -> Result<ReviewOutcome, WorkflowError> {
        let approver = normalize_email(&request.approver_email);
        if approver.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "approverEmail is required".to_string(),
            ));
        }
        let action: ReviewAction = request
            .action
            .parse()
            .map_err(WorkflowError::InvalidRequest)?;
        if request.claim_ids.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "claimIds must be non-empty".to_string(),
            ));
        }
        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        if action == ReviewAction::Reject && reason.is_none() {
            return Err(WorkflowError::InvalidRequest(
                "rejection reason required for rejection".to_string(),
            ));
        }

        let claims = self.claims.get_by_ids(&request.claim_ids).await?;
        if claims.is_empty() {
            return Err(WorkflowError::ClaimsNotFound);
        }

        let unauthorized: Vec<ClaimId> = claims
            .iter()
            .filter(|c| {
                c.approved_by_email
                    .as_deref()
                    .map(normalize_email)
                    .is_some_and(|assigned| !assigned.is_empty() && assigned != approver)
            })
            .map(|c| c.id)
            .collect();
        if !unauthorized.is_empty() {
            return Err(WorkflowError::UnauthorizedReviewer(unauthorized));
        }

        let update = match action {
            ReviewAction::Approve => ReviewUpdate {
                status: ApprovalStatus::Approved,
                level: SkillLevel::L3,
                rejection_reason: None,
                reviewed_at: Utc::now(),
            },
            ReviewAction::Reject => ReviewUpdate {
                status: ApprovalStatus::Rejected,
                level: SkillLevel::L2,
                rejection_reason: reason,
                reviewed_at: Utc::now(),
            },
        };

        let ids: Vec<ClaimId> = claims.iter().map(|c| c.id).collect();
        let updated = self.claims.apply_review(&ids, &update).await?;

        tracing::info!(
            approver = %approver,
            action = %action,
            updated,
            "bulk skill review completed"
        );

        Ok(ReviewOutcome {
            updated_count: updated as usize,
            action,
        })
    }
}
