//! Skill claim repository trait definition.

use chrono::{DateTime, Utc};

use skillmatrix_types::claim::{
    ApprovalStatus, ClaimId, ClaimWithSkill, SkillClaim, SkillLevel,
};
use skillmatrix_types::employee::EmployeeId;
use skillmatrix_types::error::RepositoryError;
use skillmatrix_types::skill::SkillRef;

/// Staged outcome of reconciling a submission against stored claims.
///
/// Computed entirely in core by comparing the stored and submitted key
/// sets: `deletes` lists stored refs absent from the submission, minus
/// Approved claims (those survive omission). The repository applies the
/// whole plan in one transaction; partial application is never observable.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    pub upserts: Vec<SkillClaim>,
    pub deletes: Vec<SkillRef>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// The state written onto every claim of an authorized review batch.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub status: ApprovalStatus,
    pub level: SkillLevel,
    pub rejection_reason: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Flat row of the pending-review join (claim + employee + catalog).
/// Grouping by employee happens in core, not in SQL.
#[derive(Debug, Clone)]
pub struct PendingClaimRow {
    pub claim_id: ClaimId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub skill_ref: SkillRef,
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
    pub tools: String,
    pub level: SkillLevel,
    pub status: ApprovalStatus,
    pub requested_at: DateTime<Utc>,
}

/// Repository trait for skill claim persistence.
///
/// Implementations live in skillmatrix-infra (e.g., SqliteClaimRepository).
/// The two mutating operations are transactional: either the whole plan or
/// batch lands, or none of it does.
pub trait ClaimRepository: Send + Sync {
    /// All stored claims of one employee.
    fn list_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillClaim>, RepositoryError>> + Send;

    /// Claims matching the given ids. Unknown ids are simply absent from
    /// the result; the caller decides whether that matters.
    fn get_by_ids(
        &self,
        ids: &[ClaimId],
    ) -> impl std::future::Future<Output = Result<Vec<SkillClaim>, RepositoryError>> + Send;

    /// Apply a reconciliation plan (upserts + deletes) in one transaction.
    fn apply_reconciliation(
        &self,
        employee_id: &EmployeeId,
        plan: &ReconciliationPlan,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Apply one review update to every listed claim in one transaction.
    /// Returns the number of rows updated.
    fn apply_review(
        &self,
        ids: &[ClaimId],
        update: &ReviewUpdate,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Claims awaiting the given manager: status Pending, level L3,
    /// approver = manager. Ordered by employee id, then request time.
    fn list_pending_for_manager(
        &self,
        manager_email: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PendingClaimRow>, RepositoryError>> + Send;

    /// One employee's claims joined with catalog metadata. Claims whose
    /// ref is missing from the catalog carry the raw ref as display label.
    fn list_with_skills_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> impl std::future::Future<Output = Result<Vec<ClaimWithSkill>, RepositoryError>> + Send;
}
