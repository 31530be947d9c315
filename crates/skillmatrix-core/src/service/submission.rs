//! Claim reconciliation engine.
//!
//! A submission is the employee's full skill set. Reconciling it against
//! stored claims is a merge, not a replace: every submitted entry runs
//! through the approval state machine, stored claims omitted from the
//! submission are deleted unless Approved, and the staged plan commits in
//! one transaction. Managers are notified of new pending claims after the
//! commit, best-effort.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;

use skillmatrix_types::claim::{
    ApprovalStatus, ClaimId, SkillClaim, SubmitOutcome, SubmitSkillsRequest,
};
use skillmatrix_types::employee::normalize_email;
use skillmatrix_types::error::WorkflowError;
use skillmatrix_types::skill::SkillRef;

use crate::approval::{next_state, ClaimState, Transition};
use crate::notify::NotificationDispatcher;
use crate::repository::catalog::SkillCatalog;
use crate::repository::claim::{ClaimRepository, ReconciliationPlan};
use crate::repository::directory::EmployeeDirectory;

/// Service orchestrating full-set skill submissions.
///
/// Generic over the repository and notifier traits to maintain clean
/// architecture -- skillmatrix-core never depends on skillmatrix-infra.
pub struct SubmissionService<D, C, R, N>
where
    D: EmployeeDirectory,
    C: SkillCatalog,
    R: ClaimRepository,
    N: NotificationDispatcher,
{
    directory: D,
    catalog: C,
    claims: R,
    notifier: N,
}

impl<D, C, R, N> SubmissionService<D, C, R, N>
where
    D: EmployeeDirectory,
    C: SkillCatalog,
    R: ClaimRepository,
    N: NotificationDispatcher,
{
    pub fn new(directory: D, catalog: C, claims: R, notifier: N) -> Self {
        Self {
            directory,
            catalog,
            claims,
            notifier,
        }
    }

    /// Reconcile a submitted claim set against stored state.
    ///
    /// 1. Resolve the employee; unknown emails fail with `EmployeeNotFound`.
    /// 2. Lazily fill the stored manager email from the request, once.
    /// 3. Run the state machine per valid entry; malformed entries (missing
    ///    ref or level) are dropped silently.
    /// 4. Delete stored claims absent from the submission, except Approved
    ///    ones.
    /// 5. Commit the plan in one transaction, then notify the manager of
    ///    any new pending claims (fire-and-forget).
    pub async fn submit(
        &self,
        request: SubmitSkillsRequest,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let email = normalize_email(&request.email);
        if email.is_empty() {
            return Err(WorkflowError::InvalidRequest("email is required".to_string()));
        }

        let employee = self
            .directory
            .resolve(&email)
            .await
            .map_err(|e| WorkflowError::Storage(e.to_string()))?
            .ok_or(WorkflowError::EmployeeNotFound)?;

        let manager_hint = request
            .manager_email
            .as_deref()
            .map(normalize_email)
            .filter(|m| !m.is_empty());

        let stored_manager = employee
            .manager_email
            .as_deref()
            .map(normalize_email)
            .filter(|m| !m.is_empty());

        if stored_manager.is_none() {
            if let Some(hint) = &manager_hint {
                self.directory
                    .set_manager_if_unset(&employee.id, hint)
                    .await
                    .map_err(|e| WorkflowError::Storage(e.to_string()))?;
            }
        }
        let manager = stored_manager.or(manager_hint);

        let stored: HashMap<SkillRef, SkillClaim> = self
            .claims
            .list_for_employee(&employee.id)
            .await
            .map_err(|e| WorkflowError::Storage(e.to_string()))?
            .into_iter()
            .map(|c| (c.skill_ref.clone(), c))
            .collect();

        let now = Utc::now();
        // Refs present in the submission, valid entries only. Skipped
        // (ratified) claims count as present so the delete step retains them.
        let mut submitted_refs: BTreeSet<SkillRef> = BTreeSet::new();
        let mut staged: BTreeMap<SkillRef, SkillClaim> = BTreeMap::new();

        for entry in &request.skills {
            let (Some(skill_ref), Some(level)) = (entry.skill_ref.clone(), entry.level) else {
                continue;
            };
            if skill_ref.is_empty() {
                continue;
            }
            submitted_refs.insert(skill_ref.clone());

            let existing = stored
                .get(&skill_ref)
                .map(|c| ClaimState::new(c.level_selected, c.approval_status));

            match next_state(existing, level, manager.as_deref()) {
                Transition::Skip => {
                    staged.remove(&skill_ref);
                }
                Transition::Upsert {
                    level,
                    status,
                    approved_by,
                } => {
                    // Keep the stored claim's id so a resubmission is an
                    // overwrite, not a new row.
                    let id = stored
                        .get(&skill_ref)
                        .map(|c| c.id)
                        .unwrap_or_else(ClaimId::new);
                    staged.insert(
                        skill_ref.clone(),
                        SkillClaim {
                            id,
                            employee_id: employee.id,
                            skill_ref,
                            level_selected: level,
                            approval_status: status,
                            approved_by_email: approved_by,
                            rejection_reason: None,
                            requested_at: now,
                            reviewed_at: None,
                        },
                    );
                }
            }
        }

        let deletes: Vec<SkillRef> = stored
            .values()
            .filter(|c| !submitted_refs.contains(&c.skill_ref))
            .filter(|c| c.approval_status != ApprovalStatus::Approved)
            .map(|c| c.skill_ref.clone())
            .collect();

        let pending_refs: Vec<SkillRef> = staged
            .values()
            .filter(|c| c.approval_status == ApprovalStatus::Pending)
            .map(|c| c.skill_ref.clone())
            .collect();

        let plan = ReconciliationPlan {
            upserts: staged.into_values().collect(),
            deletes,
        };
        let saved_count = plan.upserts.len();

        self.claims
            .apply_reconciliation(&employee.id, &plan)
            .await
            .map_err(|e| WorkflowError::Storage(e.to_string()))?;

        tracing::info!(
            employee = %email,
            saved = saved_count,
            pending = pending_refs.len(),
            deleted = plan.deletes.len(),
            "skill submission reconciled"
        );

        let mut pending_sent_to = None;
        if !pending_refs.is_empty() {
            if let Some(manager) = &manager {
                pending_sent_to = Some(manager.clone());
                let names = self.display_names(&pending_refs).await;
                let display_name = if employee.name.trim().is_empty() {
                    email.clone()
                } else {
                    employee.name.clone()
                };
                if let Err(e) = self
                    .notifier
                    .send_pending_review_email(manager, &display_name, &names)
                    .await
                {
                    tracing::warn!(manager = %manager, error = %e, "review request email failed");
                }
            }
        }

        Ok(SubmitOutcome {
            saved_count,
            pending_count: pending_refs.len(),
            pending_skill_refs: pending_refs,
            pending_sent_to,
        })
    }

    /// Resolve catalog display names for the notification, falling back to
    /// the raw ref for skills missing from the catalog.
    async fn display_names(&self, refs: &[SkillRef]) -> Vec<String> {
        let catalog: HashMap<SkillRef, String> = match self.catalog.list().await {
            Ok(defs) => defs
                .into_iter()
                .map(|d| (d.skill_ref.clone(), d.tools))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "catalog lookup failed, using raw refs in email");
                HashMap::new()
            }
        };
        refs.iter()
            .map(|r| catalog.get(r).cloned().unwrap_or_else(|| r.to_string()))
            .collect()
    }
}
