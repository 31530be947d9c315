//! In-memory fakes for the repository and notifier traits, shared by the
//! service test modules.

use std::sync::Mutex;

use chrono::Utc;

use skillmatrix_types::claim::{
    ApprovalStatus, ClaimId, ClaimWithSkill, SkillClaim, SkillLevel,
};
use skillmatrix_types::employee::{normalize_email, Employee, EmployeeId};
use skillmatrix_types::error::{NotifyError, RepositoryError};
use skillmatrix_types::skill::{SkillDefinition, SkillRef};

use crate::notify::NotificationDispatcher;
use crate::repository::catalog::SkillCatalog;
use crate::repository::claim::{
    ClaimRepository, PendingClaimRow, ReconciliationPlan, ReviewUpdate,
};
use crate::repository::directory::EmployeeDirectory;

pub fn employee(email: &str, manager_email: Option<&str>) -> Employee {
    Employee {
        id: EmployeeId::new(),
        name: email.split('@').next().unwrap_or_default().to_string(),
        email: normalize_email(email),
        manager_email: manager_email.map(normalize_email),
        created_at: Utc::now(),
    }
}

pub fn claim(
    employee_id: EmployeeId,
    skill_ref: &str,
    level: SkillLevel,
    status: ApprovalStatus,
) -> SkillClaim {
    SkillClaim {
        id: ClaimId::new(),
        employee_id,
        skill_ref: SkillRef::new(skill_ref),
        level_selected: level,
        approval_status: status,
        approved_by_email: None,
        rejection_reason: None,
        requested_at: Utc::now(),
        reviewed_at: None,
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    employees: Mutex<Vec<Employee>>,
}

impl InMemoryDirectory {
    pub fn with(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
        }
    }

    pub fn manager_of(&self, id: &EmployeeId) -> Option<String> {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == *id)
            .and_then(|e| e.manager_email.clone())
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    async fn resolve(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn set_manager_if_unset(
        &self,
        id: &EmployeeId,
        manager_email: &str,
    ) -> Result<(), RepositoryError> {
        let mut employees = self.employees.lock().unwrap();
        if let Some(e) = employees.iter_mut().find(|e| e.id == *id) {
            if e.manager_email.is_none() {
                e.manager_email = Some(manager_email.to_string());
            }
        }
        Ok(())
    }

    async fn update_manager(
        &self,
        email: &str,
        manager_email: &str,
    ) -> Result<String, RepositoryError> {
        let mut employees = self.employees.lock().unwrap();
        match employees.iter_mut().find(|e| e.email.eq_ignore_ascii_case(email)) {
            Some(e) => {
                e.manager_email = Some(manager_email.to_string());
                Ok(manager_email.to_string())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    skills: Vec<SkillDefinition>,
}

impl InMemoryCatalog {
    pub fn with_skills(entries: &[(&str, &str)]) -> Self {
        Self {
            skills: entries
                .iter()
                .map(|(skill_ref, tools)| SkillDefinition {
                    skill_ref: SkillRef::new(*skill_ref),
                    category: "Engineering".to_string(),
                    subcategory: "Backend".to_string(),
                    subsubcategory: "Languages".to_string(),
                    tools: tools.to_string(),
                    l1: None,
                    l2: None,
                    l3: None,
                })
                .collect(),
        }
    }
}

impl SkillCatalog for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<SkillDefinition>, RepositoryError> {
        Ok(self.skills.clone())
    }

    async fn get(&self, skill_ref: &SkillRef) -> Result<Option<SkillDefinition>, RepositoryError> {
        Ok(self.skills.iter().find(|s| s.skill_ref == *skill_ref).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryClaims {
    claims: Mutex<Vec<SkillClaim>>,
    pending_rows: Mutex<Vec<PendingClaimRow>>,
    claims_with_skills: Mutex<Vec<ClaimWithSkill>>,
}

impl InMemoryClaims {
    pub fn with(claims: Vec<SkillClaim>) -> Self {
        Self {
            claims: Mutex::new(claims),
            ..Default::default()
        }
    }

    pub fn with_pending_rows(rows: Vec<PendingClaimRow>) -> Self {
        Self {
            pending_rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn with_claims_with_skills(rows: Vec<ClaimWithSkill>) -> Self {
        Self {
            claims_with_skills: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn all(&self) -> Vec<SkillClaim> {
        self.claims.lock().unwrap().clone()
    }
}

impl ClaimRepository for InMemoryClaims {
    async fn list_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<SkillClaim>, RepositoryError> {
        Ok(self
            .claims
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.employee_id == *employee_id)
            .cloned()
            .collect())
    }

    async fn get_by_ids(&self, ids: &[ClaimId]) -> Result<Vec<SkillClaim>, RepositoryError> {
        Ok(self
            .claims
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn apply_reconciliation(
        &self,
        employee_id: &EmployeeId,
        plan: &ReconciliationPlan,
    ) -> Result<(), RepositoryError> {
        let mut claims = self.claims.lock().unwrap();
        claims.retain(|c| {
            c.employee_id != *employee_id || !plan.deletes.contains(&c.skill_ref)
        });
        for upsert in &plan.upserts {
            match claims
                .iter_mut()
                .find(|c| c.employee_id == *employee_id && c.skill_ref == upsert.skill_ref)
            {
                Some(existing) => *existing = upsert.clone(),
                None => claims.push(upsert.clone()),
            }
        }
        Ok(())
    }

    async fn apply_review(
        &self,
        ids: &[ClaimId],
        update: &ReviewUpdate,
    ) -> Result<u64, RepositoryError> {
        let mut claims = self.claims.lock().unwrap();
        let mut updated = 0;
        for c in claims.iter_mut().filter(|c| ids.contains(&c.id)) {
            c.approval_status = update.status;
            c.level_selected = update.level;
            c.rejection_reason = update.rejection_reason.clone();
            c.reviewed_at = Some(update.reviewed_at);
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_pending_for_manager(
        &self,
        manager_email: &str,
    ) -> Result<Vec<PendingClaimRow>, RepositoryError> {
        let _ = manager_email;
        Ok(self.pending_rows.lock().unwrap().clone())
    }

    async fn list_with_skills_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<ClaimWithSkill>, RepositoryError> {
        let _ = employee_id;
        Ok(self.claims_with_skills.lock().unwrap().clone())
    }
}

/// What a notifier call looked like.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub employee_name: String,
    pub skill_names: Vec<String>,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationDispatcher for RecordingNotifier {
    async fn send_pending_review_email(
        &self,
        to: &str,
        employee_name: &str,
        skill_names: &[String],
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::RelayStatus(502));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            employee_name: employee_name.to_string(),
            skill_names: skill_names.to_vec(),
        });
        Ok(())
    }
}
