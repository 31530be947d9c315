//! SQLite skill claim repository implementation.
//!
//! Implements `ClaimRepository` from `skillmatrix-core`. The two mutating
//! operations run on the single-connection writer pool: a reconciliation
//! plan commits inside one explicit transaction, a review batch is one
//! bulk UPDATE. Partial application is never observable either way.

use chrono::{DateTime, Utc};
use sqlx::Row;

use skillmatrix_core::repository::claim::{
    ClaimRepository, PendingClaimRow, ReconciliationPlan, ReviewUpdate,
};
use skillmatrix_types::claim::{
    ApprovalStatus, ClaimId, ClaimWithSkill, SkillClaim, SkillLevel,
};
use skillmatrix_types::employee::EmployeeId;
use skillmatrix_types::error::RepositoryError;
use skillmatrix_types::skill::SkillRef;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ClaimRepository`.
pub struct SqliteClaimRepository {
    pool: DatabasePool,
}

impl SqliteClaimRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// `?, ?, ?` for an IN clause of `n` bind parameters.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn row_to_claim(row: &sqlx::sqlite::SqliteRow) -> Result<SkillClaim, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let employee_id: String = row
        .try_get("employee_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let skill_ref: String = row
        .try_get("skill_ref")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let level: String = row
        .try_get("level_selected")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let status: String = row
        .try_get("approval_status")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let approved_by_email: Option<String> = row
        .try_get("approved_by_email")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let rejection_reason: Option<String> = row
        .try_get("rejection_reason")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let requested_at: String = row
        .try_get("requested_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let reviewed_at: Option<String> = row
        .try_get("reviewed_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(SkillClaim {
        id: id
            .parse::<ClaimId>()
            .map_err(|e| RepositoryError::Query(format!("invalid claim id: {e}")))?,
        employee_id: employee_id
            .parse::<EmployeeId>()
            .map_err(|e| RepositoryError::Query(format!("invalid employee id: {e}")))?,
        skill_ref: SkillRef::new(skill_ref),
        level_selected: level
            .parse::<SkillLevel>()
            .map_err(RepositoryError::Query)?,
        approval_status: status
            .parse::<ApprovalStatus>()
            .map_err(RepositoryError::Query)?,
        approved_by_email,
        rejection_reason,
        requested_at: parse_datetime(&requested_at)?,
        reviewed_at: reviewed_at.as_deref().map(parse_datetime).transpose()?,
    })
}

impl ClaimRepository for SqliteClaimRepository {
    async fn list_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<SkillClaim>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM skill_claims WHERE employee_id = ?")
            .bind(employee_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut claims = Vec::with_capacity(rows.len());
        for row in &rows {
            claims.push(row_to_claim(row)?);
        }
        Ok(claims)
    }

    async fn get_by_ids(&self, ids: &[ClaimId]) -> Result<Vec<SkillClaim>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT * FROM skill_claims WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut claims = Vec::with_capacity(rows.len());
        for row in &rows {
            claims.push(row_to_claim(row)?);
        }
        Ok(claims)
    }

    async fn apply_reconciliation(
        &self,
        employee_id: &EmployeeId,
        plan: &ReconciliationPlan,
    ) -> Result<(), RepositoryError> {
        if plan.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if !plan.deletes.is_empty() {
            let sql = format!(
                "DELETE FROM skill_claims WHERE employee_id = ? AND skill_ref IN ({})",
                placeholders(plan.deletes.len())
            );
            let mut query = sqlx::query(&sql).bind(employee_id.to_string());
            for skill_ref in &plan.deletes {
                query = query.bind(skill_ref.as_str());
            }
            query
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        for claim in &plan.upserts {
            // The conflict target keeps the stored row's id on overwrite.
            sqlx::query(
                "INSERT INTO skill_claims
                 (id, employee_id, skill_ref, level_selected, approval_status,
                  approved_by_email, rejection_reason, requested_at, reviewed_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(employee_id, skill_ref) DO UPDATE SET
                     level_selected = excluded.level_selected,
                     approval_status = excluded.approval_status,
                     approved_by_email = excluded.approved_by_email,
                     rejection_reason = excluded.rejection_reason,
                     requested_at = excluded.requested_at,
                     reviewed_at = excluded.reviewed_at",
            )
            .bind(claim.id.to_string())
            .bind(claim.employee_id.to_string())
            .bind(claim.skill_ref.as_str())
            .bind(claim.level_selected.to_string())
            .bind(claim.approval_status.to_string())
            .bind(&claim.approved_by_email)
            .bind(&claim.rejection_reason)
            .bind(format_datetime(&claim.requested_at))
            .bind(claim.reviewed_at.as_ref().map(format_datetime))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn apply_review(
        &self,
        ids: &[ClaimId],
        update: &ReviewUpdate,
    ) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE skill_claims
             SET approval_status = ?, level_selected = ?, rejection_reason = ?, reviewed_at = ?
             WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql)
            .bind(update.status.to_string())
            .bind(update.level.to_string())
            .bind(&update.rejection_reason)
            .bind(format_datetime(&update.reviewed_at));
        for id in ids {
            query = query.bind(id.to_string());
        }

        let result = query
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn list_pending_for_manager(
        &self,
        manager_email: &str,
    ) -> Result<Vec<PendingClaimRow>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT c.id AS claim_id, c.employee_id, e.name AS employee_name,
                    c.skill_ref, c.level_selected, c.approval_status, c.requested_at,
                    COALESCE(s.category, '') AS category,
                    COALESCE(s.subcategory, '') AS subcategory,
                    COALESCE(s.subsubcategory, '') AS subsubcategory,
                    COALESCE(s.tools, c.skill_ref) AS tools
             FROM skill_claims c
             JOIN employees e ON e.id = c.employee_id
             LEFT JOIN skill_definitions s ON s.skill_ref = c.skill_ref
             WHERE c.approval_status = 'Pending'
               AND c.level_selected = 'L3'
               AND LOWER(COALESCE(c.approved_by_email, '')) = LOWER(?)
             ORDER BY c.employee_id, c.requested_at",
        )
        .bind(manager_email)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut pending = Vec::with_capacity(rows.len());
        for row in &rows {
            let claim_id: String = row
                .try_get("claim_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let employee_id: String = row
                .try_get("employee_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let level: String = row
                .try_get("level_selected")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let status: String = row
                .try_get("approval_status")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let requested_at: String = row
                .try_get("requested_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let get = |name: &str| -> Result<String, RepositoryError> {
                row.try_get(name)
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            };

            pending.push(PendingClaimRow {
                claim_id: claim_id
                    .parse::<ClaimId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid claim id: {e}")))?,
                employee_id: employee_id
                    .parse::<EmployeeId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid employee id: {e}")))?,
                employee_name: get("employee_name")?,
                skill_ref: SkillRef::new(get("skill_ref")?),
                category: get("category")?,
                subcategory: get("subcategory")?,
                subsubcategory: get("subsubcategory")?,
                tools: get("tools")?,
                level: level.parse::<SkillLevel>().map_err(RepositoryError::Query)?,
                status: status
                    .parse::<ApprovalStatus>()
                    .map_err(RepositoryError::Query)?,
                requested_at: parse_datetime(&requested_at)?,
            });
        }
        Ok(pending)
    }

    async fn list_with_skills_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<ClaimWithSkill>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT c.id AS claim_id, c.skill_ref, c.level_selected, c.approval_status,
                    c.rejection_reason, c.requested_at, c.reviewed_at,
                    COALESCE(s.category, '') AS category,
                    COALESCE(s.subcategory, '') AS subcategory,
                    COALESCE(s.subsubcategory, '') AS subsubcategory,
                    COALESCE(s.tools, c.skill_ref) AS tools
             FROM skill_claims c
             LEFT JOIN skill_definitions s ON s.skill_ref = c.skill_ref
             WHERE c.employee_id = ?
             ORDER BY category, subcategory, subsubcategory, tools",
        )
        .bind(employee_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut claims = Vec::with_capacity(rows.len());
        for row in &rows {
            let claim_id: String = row
                .try_get("claim_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let level: String = row
                .try_get("level_selected")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let status: String = row
                .try_get("approval_status")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let rejection_reason: Option<String> = row
                .try_get("rejection_reason")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let requested_at: String = row
                .try_get("requested_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let reviewed_at: Option<String> = row
                .try_get("reviewed_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let get = |name: &str| -> Result<String, RepositoryError> {
                row.try_get(name)
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            };

            claims.push(ClaimWithSkill {
                claim_id: claim_id
                    .parse::<ClaimId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid claim id: {e}")))?,
                skill_ref: SkillRef::new(get("skill_ref")?),
                category: get("category")?,
                subcategory: get("subcategory")?,
                subsubcategory: get("subsubcategory")?,
                tools: get("tools")?,
                level: level.parse::<SkillLevel>().map_err(RepositoryError::Query)?,
                status: status
                    .parse::<ApprovalStatus>()
                    .map_err(RepositoryError::Query)?,
                rejection_reason,
                requested_at: parse_datetime(&requested_at)?,
                reviewed_at: reviewed_at.as_deref().map(parse_datetime).transpose()?,
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_employee(pool: &DatabasePool, name: &str, email: &str) -> EmployeeId {
        let id = EmployeeId::new();
        sqlx::query(
            "INSERT INTO employees (id, name, email, manager_email, created_at) VALUES (?, ?, ?, NULL, ?)",
        )
        .bind(id.to_string())
        .bind(name)
        .bind(email)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();
        id
    }

    async fn seed_skill(pool: &DatabasePool, skill_ref: &str, tools: &str) {
        sqlx::query(
            "INSERT INTO skill_definitions (skill_ref, category, subcategory, subsubcategory, tools)
             VALUES (?, 'Engineering', 'Backend', 'Languages', ?)",
        )
        .bind(skill_ref)
        .bind(tools)
        .execute(&pool.writer)
        .await
        .unwrap();
    }

    fn make_claim(
        employee_id: EmployeeId,
        skill_ref: &str,
        level: SkillLevel,
        status: ApprovalStatus,
        approver: Option<&str>,
    ) -> SkillClaim {
        SkillClaim {
            id: ClaimId::new(),
            employee_id,
            skill_ref: SkillRef::new(skill_ref),
            level_selected: level,
            approval_status: status,
            approved_by_email: approver.map(str::to_string),
            rejection_reason: None,
            requested_at: Utc::now(),
            reviewed_at: None,
        }
    }

    async fn insert_claims(repo: &SqliteClaimRepository, employee_id: &EmployeeId, claims: Vec<SkillClaim>) {
        let plan = ReconciliationPlan {
            upserts: claims,
            deletes: Vec::new(),
        };
        repo.apply_reconciliation(employee_id, &plan).await.unwrap();
    }

    #[tokio::test]
    async fn test_plan_upserts_and_deletes_atomically() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        let emp = seed_employee(&pool, "Alice", "alice@corp.com").await;

        let a = make_claim(emp, "A", SkillLevel::L3, ApprovalStatus::Pending, Some("m1@corp.com"));
        let b = make_claim(emp, "B", SkillLevel::L2, ApprovalStatus::PreApproved, None);
        insert_claims(&repo, &emp, vec![a, b]).await;

        // New plan: upsert C, delete A.
        let c = make_claim(emp, "C", SkillLevel::L1, ApprovalStatus::PreApproved, None);
        let plan = ReconciliationPlan {
            upserts: vec![c],
            deletes: vec![SkillRef::new("A")],
        };
        repo.apply_reconciliation(&emp, &plan).await.unwrap();

        let stored = repo.list_for_employee(&emp).await.unwrap();
        let refs: Vec<&str> = stored.iter().map(|c| c.skill_ref.as_str()).collect();
        assert_eq!(stored.len(), 2);
        assert!(refs.contains(&"B"));
        assert!(refs.contains(&"C"));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_pair_keeping_id() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        let emp = seed_employee(&pool, "Alice", "alice@corp.com").await;

        let original = make_claim(emp, "A", SkillLevel::L2, ApprovalStatus::PreApproved, None);
        let original_id = original.id;
        insert_claims(&repo, &emp, vec![original]).await;

        // Same (employee, skill) pair, escalated to L3.
        let mut escalated =
            make_claim(emp, "A", SkillLevel::L3, ApprovalStatus::Pending, Some("m1@corp.com"));
        escalated.id = original_id;
        insert_claims(&repo, &emp, vec![escalated]).await;

        let stored = repo.list_for_employee(&emp).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, original_id);
        assert_eq!(stored[0].level_selected, SkillLevel::L3);
        assert_eq!(stored[0].approval_status, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_ids_skips_unknown() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        let emp = seed_employee(&pool, "Alice", "alice@corp.com").await;

        let a = make_claim(emp, "A", SkillLevel::L3, ApprovalStatus::Pending, None);
        let a_id = a.id;
        insert_claims(&repo, &emp, vec![a]).await;

        let found = repo.get_by_ids(&[a_id, ClaimId::new()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a_id);

        let none = repo.get_by_ids(&[]).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_apply_review_bulk_update() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        let emp = seed_employee(&pool, "Alice", "alice@corp.com").await;

        let a = make_claim(emp, "A", SkillLevel::L3, ApprovalStatus::Pending, Some("m1@corp.com"));
        let b = make_claim(emp, "B", SkillLevel::L3, ApprovalStatus::Pending, Some("m1@corp.com"));
        let ids = vec![a.id, b.id];
        insert_claims(&repo, &emp, vec![a, b]).await;

        let update = ReviewUpdate {
            status: ApprovalStatus::Rejected,
            level: SkillLevel::L2,
            rejection_reason: Some("insufficient evidence".to_string()),
            reviewed_at: Utc::now(),
        };
        let updated = repo.apply_review(&ids, &update).await.unwrap();
        assert_eq!(updated, 2);

        for claim in repo.list_for_employee(&emp).await.unwrap() {
            assert_eq!(claim.approval_status, ApprovalStatus::Rejected);
            assert_eq!(claim.level_selected, SkillLevel::L2);
            assert_eq!(claim.rejection_reason.as_deref(), Some("insufficient evidence"));
            assert!(claim.reviewed_at.is_some());
        }
    }

    #[tokio::test]
    async fn test_pending_query_filters_and_joins() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        seed_skill(&pool, "A", "Rust").await;
        let alice = seed_employee(&pool, "Alice", "alice@corp.com").await;
        let bob = seed_employee(&pool, "Bob", "bob@corp.com").await;

        let pending_mine =
            make_claim(alice, "A", SkillLevel::L3, ApprovalStatus::Pending, Some("M1@corp.com"));
        let pending_other =
            make_claim(bob, "A", SkillLevel::L3, ApprovalStatus::Pending, Some("m2@corp.com"));
        let pre_approved =
            make_claim(alice, "B", SkillLevel::L2, ApprovalStatus::PreApproved, None);
        insert_claims(&repo, &alice, vec![pending_mine, pre_approved]).await;
        insert_claims(&repo, &bob, vec![pending_other]).await;

        let rows = repo.list_pending_for_manager("m1@corp.com").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name, "Alice");
        assert_eq!(rows[0].tools, "Rust");
        assert_eq!(rows[0].category, "Engineering");
        assert_eq!(rows[0].level, SkillLevel::L3);
    }

    #[tokio::test]
    async fn test_claims_with_skills_falls_back_to_raw_ref() {
        let pool = test_pool().await;
        let repo = SqliteClaimRepository::new(pool.clone());
        let emp = seed_employee(&pool, "Alice", "alice@corp.com").await;

        // No matching skill_definitions row.
        let orphan = make_claim(emp, "unknown-ref", SkillLevel::L1, ApprovalStatus::PreApproved, None);
        insert_claims(&repo, &emp, vec![orphan]).await;

        let rows = repo.list_with_skills_for_employee(&emp).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tools, "unknown-ref");
        assert_eq!(rows[0].category, "");
    }
}
