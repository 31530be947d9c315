//! SQLite employee directory implementation.
//!
//! Implements `EmployeeDirectory` from `skillmatrix-core` using sqlx with
//! split read/write pools. Emails are stored lowercase; lookups compare
//! case-insensitively anyway so pre-normalization rows resolve too.

use chrono::{DateTime, Utc};
use sqlx::Row;

use skillmatrix_core::repository::directory::EmployeeDirectory;
use skillmatrix_types::employee::{Employee, EmployeeId};
use skillmatrix_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `EmployeeDirectory`.
pub struct SqliteEmployeeDirectory {
    pool: DatabasePool,
}

impl SqliteEmployeeDirectory {
    /// Create a new directory backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn row_to_employee(row: &sqlx::sqlite::SqliteRow) -> Result<Employee, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let manager_email: Option<String> = row
        .try_get("manager_email")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Employee {
        id: id
            .parse::<EmployeeId>()
            .map_err(|e| RepositoryError::Query(format!("invalid employee id: {e}")))?,
        name,
        email,
        manager_email: manager_email.filter(|m| !m.is_empty()),
        created_at: parse_datetime(&created_at)?,
    })
}

impl EmployeeDirectory for SqliteEmployeeDirectory {
    async fn resolve(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM employees WHERE LOWER(email) = LOWER(?)")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(row_to_employee(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_manager_if_unset(
        &self,
        id: &EmployeeId,
        manager_email: &str,
    ) -> Result<(), RepositoryError> {
        // One-time fill: a stored value is never overwritten.
        sqlx::query(
            "UPDATE employees SET manager_email = ?
             WHERE id = ? AND (manager_email IS NULL OR manager_email = '')",
        )
        .bind(manager_email)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn update_manager(
        &self,
        email: &str,
        manager_email: &str,
    ) -> Result<String, RepositoryError> {
        let result = sqlx::query("UPDATE employees SET manager_email = ? WHERE LOWER(email) = LOWER(?)")
            .bind(manager_email)
            .bind(email)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(manager_email.to_string())
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
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_employee(pool: &DatabasePool, email: &str, manager: Option<&str>) -> EmployeeId {
        let id = EmployeeId::new();
        sqlx::query(
            "INSERT INTO employees (id, name, email, manager_email, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind("Alice")
        .bind(email)
        .bind(manager)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let pool = test_pool().await;
        let directory = SqliteEmployeeDirectory::new(pool.clone());
        seed_employee(&pool, "alice@corp.com", None).await;

        let found = directory.resolve("Alice@Corp.COM").await.unwrap().unwrap();
        assert_eq!(found.email, "alice@corp.com");
        assert_eq!(found.manager_email, None);

        let missing = directory.resolve("ghost@corp.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_set_manager_if_unset_fills_once() {
        let pool = test_pool().await;
        let directory = SqliteEmployeeDirectory::new(pool.clone());
        let id = seed_employee(&pool, "alice@corp.com", None).await;

        directory.set_manager_if_unset(&id, "m1@corp.com").await.unwrap();
        let found = directory.resolve("alice@corp.com").await.unwrap().unwrap();
        assert_eq!(found.manager_email.as_deref(), Some("m1@corp.com"));

        // Second fill is a no-op.
        directory.set_manager_if_unset(&id, "m2@corp.com").await.unwrap();
        let found = directory.resolve("alice@corp.com").await.unwrap().unwrap();
        assert_eq!(found.manager_email.as_deref(), Some("m1@corp.com"));
    }

    #[tokio::test]
    async fn test_update_manager_overwrites() {
        let pool = test_pool().await;
        let directory = SqliteEmployeeDirectory::new(pool.clone());
        seed_employee(&pool, "alice@corp.com", Some("old@corp.com")).await;

        let stored = directory
            .update_manager("alice@corp.com", "new@corp.com")
            .await
            .unwrap();
        assert_eq!(stored, "new@corp.com");

        let found = directory.resolve("alice@corp.com").await.unwrap().unwrap();
        assert_eq!(found.manager_email.as_deref(), Some("new@corp.com"));
    }

    #[tokio::test]
    async fn test_update_manager_unknown_employee() {
        let pool = test_pool().await;
        let directory = SqliteEmployeeDirectory::new(pool);

        let err = directory
            .update_manager("ghost@corp.com", "m@corp.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
