//! SQLite skill catalog implementation.
//!
//! Read-only from this service's point of view; rows are loaded by the
//! external master-data ingestion pipeline.

use sqlx::Row;

use skillmatrix_core::repository::catalog::SkillCatalog;
use skillmatrix_types::error::RepositoryError;
use skillmatrix_types::skill::{SkillDefinition, SkillRef};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SkillCatalog`.
pub struct SqliteSkillCatalog {
    pool: DatabasePool,
}

impl SqliteSkillCatalog {
    /// Create a new catalog backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_definition(row: &sqlx::sqlite::SqliteRow) -> Result<SkillDefinition, RepositoryError> {
    let get = |name: &str| -> Result<String, RepositoryError> {
        row.try_get(name)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };
    let get_opt = |name: &str| -> Result<Option<String>, RepositoryError> {
        row.try_get(name)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };

    Ok(SkillDefinition {
        skill_ref: SkillRef::new(get("skill_ref")?),
        category: get("category")?,
        subcategory: get("subcategory")?,
        subsubcategory: get("subsubcategory")?,
        tools: get("tools")?,
        l1: get_opt("l1")?,
        l2: get_opt("l2")?,
        l3: get_opt("l3")?,
    })
}

impl SkillCatalog for SqliteSkillCatalog {
    async fn list(&self) -> Result<Vec<SkillDefinition>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM skill_definitions ORDER BY category, subcategory, subsubcategory, tools",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut definitions = Vec::with_capacity(rows.len());
        for row in &rows {
            definitions.push(row_to_definition(row)?);
        }
        Ok(definitions)
    }

    async fn get(&self, skill_ref: &SkillRef) -> Result<Option<SkillDefinition>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM skill_definitions WHERE skill_ref = ?")
            .bind(skill_ref.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(row_to_definition(&row)?)),
            None => Ok(None),
        }
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

    async fn seed_skill(pool: &DatabasePool, skill_ref: &str, tools: &str) {
        sqlx::query(
            "INSERT INTO skill_definitions (skill_ref, category, subcategory, subsubcategory, tools, l1, l2, l3)
             VALUES (?, 'Engineering', 'Backend', 'Languages', ?, 'basics', NULL, 'expert')",
        )
        .bind(skill_ref)
        .bind(tools)
        .execute(&pool.writer)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let pool = test_pool().await;
        let catalog = SqliteSkillCatalog::new(pool.clone());
        seed_skill(&pool, "ref-rust", "Rust").await;
        seed_skill(&pool, "ref-sql", "SQL").await;

        let all = catalog.list().await.unwrap();
        assert_eq!(all.len(), 2);

        let rust = catalog.get(&SkillRef::new("ref-rust")).await.unwrap().unwrap();
        assert_eq!(rust.tools, "Rust");
        assert_eq!(rust.l1.as_deref(), Some("basics"));
        assert_eq!(rust.l2, None);

        let missing = catalog.get(&SkillRef::new("nope")).await.unwrap();
        assert!(missing.is_none());
    }
}
