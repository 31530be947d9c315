//! Skill catalog trait definition.

use skillmatrix_types::error::RepositoryError;
use skillmatrix_types::skill::{SkillDefinition, SkillRef};

/// Read-only lookup of catalog skills.
///
/// The catalog is owned by the master-data ingestion pipeline; the claim
/// workflow never writes to it.
pub trait SkillCatalog: Send + Sync {
    /// All catalog entries.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SkillDefinition>, RepositoryError>> + Send;

    /// A single entry by its stable ref.
    fn get(
        &self,
        skill_ref: &SkillRef,
    ) -> impl std::future::Future<Output = Result<Option<SkillDefinition>, RepositoryError>> + Send;
}
