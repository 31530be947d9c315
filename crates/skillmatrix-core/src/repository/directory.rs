//! Employee directory trait definition.

use skillmatrix_types::employee::{Employee, EmployeeId};
use skillmatrix_types::error::RepositoryError;

/// Repository trait for employee lookup and manager assignment.
///
/// Registration of employees is an external collaborator's responsibility;
/// this service only resolves them and maintains `manager_email`.
/// Implementations live in skillmatrix-infra (e.g., SqliteEmployeeDirectory).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait EmployeeDirectory: Send + Sync {
    /// Look up an employee by email (callers pass it already lowercased).
    fn resolve(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Employee>, RepositoryError>> + Send;

    /// One-time lazy fill of the manager email. A stored value is never
    /// overwritten; the call is a no-op in that case.
    fn set_manager_if_unset(
        &self,
        id: &EmployeeId,
        manager_email: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Explicit manager reassignment. Overwrites any stored value and
    /// returns the new one. `NotFound` for an unknown employee.
    fn update_manager(
        &self,
        email: &str,
        manager_email: &str,
    ) -> impl std::future::Future<Output = Result<String, RepositoryError>> + Send;
}
