//! Notification dispatcher trait definition.
//!
//! Invoked fire-and-forget by the reconciliation engine after a submission
//! that produced new pending claims. Dispatch failure is logged by the
//! caller and never affects the already-committed transaction.

use skillmatrix_types::error::NotifyError;

/// Outbound review-request notifications.
///
/// The concrete implementation in skillmatrix-infra posts to the HTTP mail
/// relay; tests substitute an in-memory recorder.
pub trait NotificationDispatcher: Send + Sync {
    /// Ask `to` (a manager) to review `skill_names` claimed by
    /// `employee_name`. The dispatcher owns presentation concerns such as
    /// capping long skill lists.
    fn send_pending_review_email(
        &self,
        to: &str,
        employee_name: &str,
        skill_names: &[String],
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}
