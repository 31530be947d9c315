use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an employee, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    /// Create a new EmployeeId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an EmployeeId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An employee known to the skill matrix.
///
/// Employees are registered by an external onboarding flow; this service
/// only resolves them and lazily fills `manager_email` on first submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    /// Display name used in review notifications.
    pub name: String,
    /// Unique, stored lowercase. All lookups are case-insensitive.
    pub email: String,
    /// The manager who reviews this employee's expert-level claims.
    /// None until a submission supplies one.
    pub manager_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lowercase-trim an email for storage and comparison.
///
/// Every email entering the system goes through this before it is stored
/// or compared, so equality checks can stay plain `==` internally.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
