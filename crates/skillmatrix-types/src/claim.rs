use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::employee::EmployeeId;
use crate::skill::SkillRef;

/// Unique identifier for a skill claim, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub Uuid);

impl ClaimId {
    /// Create a new ClaimId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a ClaimId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Ordered proficiency tier. L3 is expert level and requires review.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SkillLevel {
    L1,
    L2,
    L3,
}

impl SkillLevel {
    /// Whether claims at this level need a manager's approval.
    pub fn requires_review(self) -> bool {
        self == SkillLevel::L3
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillLevel::L1 => write!(f, "L1"),
            SkillLevel::L2 => write!(f, "L2"),
            SkillLevel::L3 => write!(f, "L3"),
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "L1" => Ok(SkillLevel::L1),
            "L2" => Ok(SkillLevel::L2),
            "L3" => Ok(SkillLevel::L3),
            other => Err(format!("invalid skill level: '{other}'")),
        }
    }
}

/// Approval lifecycle of a claim.
///
/// Serialized with the wire/database spellings used by the rest of the
/// skill-matrix stack ("Pre-Approved", not "PreApproved").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// Self-certified, no review needed (levels below L3).
    #[serde(rename = "Pre-Approved")]
    PreApproved,
    /// Awaiting a specific manager's review (L3 only).
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::PreApproved => write!(f, "Pre-Approved"),
            ApprovalStatus::Pending => write!(f, "Pending"),
            ApprovalStatus::Approved => write!(f, "Approved"),
            ApprovalStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pre-Approved" => Ok(ApprovalStatus::PreApproved),
            "Pending" => Ok(ApprovalStatus::Pending),
            "Approved" => Ok(ApprovalStatus::Approved),
            "Rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(format!("invalid approval status: '{other}'")),
        }
    }
}

/// One employee's claim on one catalog skill.
///
/// At most one live claim exists per (`employee_id`, `skill_ref`) pair.
/// Claims are created and replaced by the reconciliation engine on
/// submission, and mutated in place by the review authorizer. No other
/// writer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillClaim {
    pub id: ClaimId,
    pub employee_id: EmployeeId,
    pub skill_ref: SkillRef,
    pub level_selected: SkillLevel,
    pub approval_status: ApprovalStatus,
    /// The manager expected to review this claim; set while Pending.
    pub approved_by_email: Option<String>,
    /// Present only when status is Rejected.
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Full-set skill submission from an employee.
///
/// The `skills` list replaces the stored set (approved claims are retained
/// even when omitted). Entries with a missing ref or level are dropped
/// silently, matching the frontend's partially-filled rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSkillsRequest {
    pub email: String,
    /// One-time lazy fill; never overwrites a stored manager.
    #[serde(default)]
    pub manager_email: Option<String>,
    pub skills: Vec<SubmittedSkill>,
}

/// One entry of a submission. Both fields optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedSkill {
    #[serde(rename = "skillRef", alias = "hashId", default)]
    pub skill_ref: Option<SkillRef>,
    #[serde(rename = "level", alias = "Level", default)]
    pub level: Option<SkillLevel>,
}

/// Result of a reconciled submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// Claims written (upserted) by this submission.
    pub saved_count: usize,
    /// How many of those entered the Pending state.
    pub pending_count: usize,
    pub pending_skill_refs: Vec<SkillRef>,
    /// Manager the review request was routed to, when any claim went Pending.
    pub pending_sent_to: Option<String>,
}

/// What a reviewer decided for a batch of claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewAction::Approve => write!(f, "approve"),
            ReviewAction::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(ReviewAction::Approve),
            "reject" => Ok(ReviewAction::Reject),
            other => Err(format!("invalid action: '{other}'. Must be 'approve' or 'reject'")),
        }
    }
}

/// Bulk review request from a manager.
///
/// `action` stays a raw string here so an unknown verb surfaces as a 400
/// from our own validation rather than a body-deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub approver_email: String,
    pub action: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub claim_ids: Vec<ClaimId>,
}

/// Result of an applied review batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub updated_count: usize,
    pub action: ReviewAction,
}

/// One pending claim as shown on a manager's review dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingClaim {
    pub claim_id: ClaimId,
    pub skill_ref: SkillRef,
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
    pub tools: String,
    pub level: SkillLevel,
    pub status: ApprovalStatus,
    pub requested_at: DateTime<Utc>,
}

/// All pending claims of one employee, grouped for the review UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEmployee {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub claims: Vec<PendingClaim>,
}

/// A stored claim joined with its catalog metadata (employee self-view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimWithSkill {
    pub claim_id: ClaimId,
    pub skill_ref: SkillRef,
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
    pub tools: String,
    pub level: SkillLevel,
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(SkillLevel::L1 < SkillLevel::L2);
        assert!(SkillLevel::L2 < SkillLevel::L3);
        assert!(SkillLevel::L3.requires_review());
        assert!(!SkillLevel::L2.requires_review());
    }

    #[test]
    fn test_level_roundtrip() {
        for level in [SkillLevel::L1, SkillLevel::L2, SkillLevel::L3] {
            let parsed: SkillLevel = level.to_string().parse().unwrap();
            assert_eq!(level, parsed);
        }
        assert!("L4".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ApprovalStatus::PreApproved,
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            let parsed: ApprovalStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_status_wire_spelling() {
        let json = serde_json::to_string(&ApprovalStatus::PreApproved).unwrap();
        assert_eq!(json, "\"Pre-Approved\"");
    }

    #[test]
    fn test_claim_id_roundtrip() {
        let id = ClaimId::new();
        let parsed: ClaimId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_submitted_skill_accepts_legacy_field_names() {
        let entry: SubmittedSkill =
            serde_json::from_str(r#"{"hashId": "abc123", "Level": "L3"}"#).unwrap();
        assert_eq!(entry.skill_ref, Some(SkillRef::new("abc123")));
        assert_eq!(entry.level, Some(SkillLevel::L3));
    }

    #[test]
    fn test_submitted_skill_tolerates_missing_fields() {
        let entry: SubmittedSkill = serde_json::from_str(r#"{"skillRef": "abc123"}"#).unwrap();
        assert_eq!(entry.level, None);
        let entry: SubmittedSkill = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(entry.skill_ref, None);
    }

    #[test]
    fn test_review_action_parse() {
        assert_eq!("Approve".parse::<ReviewAction>().unwrap(), ReviewAction::Approve);
        assert_eq!("reject".parse::<ReviewAction>().unwrap(), ReviewAction::Reject);
        assert!("defer".parse::<ReviewAction>().is_err());
    }
}
