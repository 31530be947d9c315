//! Approval state machine for skill claims.
//!
//! A pure function over (stored state, requested level). The reconciliation
//! engine runs it once per submitted entry; nothing here touches storage,
//! so every transition can be enumerated in isolation.

use skillmatrix_types::claim::{ApprovalStatus, SkillLevel};

/// The (level, status) pair of a stored claim, as the machine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimState {
    pub level: SkillLevel,
    pub status: ApprovalStatus,
}

impl ClaimState {
    pub fn new(level: SkillLevel, status: ApprovalStatus) -> Self {
        Self { level, status }
    }
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Leave the stored claim untouched -- not even a timestamp refresh.
    Skip,
    /// Stage an upsert with the computed state.
    Upsert {
        level: SkillLevel,
        status: ApprovalStatus,
        approved_by: Option<String>,
    },
}

impl Transition {
    pub fn is_skip(&self) -> bool {
        matches!(self, Transition::Skip)
    }
}

/// Compute the next (level, status) pair for a submitted entry.
///
/// Transition table, first match wins:
///
/// | existing             | requested | result                               |
/// |----------------------|-----------|--------------------------------------|
/// | Approved @ L3        | L3        | Skip                                 |
/// | Approved @ L3        | < L3      | Pre-Approved @ requested             |
/// | anything else / none | L3        | Pending @ L3, approver = manager     |
/// | anything else / none | < L3      | Pre-Approved @ requested             |
///
/// A ratified expert claim is sticky: re-asserting it is a no-op, retracting
/// it drops to self-certified without re-review. Any fresh expert claim
/// re-enters the review queue, including previously rejected ones.
pub fn next_state(
    existing: Option<ClaimState>,
    requested: SkillLevel,
    manager_email: Option<&str>,
) -> Transition {
    match (existing, requested) {
        (
            Some(ClaimState {
                level: SkillLevel::L3,
                status: ApprovalStatus::Approved,
            }),
            SkillLevel::L3,
        ) => Transition::Skip,
        (
            Some(ClaimState {
                level: SkillLevel::L3,
                status: ApprovalStatus::Approved,
            }),
            level,
        ) => Transition::Upsert {
            level,
            status: ApprovalStatus::PreApproved,
            approved_by: None,
        },
        (_, SkillLevel::L3) => Transition::Upsert {
            level: SkillLevel::L3,
            status: ApprovalStatus::Pending,
            approved_by: manager_email.map(str::to_string),
        },
        (_, level) => Transition::Upsert {
            level,
            status: ApprovalStatus::PreApproved,
            approved_by: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [SkillLevel; 3] = [SkillLevel::L1, SkillLevel::L2, SkillLevel::L3];
    const STATUSES: [ApprovalStatus; 4] = [
        ApprovalStatus::PreApproved,
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
    ];

    fn upsert(level: SkillLevel, status: ApprovalStatus, approved_by: Option<&str>) -> Transition {
        Transition::Upsert {
            level,
            status,
            approved_by: approved_by.map(str::to_string),
        }
    }

    #[test]
    fn reasserting_ratified_expert_claim_is_a_noop() {
        let existing = ClaimState::new(SkillLevel::L3, ApprovalStatus::Approved);
        assert_eq!(
            next_state(Some(existing), SkillLevel::L3, Some("m@corp.com")),
            Transition::Skip
        );
    }

    #[test]
    fn retracting_ratified_expert_claim_self_certifies() {
        let existing = ClaimState::new(SkillLevel::L3, ApprovalStatus::Approved);
        assert_eq!(
            next_state(Some(existing), SkillLevel::L2, Some("m@corp.com")),
            upsert(SkillLevel::L2, ApprovalStatus::PreApproved, None)
        );
        assert_eq!(
            next_state(Some(existing), SkillLevel::L1, None),
            upsert(SkillLevel::L1, ApprovalStatus::PreApproved, None)
        );
    }

    #[test]
    fn fresh_expert_claim_goes_pending_with_approver() {
        assert_eq!(
            next_state(None, SkillLevel::L3, Some("m@corp.com")),
            upsert(SkillLevel::L3, ApprovalStatus::Pending, Some("m@corp.com"))
        );
    }

    #[test]
    fn expert_claim_without_known_manager_is_pending_unassigned() {
        assert_eq!(
            next_state(None, SkillLevel::L3, None),
            upsert(SkillLevel::L3, ApprovalStatus::Pending, None)
        );
    }

    #[test]
    fn rejected_expert_claim_reenters_review_queue() {
        let existing = ClaimState::new(SkillLevel::L2, ApprovalStatus::Rejected);
        assert_eq!(
            next_state(Some(existing), SkillLevel::L3, Some("m@corp.com")),
            upsert(SkillLevel::L3, ApprovalStatus::Pending, Some("m@corp.com"))
        );
    }

    #[test]
    fn sub_expert_levels_always_self_certify() {
        // Every non-(Approved@L3) prior state, and no prior state at all.
        for status in STATUSES {
            for level in LEVELS {
                if status == ApprovalStatus::Approved && level == SkillLevel::L3 {
                    continue;
                }
                let existing = ClaimState::new(level, status);
                for requested in [SkillLevel::L1, SkillLevel::L2] {
                    assert_eq!(
                        next_state(Some(existing), requested, Some("m@corp.com")),
                        upsert(requested, ApprovalStatus::PreApproved, None),
                        "existing {status:?}@{level:?}, requested {requested:?}"
                    );
                }
            }
        }
        for requested in [SkillLevel::L1, SkillLevel::L2] {
            assert_eq!(
                next_state(None, requested, Some("m@corp.com")),
                upsert(requested, ApprovalStatus::PreApproved, None)
            );
        }
    }

    #[test]
    fn full_table_enumeration() {
        // Every (existing, requested) pair lands on exactly one of the four rows.
        let mut cases = 0;
        for status in STATUSES {
            for level in LEVELS {
                for requested in LEVELS {
                    let existing = ClaimState::new(level, status);
                    let result = next_state(Some(existing), requested, Some("m@x.com"));
                    let ratified = status == ApprovalStatus::Approved && level == SkillLevel::L3;
                    match (ratified, requested) {
                        (true, SkillLevel::L3) => assert!(result.is_skip()),
                        (true, r) => assert_eq!(
                            result,
                            upsert(r, ApprovalStatus::PreApproved, None)
                        ),
                        (false, SkillLevel::L3) => assert_eq!(
                            result,
                            upsert(SkillLevel::L3, ApprovalStatus::Pending, Some("m@x.com"))
                        ),
                        (false, r) => assert_eq!(
                            result,
                            upsert(r, ApprovalStatus::PreApproved, None)
                        ),
                    }
                    cases += 1;
                }
            }
        }
        assert_eq!(cases, 36);
    }
}
