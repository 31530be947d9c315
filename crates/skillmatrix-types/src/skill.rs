use serde::{Deserialize, Serialize};

use std::fmt;

/// Stable identifier of a catalog skill.
///
/// Produced by the external master-data ingestion pipeline as a hash of the
/// skill's hierarchical name (category / sub-category / sub-sub-category /
/// tool). Opaque to this service; claims reference skills exclusively
/// through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillRef(pub String);

impl SkillRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SkillRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SkillRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Immutable catalog entry describing one skill.
///
/// Owned by the master-data pipeline; never mutated by the claim workflow.
/// `tools` is the display label shown in review emails and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinition {
    pub skill_ref: SkillRef,
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
    pub tools: String,
    /// Per-level proficiency descriptions from the master sheet.
    pub l1: Option<String>,
    pub l2: Option<String>,
    pub l3: Option<String>,
}

impl SkillDefinition {
    /// Label shown to humans (emails, dashboards).
    pub fn display_name(&self) -> &str {
        &self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_ref_transparent_serde() {
        let r = SkillRef::new("a1b2c3");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"a1b2c3\"");
        let back: SkillRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_skill_ref_is_empty() {
        assert!(SkillRef::new("  ").is_empty());
        assert!(!SkillRef::new("x").is_empty());
    }
}
