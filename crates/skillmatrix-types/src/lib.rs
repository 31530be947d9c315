//! Shared domain types for Skillmatrix.
//!
//! This crate contains the core domain types used across the platform:
//! Employee, SkillDefinition, SkillClaim, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod claim;
pub mod config;
pub mod employee;
pub mod error;
pub mod skill;
