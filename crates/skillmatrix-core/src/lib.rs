//! Business logic and repository trait definitions for Skillmatrix.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `skillmatrix-types` -- never on
//! `skillmatrix-infra` or any database/IO crate.

pub mod approval;
pub mod notify;
pub mod repository;
pub mod service;
