//! SQLite-backed repository implementations.

pub mod catalog;
pub mod claim;
pub mod employee;
pub mod pool;
