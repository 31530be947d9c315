//! Observability setup for Skillmatrix.

pub mod tracing_setup;
