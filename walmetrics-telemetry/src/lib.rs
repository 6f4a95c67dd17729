//! Telemetry initialization for the WAL metrics services.

pub mod tracing;

pub use crate::tracing::{init_test_tracing, init_tracing};
