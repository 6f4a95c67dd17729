//! Core library of the WAL metrics pipeline.
//!
//! Decodes a change-capture WAL snapshot, infers a relational schema from its
//! records, materializes and loads that schema into an ephemeral SQLite
//! store, extracts metric records through a pluggable analytical query, and
//! persists them into a durable output store.

pub mod error;
mod macros;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod types;
pub mod wal;
