//! Shared configuration structs deserialized from the hierarchical
//! configuration sources.

mod loader;
mod pipeline;

pub use loader::*;
pub use pipeline::*;

use thiserror::Error;

/// Errors produced when validating loaded configuration values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The WAL snapshot path is empty.
    #[error("the WAL snapshot path must not be empty")]
    EmptyWalPath,

    /// The durable store path is empty.
    #[error("the output store path must not be empty")]
    EmptyOutputPath,
}
