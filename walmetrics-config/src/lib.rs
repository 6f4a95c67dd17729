//! Hierarchical configuration loading for the WAL metrics services.
//!
//! Configuration comes from `configuration/base.(yaml|yml|json)`, an
//! environment-specific overlay selected by `APP_ENVIRONMENT`, and
//! `APP_`-prefixed environment-variable overrides.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{LoadConfigError, load_config};
