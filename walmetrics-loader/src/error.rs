use std::error::Error;

use thiserror::Error;
use walmetrics::error::WalmetricsError;

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error type for the loader service.
///
/// Wraps [`WalmetricsError`] for pipeline errors and provides variants for
/// infrastructure errors around it.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Pipeline error.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] WalmetricsError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    /// Creates a configuration error from any boxed source.
    pub fn config<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        LoaderError::Config(Box::new(err))
    }
}
