//! Error types and result definitions for the WAL metrics pipeline.
//!
//! Provides a single error type with classification and captured diagnostic
//! metadata. [`WalmetricsError`] carries an [`ErrorKind`], a static
//! description, optional dynamic detail (the offending identifier, table key
//! or record index), an optional source error, and the callsite location.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for pipeline operations using [`WalmetricsError`]
/// as the error type.
pub type WalmetricsResult<T> = Result<T, WalmetricsError>;

/// Detailed payload stored inside [`WalmetricsError`].
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type for pipeline operations.
#[derive(Debug, Clone)]
pub struct WalmetricsError {
    payload: ErrorPayload,
}

/// Specific categories of errors that can occur while running the pipeline.
///
/// Error kinds are organized by pipeline stage: decoding the WAL snapshot,
/// building SQL statements, talking to the stores, and extracting metrics.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Decode errors
    UnsupportedChangeKind,
    InvalidData,
    DeserializationError,

    // Statement-building errors
    InvalidEntityName,
    MissingColumnValue,

    // Store errors
    StoreConnectionFailed,
    StoreQueryFailed,

    // Extraction errors
    EmptyExtraction,
    ConversionError,

    // IO errors
    IoError,

    // Unknown / Uncategorized
    Unknown,
}

impl WalmetricsError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> &Backtrace {
        self.payload.backtrace.as_ref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance. The stored source is preserved across clones and
    /// exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`WalmetricsError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        let location = Location::caller();
        let backtrace = Arc::new(Backtrace::capture());

        WalmetricsError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location,
                backtrace,
            },
        }
    }
}

impl PartialEq for WalmetricsError {
    fn eq(&self, other: &WalmetricsError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl fmt::Display for WalmetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let location = self.payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.payload.kind,
            self.payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        if let Some(detail) = self.payload.detail.as_deref() {
            if detail.trim().is_empty() {
                write!(f, "\n  Detail: <empty>")?;
            } else {
                write!(f, "\n  Detail:")?;
                for line in detail.lines() {
                    write!(f, "\n    {line}")?;
                }
            }
        }

        Ok(())
    }
}

impl error::Error for WalmetricsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`WalmetricsError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for WalmetricsError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> WalmetricsError {
        WalmetricsError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`WalmetricsError`] from an error kind, static description, and
/// dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for WalmetricsError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> WalmetricsError {
        WalmetricsError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`std::io::Error`] to [`WalmetricsError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for WalmetricsError {
    #[track_caller]
    fn from(err: std::io::Error) -> WalmetricsError {
        let detail = err.to_string();
        let source = Arc::new(err);
        WalmetricsError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

/// Converts [`serde_json::Error`] to [`WalmetricsError`] with the appropriate
/// error kind based on error classification.
impl From<serde_json::Error> for WalmetricsError {
    #[track_caller]
    fn from(err: serde_json::Error) -> WalmetricsError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        let detail = err.to_string();
        let source = Arc::new(err);
        WalmetricsError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

/// Converts [`sqlx::Error`] to [`WalmetricsError`] with the appropriate error
/// kind.
///
/// Maps database errors to [`ErrorKind::StoreQueryFailed`], I/O errors to
/// [`ErrorKind::IoError`], connection errors to
/// [`ErrorKind::StoreConnectionFailed`], and row-decoding errors to
/// [`ErrorKind::ConversionError`].
impl From<sqlx::Error> for WalmetricsError {
    #[track_caller]
    fn from(err: sqlx::Error) -> WalmetricsError {
        let kind = match &err {
            sqlx::Error::Database(_) => ErrorKind::StoreQueryFailed,
            sqlx::Error::Io(_) => ErrorKind::IoError,
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => {
                ErrorKind::StoreConnectionFailed
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => ErrorKind::ConversionError,
            _ => ErrorKind::StoreQueryFailed,
        };

        let detail = err.to_string();
        let source = Arc::new(err);
        WalmetricsError::from_components(
            kind,
            Cow::Borrowed("Store operation failed"),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}
