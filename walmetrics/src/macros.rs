//! Macros for pipeline error handling.
//!
//! Provides convenience macros for creating and returning
//! [`crate::error::WalmetricsError`] instances with reduced boilerplate.

/// Creates a [`crate::error::WalmetricsError`] from an error kind and static
/// description, with optional dynamic detail and an optional source error.
#[macro_export]
macro_rules! walmetrics_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::WalmetricsError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::WalmetricsError::from(($kind, $desc)).with_source($source)
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::WalmetricsError::from(($kind, $desc, $detail.to_string()))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::error::WalmetricsError::from(($kind, $desc, $detail.to_string()))
            .with_source($source)
    };
}

/// Creates and returns a [`crate::error::WalmetricsError`] from the current
/// function. Supports the same optional detail and source arguments as
/// [`walmetrics_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::walmetrics_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::walmetrics_error!($kind, $desc, source: $source))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::walmetrics_error!($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::walmetrics_error!(
            $kind,
            $desc,
            $detail,
            source: $source
        ))
    };
}
