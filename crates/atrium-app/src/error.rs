//! Application-level error type.
//!
//! [`AppError`] unifies construction and configuration failures for
//! the composition layer. Action failures never appear here — they
//! come back inside `ActionResult`.

use atrium_macro::StoreError;
use atrium_types::ErrorCode;
use thiserror::Error;

/// Unified application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The macro store failed during construction or persistence.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error outside the macro store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "APP_CONFIG_ERROR",
            Self::Store(e) => e.code(),
            Self::Io(_) => "APP_IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Store(e) => e.is_recoverable(),
            Self::Io(_) => true,
        }
    }
}
