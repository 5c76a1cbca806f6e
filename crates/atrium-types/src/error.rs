//! Unified error interface for Atrium.
//!
//! All Atrium error types implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: for programmatic error handling
//! - **Recoverability info**: for retry logic and user feedback
//!
//! # Code Format
//!
//! Error codes are UPPER_SNAKE_CASE, prefixed with the owning layer
//! (`WAIT_TIMEOUT`, `MACRO_NOT_RECORDING`, `DISPATCH_NOT_FOUND`), and
//! stable once defined — changing a code is an API break.
//!
//! # Example
//!
//! ```
//! use atrium_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound(String),
//!     Timeout,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "MY_NOT_FOUND",
//!             Self::Timeout => "MY_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! let err = MyError::Timeout;
//! assert_eq!(err.code(), "MY_TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface.
///
/// An error is **recoverable** if retrying the operation may succeed
/// (timeouts, busy resources). Invalid input and state-machine misuse
/// are not recoverable — they require a code change, not a retry.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// UPPER_SNAKE_CASE, prefixed with the layer name, stable across
    /// versions.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows Atrium conventions.
///
/// # Checks
///
/// 1. Code is non-empty
/// 2. Code starts with the expected prefix
/// 3. Code is UPPER_SNAKE_CASE
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for
/// use in tests.
///
/// # Example
///
/// ```
/// use atrium_types::{ErrorCode, assert_error_code};
///
/// #[derive(Debug)]
/// enum MyError { Timeout }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Timeout, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this to verify all variants of an error enum in one test.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
