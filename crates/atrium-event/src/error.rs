//! Event-wait errors.
//!
//! All variants implement [`ErrorCode`] with the `WAIT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`WaitError::Timeout`] | `WAIT_TIMEOUT` | Yes |
//! | [`WaitError::Cancelled`] | `WAIT_CANCELLED` | No |
//! | [`WaitError::BusClosed`] | `WAIT_BUS_CLOSED` | No |

use atrium_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a pending event wait settled without a payload.
///
/// These are operational failures: they come back through the
/// `wait_for` future as `Err`, never as a panic.
///
/// # Example
///
/// ```
/// use atrium_event::WaitError;
/// use atrium_types::ErrorCode;
///
/// let err = WaitError::Timeout { event: "app:ready".into(), timeout_ms: 100 };
/// assert_eq!(err.code(), "WAIT_TIMEOUT");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum WaitError {
    /// The timeout elapsed before the event fired.
    ///
    /// **Recoverable** — the event may still fire; wait again with a
    /// longer timeout.
    #[error("timed out after {timeout_ms}ms waiting for event '{event}'")]
    Timeout {
        /// Event name that was awaited.
        event: String,
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The wait was explicitly cancelled via `EventWaiter::cancel`.
    ///
    /// **Not recoverable** — cancellation is a deliberate caller
    /// decision, not a transient condition.
    #[error("wait for event '{0}' was cancelled")]
    Cancelled(String),

    /// The waiter's internal channel closed without a resolution.
    ///
    /// Indicates the waiter state was torn down mid-wait (shutdown).
    /// **Not recoverable.**
    #[error("event bus closed while waiting for event '{0}'")]
    BusClosed(String),
}

impl ErrorCode for WaitError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "WAIT_TIMEOUT",
            Self::Cancelled(_) => "WAIT_CANCELLED",
            Self::BusClosed(_) => "WAIT_BUS_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_types::assert_error_codes;

    fn all_variants() -> Vec<WaitError> {
        vec![
            WaitError::Timeout {
                event: "x".into(),
                timeout_ms: 1,
            },
            WaitError::Cancelled("x".into()),
            WaitError::BusClosed("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "WAIT_");
    }

    #[test]
    fn timeout_is_recoverable() {
        let err = WaitError::Timeout {
            event: "app:ready".into(),
            timeout_ms: 100,
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("timed out after 100ms"));
    }

    #[test]
    fn cancelled_is_not_recoverable() {
        let err = WaitError::Cancelled("app:ready".into());
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("cancelled"));
    }
}
