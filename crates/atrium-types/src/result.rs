//! The uniform action invocation envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a single action invocation.
///
/// Every dispatch returns this envelope — validation failures, missing
/// handlers, and handler errors are all folded into `success: false`
/// with a human-readable `error`. Nothing in the dispatch pipeline
/// panics or returns `Err` across the invocation boundary.
///
/// # Invariant
///
/// `error` is set only when `success` is `false`. `data` is optional
/// even on success. The constructors enforce this; prefer them over
/// struct literals.
///
/// # Example
///
/// ```
/// use atrium_types::ActionResult;
///
/// let ok = ActionResult::ok_with(serde_json::json!({"launched": "files"}));
/// assert!(ok.success);
/// assert!(ok.error.is_none());
///
/// let failed = ActionResult::fail("files.open action not found");
/// assert!(!failed.success);
/// assert!(failed.error.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Handler-produced payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable failure message. Set only when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// Successful result with no payload.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// Successful result carrying a payload.
    #[must_use]
    pub fn ok_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed result with a human-readable message.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Returns the error message, or `""` for successful results.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_has_no_error() {
        let result = ActionResult::ok();
        assert!(result.success);
        assert!(result.data.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn fail_sets_error_only() {
        let result = ActionResult::fail("boom");
        assert!(!result.success);
        assert_eq!(result.error_message(), "boom");
        assert!(result.data.is_none());
    }

    #[test]
    fn serde_skips_absent_fields() {
        let json = serde_json::to_string(&ActionResult::ok()).expect("serialize");
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn serde_roundtrip_with_data() {
        let result = ActionResult::ok_with(json!({"n": 1}));
        let json = serde_json::to_string(&result).expect("serialize");
        let back: ActionResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(result, back);
    }
}
