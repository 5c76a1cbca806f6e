//! Macro recorder and store errors.
//!
//! Two tiers with separate code prefixes:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`MacroError::NotRecording`] | `MACRO_NOT_RECORDING` | No |
//! | [`MacroError::EmptyName`] | `MACRO_EMPTY_NAME` | No |
//! | [`MacroError::NoSteps`] | `MACRO_NO_STEPS` | No |
//! | [`MacroError::NotFound`] | `MACRO_NOT_FOUND` | No |
//! | [`MacroError::Store`] | `MACRO_STORE_*` | Varies |
//! | [`StoreError::Io`] | `MACRO_STORE_IO` | Yes |
//! | [`StoreError::Serialize`] | `MACRO_STORE_SERIALIZE` | No |
//! | [`StoreError::Deserialize`] | `MACRO_STORE_DESERIALIZE` | No |
//!
//! The `MACRO_*` tier marks recorder misuse: calling `stop_recording`
//! with no active session, naming a macro with whitespace, finishing a
//! recording that captured nothing. These come back as `Err`, never a
//! panic, so a scripted caller can surface them to its user.

use atrium_types::{ErrorCode, MacroId};
use thiserror::Error;

/// Recorder state-machine and lookup errors.
#[derive(Debug, Error)]
pub enum MacroError {
    /// `stop_recording`/`cancel_recording` without an active session.
    #[error("no recording in progress")]
    NotRecording,

    /// The macro name was empty or whitespace-only.
    #[error("macro name must not be empty")]
    EmptyName,

    /// The recording captured zero steps.
    #[error("cannot save a macro with no steps")]
    NoSteps,

    /// No macro with this id exists.
    #[error("macro {0} not found")]
    NotFound(MacroId),

    /// The backing store failed to persist or load.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for MacroError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotRecording => "MACRO_NOT_RECORDING",
            Self::EmptyName => "MACRO_EMPTY_NAME",
            Self::NoSteps => "MACRO_NO_STEPS",
            Self::NotFound(_) => "MACRO_NOT_FOUND",
            Self::Store(err) => err.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_recoverable(),
            _ => false,
        }
    }
}

/// Macro persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while reading or writing the macro table.
    ///
    /// **Recoverable** — transient disk or permission conditions may
    /// clear on retry.
    #[error("macro store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The macro table could not be serialized to JSON.
    #[error("macro table serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The persisted macro table could not be parsed.
    #[error("macro table deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "MACRO_STORE_IO",
            Self::Serialize(_) => "MACRO_STORE_SERIALIZE",
            Self::Deserialize(_) => "MACRO_STORE_DESERIALIZE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_types::{assert_error_code, assert_error_codes};

    #[test]
    fn macro_error_codes_follow_convention() {
        assert_error_codes(
            &[
                MacroError::NotRecording,
                MacroError::EmptyName,
                MacroError::NoSteps,
                MacroError::NotFound(MacroId::new()),
            ],
            "MACRO_",
        );
    }

    #[test]
    fn store_error_codes_follow_convention() {
        let io = StoreError::Io(std::io::Error::other("disk"));
        assert_error_code(&io, "MACRO_STORE_");
        assert!(io.is_recoverable());

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let de = StoreError::Deserialize(bad_json);
        assert_error_code(&de, "MACRO_STORE_");
        assert!(!de.is_recoverable());
    }

    #[test]
    fn store_error_folds_into_macro_error() {
        let err = MacroError::from(StoreError::Io(std::io::Error::other("disk")));
        assert_eq!(err.code(), "MACRO_STORE_IO");
        assert!(err.is_recoverable());
    }

    #[test]
    fn misuse_tier_is_not_recoverable() {
        assert!(!MacroError::NotRecording.is_recoverable());
        assert!(!MacroError::EmptyName.is_recoverable());
        assert!(!MacroError::NoSteps.is_recoverable());
    }
}
