//! Identifier types for Atrium.
//!
//! Generated identifiers are UUID-based so they stay unique across
//! processes and survive persistence round-trips. Component and action
//! ids, by contrast, are plain strings chosen by their owners
//! (`"system"`, `"notify"`) — see [`Component`](crate::Component).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a persisted macro.
///
/// A macro is a recorded, replayable sequence of action invocations.
/// Ids are generated (UUID v4) when a recording is materialized and
/// never reused; they key the persisted macro table.
///
/// # Example
///
/// ```
/// use atrium_types::MacroId;
///
/// let a = MacroId::new();
/// let b = MacroId::new();
/// assert_ne!(a, b);
/// assert!(a.to_string().starts_with("macro:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroId(pub Uuid);

impl MacroId {
    /// Creates a new [`MacroId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MacroId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MacroId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "macro:{}", self.0)
    }
}

impl std::str::FromStr for MacroId {
    type Err = uuid::Error;

    /// Parses from either the bare UUID or the `macro:<uuid>` display form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("macro:").unwrap_or(s);
        Ok(Self(Uuid::parse_str(raw)?))
    }
}

/// Identifier for an event-bus subscription.
///
/// Returned inside the opaque `Subscription` token handed out by the
/// bus. Holding the token is the only way to unsubscribe — there is no
/// callback-identity lookup.
///
/// # Example
///
/// ```
/// use atrium_types::SubscriptionId;
///
/// let a = SubscriptionId::new();
/// let b = SubscriptionId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

#[allow(clippy::new_without_default)] // SubscriptionIds are minted by the bus, not defaulted
impl SubscriptionId {
    /// Creates a new [`SubscriptionId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}
