//! Core types for the Atrium automation core.
//!
//! Atrium is the coordination layer of a plugin-hosted desktop shell:
//! independently owned UI modules ("components") expose named,
//! parameterized operations ("actions"), and every caller — local UI
//! code, a remote client, or an agent speaking the tool protocol —
//! invokes them through one uniform dispatch pipeline.
//!
//! # Crate Architecture
//!
//! This crate is the bottom of the **SDK layer**:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  atrium-types  : ids, data model, ActionResult, ErrorCode   │
//! │  atrium-event  : EventBus, EventWaiter                      │
//! │  atrium-action : validator, sanitizer, registry, dispatcher │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`MacroId`], [`SubscriptionId`] | UUID-backed identifiers |
//! | [`Component`], [`ActionSpec`], [`ParameterSpec`] | Declarative capability model |
//! | [`ActionResult`] | Uniform success/data/error envelope |
//! | [`ErrorCode`] | Machine-readable error code convention |
//!
//! # Example
//!
//! ```
//! use atrium_types::{ActionResult, Component, ActionSpec};
//!
//! let component = Component::new("clock", "widget", "Clock")
//!     .with_action(ActionSpec::new("set_timezone", "Set timezone"));
//!
//! let result = ActionResult::ok_with(serde_json::json!({"tz": "UTC"}));
//! assert!(result.success);
//! ```

mod component;
mod error;
mod id;
mod result;

pub use component::{ActionSpec, Component, ComponentState, ParameterSpec};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{MacroId, SubscriptionId};
pub use result::ActionResult;
