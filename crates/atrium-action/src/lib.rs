//! Action dispatch pipeline for the Atrium automation core.
//!
//! This crate turns the declarative model from `atrium-types` into a
//! running invocation surface:
//!
//! ```text
//! UI / remote client / agent / macro replay
//!     │ execute(component_id, action_id, params)
//!     ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                     Dispatcher                       │
//! │  1. validate original params (collect ALL failures)  │
//! │  2. sanitize params (always)                         │
//! │  3. look up handler for (component, action)          │
//! │  4. await handler, fold errors into the result       │
//! │  5. emit "action:executed" audit event               │
//! │  6. return ActionResult                              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Pieces
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`ActionSchema`], [`Violation`] | JSON-schema-like parameter validation |
//! | [`sanitize_value`] | Unconditional defensive parameter scrubbing |
//! | [`ComponentRegistry`] | Last-write-wins component table |
//! | [`Dispatcher`], [`ActionHandler`] | Handler binding and invocation |
//! | [`SystemActions`] | Built-in `system` component (launch/notify/dialog) |
//!
//! # Error Model
//!
//! `Dispatcher::execute` never fails at the call boundary: missing
//! handlers, validation failures, and handler errors all come back as
//! `ActionResult { success: false, error }`. Only the handler trait
//! itself uses `Result`, so handler authors keep `?`.

mod dispatcher;
mod registry;
mod sanitize;
mod schema;
mod system;

pub use dispatcher::{handler_fn, ActionHandler, Dispatcher, ACTION_EXECUTED_EVENT};
pub use registry::ComponentRegistry;
pub use sanitize::{sanitize_string, sanitize_value};
pub use schema::{ActionSchema, Violation};
pub use system::{SystemActions, SYSTEM_COMPONENT_ID};
