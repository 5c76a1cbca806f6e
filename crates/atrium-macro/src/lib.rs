//! Macro recording, persistence, and replay.
//!
//! This crate turns the dispatcher's audit trail into a replayable
//! artifact: arm the recorder, do things, name the result, replay it
//! later. Everything a macro replays goes back through the regular
//! dispatch pipeline, so validation, sanitization, and auditing apply
//! to replays exactly as they do to live invocations.
//!
//! # Architecture
//!
//! | Type | Role |
//! |------|------|
//! | [`Macro`] / [`MacroStep`] | Persisted data model |
//! | [`MacroStore`] | Persistence trait (whole-table JSON) |
//! | [`FileMacroStore`] | Durable backend, atomic writes |
//! | [`MemoryMacroStore`] | Test backend |
//! | [`MacroService`] | Recorder state machine + player |
//! | [`MacroRunReport`] | Per-step replay outcomes |
//!
//! # Error Model
//!
//! Recorder misuse (stopping with nothing recording, empty names,
//! zero-step recordings) comes back as [`MacroError`] values with
//! `MACRO_*` codes. Persistence failures are [`StoreError`] with
//! `MACRO_STORE_*` codes; only I/O is considered retryable.

mod error;
mod service;
mod store;
mod types;

pub use error::{MacroError, StoreError};
pub use service::{MacroService, MACRO_DELETED_EVENT, MACRO_RECORDED_EVENT};
pub use store::{FileMacroStore, MacroStore, MemoryMacroStore};
pub use types::{Macro, MacroRunReport, MacroStep};
