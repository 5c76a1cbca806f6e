//! Event system for the Atrium automation core.
//!
//! Two pieces live here:
//!
//! - [`EventBus`] — named publish/subscribe with an observe-all hook.
//!   Every coordination signal in the desktop shell flows through it:
//!   the dispatcher's `action:executed` audit events, component
//!   lifecycle events, and whatever application events plugins emit.
//! - [`EventWaiter`] — a timeout-bounded, cancellable
//!   "suspend until this named event fires" primitive built on the bus.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        EventBus                          │
//! │   - per-name subscriber lists (opaque Subscription)      │
//! │   - observe-all hook (name discovery, macro recording)   │
//! └──────────────────────────────────────────────────────────┘
//!        ▲ emit                      │ callbacks
//!        │                           ▼
//!  Dispatcher / plugins        ┌──────────────┐
//!                              │ EventWaiter  │  wait_for("x").await
//!                              │  Idle→Active │  cancel("x")
//!                              └──────────────┘
//! ```
//!
//! # Waiter State Machine
//!
//! Per event name:
//!
//! | State | Meaning |
//! |-------|---------|
//! | Idle | No pending waiters; not subscribed to the bus |
//! | Active | ≥1 pending waiter; exactly one shared bus subscription |
//!
//! The first waiter for a name subscribes the bus; when the last waiter
//! settles (emission, timeout, or cancel) the subscription is released.
//!
//! # Example
//!
//! ```
//! use atrium_event::{EventBus, EventWaiter};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = Arc::new(EventBus::new());
//! let waiter = EventWaiter::new(Arc::clone(&bus));
//!
//! let pending = tokio::spawn({
//!     let waiter = waiter.clone();
//!     async move { waiter.wait_for("window:focused").await }
//! });
//!
//! tokio::task::yield_now().await;
//! bus.emit("window:focused", serde_json::json!({"id": 7}));
//!
//! let payload = pending.await.unwrap().unwrap();
//! assert_eq!(payload["id"], 7);
//! # }
//! ```

mod bus;
mod error;
mod waiter;

pub use bus::{EventBus, Subscription};
pub use error::WaitError;
pub use waiter::{EventWaiter, WaitOptions, BASELINE_EVENTS, DEFAULT_WAIT_TIMEOUT_MS};
