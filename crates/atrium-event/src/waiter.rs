//! EventWaiter — timeout-bounded, cancellable waits for named events.
//!
//! Callers suspend on [`EventWaiter::wait_for`] until the named event
//! fires, the timeout elapses, or someone calls
//! [`EventWaiter::cancel`]. Any number of waiters may be pending on the
//! same name; a single emission resolves **all** of them with the same
//! payload (fan-out), in registration order.
//!
//! # Bus Subscription Lifecycle
//!
//! The waiter keeps exactly one bus subscription per event name with
//! pending waiters:
//!
//! ```text
//! Idle ──first wait_for──► Active ──last waiter settles──► Idle
//! (not subscribed)        (subscribed once)               (unsubscribed)
//! ```
//!
//! # The `once` Flag
//!
//! Every `wait_for` call is a single-resolution future. `once: false`
//! is accepted and recorded but does **not** re-arm the waiter after it
//! resolves — a non-once waiter behaves identically to a once waiter.
//! Callers wanting a stream of events should loop on `wait_for`.

use crate::{EventBus, Subscription, WaitError};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// Default wait timeout: 30 seconds.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Event names every desktop shell emits, advertised even before first
/// emission. Names discovered at runtime are unioned in.
pub const BASELINE_EVENTS: &[&str] = &[
    "action:executed",
    "app:launch",
    "component:registered",
    "component:unregistered",
    "dialog:open",
    "macro:deleted",
    "macro:recorded",
    "notification:show",
];

/// Options for [`EventWaiter::wait_for_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Milliseconds before the wait rejects with [`WaitError::Timeout`].
    /// `0` waits indefinitely.
    pub timeout_ms: u64,
    /// Bookkeeping flag carried from the wait request. Resolution is
    /// single-shot regardless of its value (see module docs).
    pub once: bool,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            once: true,
        }
    }
}

impl WaitOptions {
    /// Options with the given timeout and `once: true`.
    #[must_use]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::default()
        }
    }

    /// Options that wait indefinitely.
    #[must_use]
    pub fn no_timeout() -> Self {
        Self::timeout(0)
    }
}

/// One pending waiter, keyed under its event name.
struct PendingWait {
    /// Registration-order identity, used to remove this waiter on timeout.
    seq: u64,
    tx: oneshot::Sender<Result<Value, WaitError>>,
    /// Carried from [`WaitOptions::once`]; resolution ignores it.
    #[allow(dead_code)]
    once: bool,
}

/// Per-event-name Active state: one shared bus subscription plus the
/// pending waiters in registration order.
struct NameState {
    subscription: Subscription,
    waiters: Vec<PendingWait>,
}

struct Inner {
    bus: Arc<EventBus>,
    pending: Mutex<HashMap<String, NameState>>,
    /// Every event name ever observed on the bus.
    observed: RwLock<BTreeSet<String>>,
    next_seq: AtomicU64,
}

/// Timeout-bounded, cancellable wait-for-named-event primitive.
///
/// Cheap to clone; all clones share the same pending-wait state.
///
/// # Example
///
/// ```
/// use atrium_event::{EventBus, EventWaiter, WaitOptions, WaitError};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let bus = Arc::new(EventBus::new());
/// let waiter = EventWaiter::new(Arc::clone(&bus));
///
/// // No emission: rejects at the timeout.
/// let err = waiter
///     .wait_for_with("never:fires", WaitOptions::timeout(10))
///     .await
///     .unwrap_err();
/// assert!(matches!(err, WaitError::Timeout { .. }));
/// # }
/// ```
#[derive(Clone)]
pub struct EventWaiter {
    inner: Arc<Inner>,
    /// Observe-all token for runtime event-name discovery.
    #[allow(dead_code)]
    observer: Arc<Subscription>,
}

impl EventWaiter {
    /// Creates a waiter over the given bus.
    ///
    /// Registers an observe-all hook so [`available_events`] can report
    /// names discovered at runtime.
    ///
    /// [`available_events`]: Self::available_events
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        let inner = Arc::new(Inner {
            bus: Arc::clone(&bus),
            pending: Mutex::new(HashMap::new()),
            observed: RwLock::new(BTreeSet::new()),
            next_seq: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        let observer = bus.observe_all(move |name, _| {
            if let Some(inner) = weak.upgrade() {
                inner.observed.write().insert(name.to_string());
            }
        });

        Self {
            inner,
            observer: Arc::new(observer),
        }
    }

    /// Waits for the named event with default options (30s timeout).
    pub async fn wait_for(&self, event: impl Into<String>) -> Result<Value, WaitError> {
        self.wait_for_with(event, WaitOptions::default()).await
    }

    /// Waits for the named event.
    ///
    /// Registers a pending waiter and suspends until one of:
    ///
    /// - the event fires — resolves with the emission payload;
    /// - `options.timeout_ms` elapses — the waiter is removed and the
    ///   call returns [`WaitError::Timeout`];
    /// - [`cancel`](Self::cancel) runs — returns [`WaitError::Cancelled`].
    ///
    /// The timeout is cooperative: a timer racing the event, not a
    /// preemptive abort of anything downstream.
    pub async fn wait_for_with(
        &self,
        event: impl Into<String>,
        options: WaitOptions,
    ) -> Result<Value, WaitError> {
        let event = event.into();
        let (seq, rx) = self.register(&event, options.once);
        debug!(event = %event, timeout_ms = options.timeout_ms, "waiter registered");

        if options.timeout_ms == 0 {
            return match rx.await {
                Ok(result) => result,
                Err(_) => Err(WaitError::BusClosed(event)),
            };
        }

        match tokio::time::timeout(Duration::from_millis(options.timeout_ms), rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(WaitError::BusClosed(event)),
            Err(_) => {
                self.remove_waiter(&event, seq);
                Err(WaitError::Timeout {
                    event,
                    timeout_ms: options.timeout_ms,
                })
            }
        }
    }

    /// Cancels every pending waiter for the event.
    ///
    /// Each rejected waiter observes [`WaitError::Cancelled`]; the
    /// shared bus subscription is released. Returns the number of
    /// waiters cancelled (0 when none were pending).
    pub fn cancel(&self, event: &str) -> usize {
        let state = self.inner.pending.lock().remove(event);
        let Some(state) = state else {
            return 0;
        };

        let count = state.waiters.len();
        for waiter in state.waiters {
            let _ = waiter.tx.send(Err(WaitError::Cancelled(event.to_string())));
        }
        self.inner.bus.unsubscribe(&state.subscription);
        debug!(event, count, "waiters cancelled");
        count
    }

    /// Returns the number of waiters currently pending on the event.
    #[must_use]
    pub fn pending_count(&self, event: &str) -> usize {
        self.inner
            .pending
            .lock()
            .get(event)
            .map_or(0, |state| state.waiters.len())
    }

    /// Returns all known event names, sorted.
    ///
    /// The union of [`BASELINE_EVENTS`] and every name observed on the
    /// bus since this waiter was created.
    #[must_use]
    pub fn available_events(&self) -> Vec<String> {
        let mut names: BTreeSet<String> =
            BASELINE_EVENTS.iter().map(|s| (*s).to_string()).collect();
        names.extend(self.inner.observed.read().iter().cloned());
        names.into_iter().collect()
    }

    /// Registers a pending waiter, subscribing the bus if this is the
    /// first waiter for the name.
    fn register(
        &self,
        event: &str,
        once: bool,
    ) -> (u64, oneshot::Receiver<Result<Value, WaitError>>) {
        let (tx, rx) = oneshot::channel();
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);

        let mut pending = self.inner.pending.lock();
        let state = pending
            .entry(event.to_string())
            .or_insert_with(|| NameState {
                subscription: Self::subscribe_fanout(&self.inner, event),
                waiters: Vec::new(),
            });
        state.waiters.push(PendingWait { seq, tx, once });

        (seq, rx)
    }

    /// Creates the single shared bus subscription for an event name.
    ///
    /// On fire: drains every pending waiter for the name in
    /// registration order, resolves each with the payload, and releases
    /// the subscription (Active → Idle).
    fn subscribe_fanout(inner: &Arc<Inner>, event: &str) -> Subscription {
        let weak: Weak<Inner> = Arc::downgrade(inner);
        let name = event.to_string();
        inner.bus.subscribe(event, move |data| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let state = inner.pending.lock().remove(&name);
            if let Some(state) = state {
                debug!(event = %name, count = state.waiters.len(), "waiters resolved");
                for waiter in state.waiters {
                    let _ = waiter.tx.send(Ok(data.clone()));
                }
                inner.bus.unsubscribe(&state.subscription);
            }
        })
    }

    /// Removes one waiter after its timeout fired; releases the bus
    /// subscription when it was the last.
    fn remove_waiter(&self, event: &str, seq: u64) {
        let mut pending = self.inner.pending.lock();
        let Some(state) = pending.get_mut(event) else {
            return;
        };
        state.waiters.retain(|w| w.seq != seq);
        if state.waiters.is_empty() {
            if let Some(state) = pending.remove(event) {
                drop(pending);
                self.inner.bus.unsubscribe(&state.subscription);
            }
        }
    }
}
