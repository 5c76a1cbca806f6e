//! EventBus — named publish/subscribe for the desktop shell.
//!
//! The bus is deliberately small: string-named topics, JSON payloads,
//! synchronous callback delivery. Subscribers receive an opaque
//! [`Subscription`] token; unsubscription goes through the token, not
//! through callback identity.
//!
//! # Delivery
//!
//! `emit` snapshots the subscriber list under the lock, then invokes
//! callbacks outside it. Callbacks may therefore re-enter the bus —
//! subscribe, unsubscribe, or emit — without deadlocking. An
//! unsubscription that races an in-flight `emit` may still see one
//! final delivery.

use atrium_types::SubscriptionId;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Callback for a named subscription.
type NamedCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Callback for the observe-all hook; receives the event name too.
type AnyCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Opaque handle identifying one subscription.
///
/// Returned by [`EventBus::subscribe`] and [`EventBus::observe_all`];
/// pass it back to [`EventBus::unsubscribe`] to detach. Tokens are the
/// only unsubscription mechanism — two subscriptions of the same
/// closure get distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: SubscriptionId,
    /// `Some(name)` for a named subscription, `None` for observe-all.
    event: Option<String>,
}

impl Subscription {
    /// Returns the subscribed event name, or `None` for observe-all.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }
}

/// Named publish/subscribe bus with an observe-all hook.
///
/// Thread-safe; clone an `Arc<EventBus>` into every subsystem that
/// needs it.
///
/// # Example
///
/// ```
/// use atrium_event::EventBus;
/// use std::sync::{Arc, Mutex};
///
/// let bus = EventBus::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sub = bus.subscribe("theme:changed", {
///     let seen = Arc::clone(&seen);
///     move |data| seen.lock().unwrap().push(data.clone())
/// });
///
/// bus.emit("theme:changed", serde_json::json!("dark"));
/// bus.unsubscribe(&sub);
/// bus.emit("theme:changed", serde_json::json!("light"));
///
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub struct EventBus {
    /// Per-name subscriber lists, in subscription order.
    named: RwLock<HashMap<String, Vec<(SubscriptionId, NamedCallback)>>>,
    /// Observe-all subscribers, in subscription order.
    any: RwLock<Vec<(SubscriptionId, AnyCallback)>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            named: RwLock::new(HashMap::new()),
            any: RwLock::new(Vec::new()),
        }
    }

    /// Subscribes to a named event.
    ///
    /// The callback runs synchronously inside every matching [`emit`],
    /// in subscription order relative to other subscribers of the same
    /// name.
    ///
    /// [`emit`]: Self::emit
    #[must_use]
    pub fn subscribe(
        &self,
        event: impl Into<String>,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        let event = event.into();
        let id = SubscriptionId::new();
        self.named
            .write()
            .entry(event.clone())
            .or_default()
            .push((id, Arc::new(callback)));
        Subscription {
            id,
            event: Some(event),
        }
    }

    /// Subscribes to every emission regardless of name.
    ///
    /// Observe-all callbacks run after the named subscribers of the
    /// emitted event. Used for event-name discovery and macro
    /// recording.
    #[must_use]
    pub fn observe_all(
        &self,
        callback: impl Fn(&str, &Value) + Send + Sync + 'static,
    ) -> Subscription {
        let id = SubscriptionId::new();
        self.any.write().push((id, Arc::new(callback)));
        Subscription { id, event: None }
    }

    /// Detaches a subscription.
    ///
    /// Unknown or already-detached tokens are a no-op.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        match &subscription.event {
            Some(event) => {
                let mut named = self.named.write();
                if let Some(subscribers) = named.get_mut(event) {
                    subscribers.retain(|(id, _)| *id != subscription.id);
                    if subscribers.is_empty() {
                        named.remove(event);
                    }
                }
            }
            None => {
                self.any.write().retain(|(id, _)| *id != subscription.id);
            }
        }
    }

    /// Emits an event to all matching subscribers.
    ///
    /// Returns the number of callbacks invoked (named + observe-all).
    /// Emitting with no subscribers is a no-op.
    pub fn emit(&self, event: &str, data: Value) -> usize {
        // Snapshot outside the locks so callbacks can re-enter the bus.
        let named: Vec<NamedCallback> = self
            .named
            .read()
            .get(event)
            .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();
        let any: Vec<AnyCallback> = self
            .any
            .read()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        trace!(event, named = named.len(), observers = any.len(), "emit");

        let mut delivered = 0;
        for cb in &named {
            cb(&data);
            delivered += 1;
        }
        for cb in &any {
            cb(event, &data);
            delivered += 1;
        }
        delivered
    }

    /// Returns the number of named subscribers for an event.
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.named.read().get(event).map_or(0, Vec::len)
    }

    /// Returns the number of observe-all subscribers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.any.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn emit_with_no_subscribers_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.emit("nobody:listening", json!(null)), 0);
    }

    #[test]
    fn subscribe_receives_payload() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));

        let _sub = bus.subscribe("app:launch", {
            let seen = Arc::clone(&seen);
            move |data| *seen.lock().unwrap() = Some(data.clone())
        });

        bus.emit("app:launch", json!({"appId": "files"}));
        assert_eq!(
            seen.lock().unwrap().as_ref().unwrap()["appId"],
            json!("files")
        );
    }

    #[test]
    fn named_subscribers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            let _sub = bus.subscribe("tick", move |_| order.lock().unwrap().push(tag));
        }

        bus.emit("tick", json!(null));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let sub = bus.subscribe("tick", {
            let count = Arc::clone(&count);
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });

        bus.emit("tick", json!(null));
        bus.unsubscribe(&sub);
        bus.emit("tick", json!(null));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count("tick"), 0);
    }

    #[test]
    fn unsubscribe_unknown_token_is_noop() {
        let bus = EventBus::new();
        let sub = bus.subscribe("tick", |_| {});
        bus.unsubscribe(&sub);
        bus.unsubscribe(&sub);
    }

    #[test]
    fn same_closure_twice_gets_distinct_tokens() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let make = |count: Arc<AtomicUsize>| {
            move |_: &Value| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };

        let a = bus.subscribe("tick", make(Arc::clone(&count)));
        let b = bus.subscribe("tick", make(Arc::clone(&count)));
        assert_ne!(a, b);

        bus.unsubscribe(&a);
        bus.emit("tick", json!(null));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        bus.unsubscribe(&b);
    }

    #[test]
    fn observe_all_sees_every_event_name() {
        let bus = EventBus::new();
        let names = Arc::new(Mutex::new(Vec::new()));

        let _obs = bus.observe_all({
            let names = Arc::clone(&names);
            move |name, _| names.lock().unwrap().push(name.to_string())
        });

        bus.emit("a", json!(1));
        bus.emit("b", json!(2));
        assert_eq!(*names.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn observe_all_runs_after_named() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let _obs = bus.observe_all({
            let order = Arc::clone(&order);
            move |_, _| order.lock().unwrap().push("all")
        });
        let _sub = bus.subscribe("tick", {
            let order = Arc::clone(&order);
            move |_| order.lock().unwrap().push("named")
        });

        bus.emit("tick", json!(null));
        assert_eq!(*order.lock().unwrap(), vec!["named", "all"]);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        // Re-entrancy: the callback detaches its own subscription
        // during delivery without deadlocking.
        let bus = Arc::new(EventBus::new());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let sub = bus.subscribe("once", {
            let bus = Arc::clone(&bus);
            let slot = Arc::clone(&slot);
            let count = Arc::clone(&count);
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
                if let Some(sub) = slot.lock().unwrap().take() {
                    bus.unsubscribe(&sub);
                }
            }
        });
        *slot.lock().unwrap() = Some(sub);

        bus.emit("once", json!(null));
        bus.emit("once", json!(null));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
