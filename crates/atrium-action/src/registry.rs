//! Component registry — the live table of capability surfaces.
//!
//! Registration is a plain map assignment: registering an id that is
//! already taken overwrites the prior entry (last-write-wins, never a
//! merge). Unregistration does not cancel dispatches already in
//! flight for that component — the handler table is a separate
//! concern owned by the dispatcher.

use atrium_event::EventBus;
use atrium_types::Component;
use parking_lot::RwLock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe component table.
///
/// Emits `component:registered` / `component:unregistered` on the bus
/// so the (external) rendering layer and event waiters can track the
/// surface.
///
/// # Example
///
/// ```
/// use atrium_action::ComponentRegistry;
/// use atrium_event::EventBus;
/// use atrium_types::Component;
/// use std::sync::Arc;
///
/// let registry = ComponentRegistry::new(Arc::new(EventBus::new()));
/// registry.register(Component::new("clock", "widget", "Clock"));
///
/// assert!(registry.contains("clock"));
/// assert!(registry.unregister("clock"));
/// assert!(registry.components().is_empty());
/// ```
pub struct ComponentRegistry {
    bus: Arc<EventBus>,
    components: RwLock<HashMap<String, Component>>,
}

impl ComponentRegistry {
    /// Creates an empty registry over the given bus.
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            components: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a component, overwriting any prior entry with the
    /// same id.
    ///
    /// Visible to all subsequent dispatch and snapshot calls
    /// immediately.
    pub fn register(&self, component: Component) {
        let id = component.id.clone();
        let replaced = self
            .components
            .write()
            .insert(id.clone(), component)
            .is_some();
        debug!(component = %id, replaced, "component registered");
        self.bus
            .emit("component:registered", json!({ "componentId": id }));
    }

    /// Removes a component. Returns `false` for unknown ids.
    ///
    /// In-flight dispatches for the id are unaffected.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.components.write().remove(id).is_some();
        if removed {
            debug!(component = %id, "component unregistered");
            self.bus
                .emit("component:unregistered", json!({ "componentId": id }));
        }
        removed
    }

    /// Returns a snapshot of all registered components, sorted by id.
    ///
    /// The snapshot is a deep copy — mutating it has no effect on the
    /// registry.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        let mut snapshot: Vec<Component> = self.components.read().values().cloned().collect();
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }

    /// Returns a copy of one component, if registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Component> {
        self.components.read().get(id).cloned()
    }

    /// Returns whether the id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.components.read().contains_key(id)
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}
