//! The assembled automation core.
//!
//! [`AtriumApp`] owns one of everything — bus, waiter, registry,
//! dispatcher, macro service, tool bridge — wired onto a single shared
//! event bus. Instances are fully isolated: two apps share nothing, so
//! tests and multi-tenant hosts can run them side by side.
//!
//! ```text
//! McpBridge ─┐
//! UI / CLI ──┼─▶ Dispatcher ──▶ handlers
//! MacroSvc ──┘       │
//!                    ▼ action:executed
//!                EventBus ◀── ComponentRegistry lifecycle events
//!                    │
//!                    ▼
//!               EventWaiter (timeout-bounded waits)
//! ```

use crate::builder::AtriumAppBuilder;
use crate::config::AtriumConfig;
use atrium_action::{ActionHandler, ActionSchema, ComponentRegistry, Dispatcher};
use atrium_event::{EventBus, EventWaiter, Subscription, WaitError, WaitOptions};
use atrium_macro::{Macro, MacroError, MacroRunReport, MacroService};
use atrium_mcp::{JsonRpcRequest, JsonRpcResponse, McpBridge};
use atrium_types::{ActionResult, Component, MacroId};
use serde_json::Value;
use std::sync::Arc;

/// The assembled automation core.
pub struct AtriumApp {
    pub(crate) config: AtriumConfig,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) waiter: EventWaiter,
    pub(crate) registry: Arc<ComponentRegistry>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) macros: Arc<MacroService>,
    pub(crate) bridge: McpBridge,
    /// Keeps the macro recorder wired to the audit trail.
    #[allow(dead_code)]
    pub(crate) recorder: Subscription,
}

impl AtriumApp {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AtriumAppBuilder {
        AtriumAppBuilder::new()
    }

    // --- actions ---------------------------------------------------

    /// Executes an action through the uniform pipeline.
    pub async fn execute_action(
        &self,
        component_id: &str,
        action_id: &str,
        params: Option<Value>,
    ) -> ActionResult {
        self.dispatcher.execute(component_id, action_id, params).await
    }

    /// Binds a handler to a `(component, action)` pair.
    pub fn bind_action_handler(
        &self,
        component_id: impl Into<String>,
        action_id: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) {
        self.dispatcher.bind_handler(component_id, action_id, handler);
    }

    /// Registers a parameter schema for a pair.
    pub fn register_action_schema(
        &self,
        component_id: impl Into<String>,
        action_id: impl Into<String>,
        schema: ActionSchema,
    ) {
        self.dispatcher.register_schema(component_id, action_id, schema);
    }

    // --- components ------------------------------------------------

    /// Registers a component (last write wins).
    pub fn register_component(&self, component: Component) {
        self.registry.register(component);
    }

    /// Unregisters a component. Unknown ids are a no-op.
    pub fn unregister_component(&self, component_id: &str) -> bool {
        self.registry.unregister(component_id)
    }

    /// Snapshot of all registered components, sorted by id.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        self.registry.components()
    }

    /// Returns one component by id.
    #[must_use]
    pub fn component(&self, component_id: &str) -> Option<Component> {
        self.registry.get(component_id)
    }

    // --- events ----------------------------------------------------

    /// Subscribes a callback to a named event.
    pub fn subscribe_event(
        &self,
        event: impl Into<String>,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        self.bus.subscribe(event, callback)
    }

    /// Removes a subscription. Unknown tokens are a no-op.
    pub fn unsubscribe_event(&self, subscription: &Subscription) {
        self.bus.unsubscribe(subscription);
    }

    /// Emits an event; returns how many named subscribers saw it.
    pub fn emit_event(&self, event: &str, data: Value) -> usize {
        self.bus.emit(event, data)
    }

    /// Names of the waitable events: the baseline set plus everything
    /// observed on the bus so far.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.waiter.available_events()
    }

    /// Waits for an event with the configured default timeout.
    pub async fn wait_for_event(&self, event: impl Into<String>) -> Result<Value, WaitError> {
        self.waiter
            .wait_for_with(event, WaitOptions::timeout(self.config.events.default_timeout_ms))
            .await
    }

    /// Waits for an event with explicit options.
    pub async fn wait_for_event_with(
        &self,
        event: impl Into<String>,
        options: WaitOptions,
    ) -> Result<Value, WaitError> {
        self.waiter.wait_for_with(event, options).await
    }

    /// Cancels all pending waits for an event; returns how many.
    pub fn cancel_waits(&self, event: &str) -> usize {
        self.waiter.cancel(event)
    }

    // --- macros ----------------------------------------------------

    /// Arms the macro recorder.
    pub fn start_recording(&self) {
        self.macros.start_recording();
    }

    /// Whether a recording is active.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.macros.is_recording()
    }

    /// Saves the active recording as a named macro.
    pub async fn stop_recording(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Macro, MacroError> {
        self.macros.stop_recording(name, description).await
    }

    /// Discards the active recording; returns the discarded step count.
    pub fn cancel_recording(&self) -> Result<usize, MacroError> {
        self.macros.cancel_recording()
    }

    /// All saved macros, oldest first.
    #[must_use]
    pub fn list_macros(&self) -> Vec<Macro> {
        self.macros.all()
    }

    /// Deletes a macro. Unknown ids return `Ok(false)`.
    pub async fn delete_macro(&self, id: MacroId) -> Result<bool, MacroError> {
        Ok(self.macros.delete(id).await?)
    }

    /// Replays a macro through the dispatcher.
    pub async fn run_macro(&self, id: MacroId) -> MacroRunReport {
        self.macros.execute(id, &self.dispatcher).await
    }

    // --- tool protocol ---------------------------------------------

    /// Handles one JSON-RPC tool request.
    pub async fn handle_rpc(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.bridge.handle(request).await
    }

    /// Handles a raw JSON-RPC request body.
    pub async fn handle_rpc_json(&self, body: &str) -> String {
        self.bridge.handle_json(body).await
    }

    // --- internals, exposed for embedding --------------------------

    /// The shared event bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The event waiter.
    #[must_use]
    pub fn waiter(&self) -> &EventWaiter {
        &self.waiter
    }

    /// The component registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// The action dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The macro service.
    #[must_use]
    pub fn macro_service(&self) -> &Arc<MacroService> {
        &self.macros
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AtriumConfig {
        &self.config
    }
}
