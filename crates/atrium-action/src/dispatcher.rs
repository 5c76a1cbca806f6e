//! Action dispatcher — the single invocation entry point.
//!
//! Every caller goes through [`Dispatcher::execute`]: UI code, remote
//! clients, the tool-protocol bridge, and macro replay. The pipeline
//! (validate → sanitize → invoke → audit) is identical for all of
//! them, and the call never fails at the boundary — everything folds
//! into the returned [`ActionResult`].
//!
//! # Audit Event
//!
//! Every dispatch attempt emits [`ACTION_EXECUTED_EVENT`] with
//! `{componentId, actionId, parameters}` carrying the **sanitized**
//! parameters, whether the invocation succeeded or not, and even when
//! no handler was bound. The macro recorder and any external auditor
//! see the complete trail.
//!
//! # Concurrency
//!
//! Concurrent `execute` calls — same action or different — run
//! independently. The dispatcher gives no at-most-one-per-action
//! guarantee; ordering, where it matters, belongs to the handler.
//!
//! # Validation Ordering
//!
//! Validation inspects the **original** parameters; sanitization runs
//! afterwards and is what handlers observe. A value can therefore
//! satisfy the schema before sanitization alters it. This mirrors the
//! shell's historical behavior and is kept deliberately.

use crate::schema::ActionSchema;
use crate::sanitize::sanitize_value;
use async_trait::async_trait;
use atrium_event::EventBus;
use atrium_types::ActionResult;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Name of the audit event emitted on every dispatch attempt.
pub const ACTION_EXECUTED_EVENT: &str = "action:executed";

/// An action implementation bound to one `(component, action)` pair.
///
/// Handlers receive sanitized parameters and may fail with any
/// `anyhow::Error`; the dispatcher folds failures into the
/// [`ActionResult`] rather than propagating them.
///
/// For closures, use [`handler_fn`].
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Invokes the action with sanitized parameters.
    async fn invoke(&self, params: Value) -> anyhow::Result<Value>;
}

/// Adapts an async closure into an [`ActionHandler`].
///
/// # Example
///
/// ```
/// use atrium_action::handler_fn;
/// use serde_json::{json, Value};
///
/// let handler = handler_fn(|params: Value| async move {
///     let name = params["name"].as_str().unwrap_or("world");
///     Ok(json!({ "greeting": format!("hello, {name}") }))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> impl ActionHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    FnHandler {
        f: Box::new(move |params| Box::pin(f(params))),
    }
}

struct FnHandler {
    f: Box<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>,
}

#[async_trait]
impl ActionHandler for FnHandler {
    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        (self.f)(params).await
    }
}

/// Handler table key.
type PairKey = (String, String);

/// The uniform action invocation pipeline.
///
/// # Example
///
/// ```
/// use atrium_action::{handler_fn, Dispatcher};
/// use atrium_event::EventBus;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let dispatcher = Dispatcher::new(Arc::new(EventBus::new()));
/// dispatcher.bind_handler("sys", "echo", handler_fn(|p| async move { Ok(p) }));
///
/// let result = dispatcher
///     .execute("sys", "echo", Some(json!({"v": 1})))
///     .await;
/// assert!(result.success);
/// # }
/// ```
pub struct Dispatcher {
    bus: Arc<EventBus>,
    handlers: RwLock<HashMap<PairKey, Arc<dyn ActionHandler>>>,
    schemas: RwLock<HashMap<PairKey, Arc<ActionSchema>>>,
}

impl Dispatcher {
    /// Creates a dispatcher emitting audit events on the given bus.
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            handlers: RwLock::new(HashMap::new()),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Binds a handler to a `(component, action)` pair.
    ///
    /// At most one handler per pair; re-binding overwrites silently.
    pub fn bind_handler(
        &self,
        component_id: impl Into<String>,
        action_id: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) {
        self.handlers.write().insert(
            (component_id.into(), action_id.into()),
            Arc::new(handler),
        );
    }

    /// Removes the handler for a pair, if any.
    pub fn unbind_handler(&self, component_id: &str, action_id: &str) -> bool {
        self.handlers
            .write()
            .remove(&(component_id.to_string(), action_id.to_string()))
            .is_some()
    }

    /// Registers a parameter schema for a pair.
    ///
    /// Re-registration overwrites silently, like handler binding.
    pub fn register_schema(
        &self,
        component_id: impl Into<String>,
        action_id: impl Into<String>,
        schema: ActionSchema,
    ) {
        self.schemas.write().insert(
            (component_id.into(), action_id.into()),
            Arc::new(schema),
        );
    }

    /// Executes an action and returns the uniform result envelope.
    ///
    /// Pipeline:
    ///
    /// 1. validate the original parameters against any registered
    ///    schema — a violation produces a failure listing **every**
    ///    violated constraint;
    /// 2. sanitize the parameters (always, schema or not);
    /// 3. look up the handler — absent handlers yield a not-found
    ///    failure, never a panic;
    /// 4. await the handler, folding any error into the result;
    /// 5. emit the [`ACTION_EXECUTED_EVENT`] audit event with the
    ///    sanitized parameters, success or failure;
    /// 6. return the result.
    ///
    /// `None` parameters are treated as an empty object.
    pub async fn execute(
        &self,
        component_id: &str,
        action_id: &str,
        params: Option<Value>,
    ) -> ActionResult {
        let original = params.unwrap_or_else(|| Value::Object(Map::new()));

        let schema = self
            .schemas
            .read()
            .get(&(component_id.to_string(), action_id.to_string()))
            .cloned();
        let violations = schema.map_or_else(Vec::new, |s| s.validate(&original));

        let sanitized = sanitize_value(original);

        let result = if !violations.is_empty() {
            let detail: Vec<String> = violations.iter().map(ToString::to_string).collect();
            ActionResult::fail(format!(
                "parameter validation failed: {}",
                detail.join("; ")
            ))
        } else {
            let handler = self
                .handlers
                .read()
                .get(&(component_id.to_string(), action_id.to_string()))
                .cloned();
            match handler {
                None => ActionResult::fail(format!("{component_id}.{action_id} action not found")),
                Some(handler) => match handler.invoke(sanitized.clone()).await {
                    Ok(Value::Null) => ActionResult::ok(),
                    Ok(data) => ActionResult::ok_with(data),
                    Err(err) => ActionResult::fail(err.to_string()),
                },
            }
        };

        debug!(
            component = component_id,
            action = action_id,
            success = result.success,
            "action dispatched"
        );
        self.bus.emit(
            ACTION_EXECUTED_EVENT,
            json!({
                "componentId": component_id,
                "actionId": action_id,
                "parameters": sanitized,
            }),
        );

        result
    }

    /// Returns whether a handler is bound for the pair.
    #[must_use]
    pub fn has_handler(&self, component_id: &str, action_id: &str) -> bool {
        self.handlers
            .read()
            .contains_key(&(component_id.to_string(), action_id.to_string()))
    }

    /// Returns the bus this dispatcher audits to.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
