//! Atrium application layer.
//!
//! This crate assembles the automation core — event bus, component
//! registry, action dispatcher, macro recorder, and the JSON-RPC tool
//! bridge — into a single [`AtriumApp`] with an explicit lifetime. No
//! globals: every instance is independent, and everything reachable
//! from one instance shares one event bus.
//!
//! # Example
//!
//! ```
//! use atrium_app::AtriumApp;
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = AtriumApp::builder().with_memory_store().build().await?;
//!
//!     let result = app
//!         .execute_action("system", "notify", Some(json!({"message": "hello"})))
//!         .await;
//!     assert!(result.success);
//!     Ok(())
//! }
//! ```

mod app;
mod builder;
mod config;
mod error;

pub use app::AtriumApp;
pub use builder::AtriumAppBuilder;
pub use config::{AtriumConfig, EventConfig, MacroStoreConfig};
pub use error::AppError;

// The surface an embedding host needs, re-exported from the layers.
pub use atrium_action::{
    handler_fn, ActionHandler, ActionSchema, ComponentRegistry, Dispatcher, SystemActions,
    Violation, ACTION_EXECUTED_EVENT, SYSTEM_COMPONENT_ID,
};
pub use atrium_event::{
    EventBus, EventWaiter, Subscription, WaitError, WaitOptions, DEFAULT_WAIT_TIMEOUT_MS,
};
pub use atrium_macro::{
    FileMacroStore, Macro, MacroError, MacroRunReport, MacroService, MacroStep, MacroStore,
    MemoryMacroStore, StoreError,
};
pub use atrium_mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpBridge};
pub use atrium_types::{
    ActionResult, ActionSpec, Component, ComponentState, ErrorCode, MacroId, ParameterSpec,
    SubscriptionId,
};
