//! The bridge from JSON-RPC tool calls to the action dispatcher.
//!
//! Remote tool clients speak JSON-RPC 2.0; internally everything is an
//! action. The bridge translates one request into exactly one
//! `mcp.process_message` dispatch, with the **whole original request**
//! as the `message` parameter — the bound handler owns the tool
//! semantics (listing, invocation, result shaping), the bridge owns
//! only the protocol envelope.

use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use atrium_action::Dispatcher;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Component the bridge dispatches to.
pub const MCP_COMPONENT_ID: &str = "mcp";
/// Action the bridge dispatches.
pub const MCP_PROCESS_ACTION: &str = "process_message";

/// JSON-RPC front door over a [`Dispatcher`].
///
/// # Example
///
/// ```
/// use atrium_action::{handler_fn, Dispatcher};
/// use atrium_event::EventBus;
/// use atrium_mcp::{JsonRpcRequest, McpBridge};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let dispatcher = Arc::new(Dispatcher::new(Arc::new(EventBus::new())));
/// dispatcher.bind_handler("mcp", "process_message", handler_fn(|_| async {
///     Ok(json!({"tools": []}))
/// }));
///
/// let bridge = McpBridge::new(Arc::clone(&dispatcher));
/// let response = bridge
///     .handle(JsonRpcRequest::new("tools/list", None, Some(json!(1))))
///     .await;
/// assert!(response.is_success());
/// # }
/// ```
pub struct McpBridge {
    dispatcher: Arc<Dispatcher>,
}

impl McpBridge {
    /// Creates a bridge over the given dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handles one request, always producing a response.
    ///
    /// - a version other than `"2.0"` → `-32600`;
    /// - `tools/list` / `tools/call` → one `mcp.process_message`
    ///   dispatch; dispatcher failure → `-32603` with the failure
    ///   message;
    /// - any other method → `-32601`.
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::failure(
                INVALID_REQUEST,
                format!("unsupported jsonrpc version '{}'", request.jsonrpc),
                request.id,
            );
        }

        match request.method.as_str() {
            "tools/list" | "tools/call" => {
                debug!(method = %request.method, "tool request");
                let id = request.id.clone();
                let message = serde_json::to_value(&request).unwrap_or(Value::Null);
                let result = self
                    .dispatcher
                    .execute(
                        MCP_COMPONENT_ID,
                        MCP_PROCESS_ACTION,
                        Some(json!({ "message": message })),
                    )
                    .await;

                if result.success {
                    JsonRpcResponse::success(result.data.unwrap_or(Value::Null), id)
                } else {
                    JsonRpcResponse::failure(INTERNAL_ERROR, result.error_message(), id)
                }
            }
            other => JsonRpcResponse::failure(
                METHOD_NOT_FOUND,
                format!("method '{other}' not found"),
                request.id,
            ),
        }
    }

    /// Handles a raw request body, for transports that carry text.
    ///
    /// Unparseable bodies yield a `-32700` response; the output is
    /// always valid response JSON.
    pub async fn handle_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<JsonRpcRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(err) => {
                JsonRpcResponse::failure(PARSE_ERROR, format!("parse error: {err}"), None)
            }
        };
        // A response built from these types always serializes.
        serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"response serialization failed"},"id":null}"#.to_string())
    }
}
