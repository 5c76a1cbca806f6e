//! JSON-RPC 2.0 tool-protocol bridge for Atrium.
//!
//! Exposes the action dispatcher to remote tool clients:
//!
//! ```text
//! raw text → JsonRpcRequest
//!   → McpBridge.handle
//!   → dispatcher.execute("mcp", "process_message", {message})
//!   → JsonRpcResponse (result | error) → raw text
//! ```
//!
//! The bridge validates only the protocol envelope. What a tool call
//! *means* is decided by whatever handler is bound to
//! `mcp.process_message` — typically the application's tool catalog.

mod bridge;
mod protocol;

pub use bridge::{McpBridge, MCP_COMPONENT_ID, MCP_PROCESS_ACTION};
pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
