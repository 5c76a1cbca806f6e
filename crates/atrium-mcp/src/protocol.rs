//! JSON-RPC 2.0 message types.
//!
//! Only the subset the tool bridge speaks: single requests with
//! optional params and id, and responses carrying either `result` or
//! `error`, never both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version string every message must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// The request was not a valid JSON-RPC 2.0 request.
pub const INVALID_REQUEST: i64 = -32600;
/// The method is not supported by this bridge.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// The dispatcher reported a failure while handling the call.
pub const INTERNAL_ERROR: i64 = -32603;
/// The request body was not parseable JSON.
pub const PARSE_ERROR: i64 = -32700;

/// An incoming JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version; must be `"2.0"`.
    pub jsonrpc: String,
    /// Method name, e.g. `tools/list`.
    pub method: String,
    /// Method parameters, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request id echoed in the response. Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with the protocol version filled in.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// Error member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Standard JSON-RPC error code.
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

/// An outgoing JSON-RPC response.
///
/// Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version; always `"2.0"`.
    pub jsonrpc: String,
    /// Call result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Id of the request this answers; `null` when unknowable.
    pub id: Value,
}

impl JsonRpcResponse {
    /// Builds a success response.
    #[must_use]
    pub fn success(result: Value, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: id.unwrap_or(Value::Null),
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn failure(code: i64, message: impl Into<String>, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
            id: id.unwrap_or(Value::Null),
        }
    }

    /// Returns whether this is a success response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_parses_without_params_or_id() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"tools/list"}"#).unwrap();
        assert_eq!(request.method, "tools/list");
        assert!(request.params.is_none());
        assert!(request.id.is_none());
    }

    #[test]
    fn success_response_omits_error_member() {
        let response = JsonRpcResponse::success(json!({"ok": true}), Some(json!(1)));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["result"], json!({"ok": true}));
        assert_eq!(value["id"], json!(1));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_response_omits_result_member() {
        let response = JsonRpcResponse::failure(METHOD_NOT_FOUND, "nope", None);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["error"]["code"], json!(-32601));
        assert_eq!(value["id"], Value::Null);
        assert!(value.get("result").is_none());
    }
}
