//! Conversion helpers between gateway bodies and MCP payloads.
//!
//! The gateway may or may not speak JSON-RPC. A body carrying a `jsonrpc`
//! key is treated as a finished envelope; anything else is a bare result the
//! bridge wraps itself.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Whether `body` is already a JSON-RPC envelope.
pub fn is_jsonrpc_shaped(body: &JsonValue) -> bool {
    body.get("jsonrpc").is_some()
}

/// Text form of a tool result: strings as is, anything else as JSON.
pub fn result_text(result: &JsonValue) -> String {
    match result {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Wrap a bare tool result as MCP tool-call content.
pub fn tool_content(result: &JsonValue) -> JsonValue {
    serde_json::json!({
        "content": [
            {
                "type": "text",
                "text": result_text(result),
            }
        ]
    })
}

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional string argument from JSON arguments.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Option<String> {
    args.get(name).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Tool arguments to forward; a missing or null value becomes `{}`.
pub fn tool_arguments(params: &Map<String, JsonValue>) -> JsonValue {
    match params.get("arguments") {
        None | Some(JsonValue::Null) => JsonValue::Object(Map::new()),
        Some(args) => args.clone(),
    }
}
