//! Error types for the bridge.
//!
//! Every failure the translator can observe is one of a closed set of kinds, so
//! turning an error into a JSON-RPC error object is a total mapping.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::server::RpcError;

/// JSON-RPC: the JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC: the method (or tool) does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC: internal error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Result type alias using McpError.
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors raised while translating or forwarding a message.
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool name does not carry the recognized prefix.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required request parameter is absent.
    #[error("Missing required argument: {0}")]
    MissingArg(String),

    /// The gateway answered with a non-success status.
    #[error("Remote server error: {status}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// The gateway did not answer within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The gateway body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Connection-level failure talking to the gateway.
    #[error("{0}")]
    Transport(String),

    /// Local stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl McpError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            McpError::UnknownTool(_) => METHOD_NOT_FOUND,
            McpError::MissingArg(_)
            | McpError::Remote { .. }
            | McpError::Timeout(_)
            | McpError::Decode(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Build the JSON-RPC error object sent back to the host.
    pub fn to_rpc_error(&self) -> RpcError {
        match self {
            McpError::UnknownTool(name) => {
                RpcError::new(self.code(), format!("Unknown tool: {}", name))
            }
            McpError::Remote { status, body } => RpcError::with_data(
                self.code(),
                format!("Remote server error: {}", status),
                JsonValue::String(body.clone()),
            ),
            other => RpcError::new(self.code(), format!("Internal error: {}", other)),
        }
    }
}

impl From<reqwest::Error> for McpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            McpError::Timeout(e.to_string())
        } else if e.is_decode() {
            McpError::Decode(e.to_string())
        } else {
            McpError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(e: serde_json::Error) -> Self {
        McpError::Decode(e.to_string())
    }
}
