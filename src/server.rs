//! JSON-RPC envelopes and the stdio run loop.
//!
//! The loop is strictly sequential: a message is read, fully translated
//! (including the gateway round-trip) and its reply flushed before the next
//! line is read.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::framer::{Frame, MessageReader, MessageWriter};
use crate::gateway::Gateway;
use crate::session::McpSession;
use crate::translator::Translator;

/// Inbound JSON-RPC request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol marker, expected to be "2.0"
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<JsonValue>,
    /// Request id; absent (or null) for notifications
    #[serde(default)]
    pub id: Option<JsonValue>,
}

impl JsonRpcRequest {
    /// Id to echo back, `null` when the request carried none.
    pub fn reply_id(&self) -> JsonValue {
        self.id.clone().unwrap_or(JsonValue::Null)
    }

    /// `params` as an object, if it is one.
    pub fn params_object(&self) -> Option<&serde_json::Map<String, JsonValue>> {
        self.params.as_ref().and_then(|p| p.as_object())
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Extra diagnostic payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    /// Error without data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Error carrying a data payload.
    pub fn with_data(code: i32, message: impl Into<String>, data: JsonValue) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Outbound JSON-RPC response built by the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Success payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    /// Failure payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Id of the originating request
    pub id: JsonValue,
}

impl JsonRpcResponse {
    /// Successful response.
    pub fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Error response.
    pub fn failure(id: JsonValue, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// What the bridge writes back for one inbound message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// An envelope built locally.
    Response(JsonRpcResponse),
    /// A gateway body that was already JSON-RPC shaped, passed through as is.
    Passthrough(JsonValue),
}

impl Reply {
    /// The reply as a JSON value.
    pub fn to_value(&self) -> JsonValue {
        match self {
            Reply::Response(resp) => serde_json::to_value(resp).unwrap_or(JsonValue::Null),
            Reply::Passthrough(value) => value.clone(),
        }
    }
}

/// Stdio MCP bridge server.
pub struct McpServer<G: Gateway> {
    translator: Translator<G>,
}

impl<G: Gateway> McpServer<G> {
    /// Create a server around a session.
    pub fn new(session: McpSession<G>) -> Self {
        Self {
            translator: Translator::new(session),
        }
    }

    /// Borrow the session.
    pub fn session(&self) -> &McpSession<G> {
        self.translator.session()
    }

    /// Serve process stdin/stdout until end of input.
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Serve one request at a time from `reader`, replying on `writer`.
    ///
    /// Returns `Ok(())` at end of input. Malformed lines are logged and
    /// skipped without a reply.
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = MessageReader::new(reader);
        let mut writer = MessageWriter::new(writer);

        while let Some(frame) = reader.next_frame().await? {
            let message = match frame {
                Frame::Message(message) => message,
                Frame::Malformed(reason) => {
                    error!("Failed to parse message: {}", reason);
                    continue;
                }
            };

            debug!("Received: {}", message);
            if let Some(reply) = self.translator.handle(message).await {
                writer.write_message(&reply).await?;
                debug!("Sent: {}", reply.to_value());
            }
        }

        info!("No more messages, exiting");
        Ok(())
    }

    /// Release the gateway connection.
    pub fn shutdown(&mut self) {
        self.translator.session_mut().shutdown();
    }
}
