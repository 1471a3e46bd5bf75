//! MCP to gateway translation.
//!
//! Three classes of message:
//!
//! - answered locally: `initialize`, `ping`, `resources/list`, `prompts/list`,
//!   and every `notifications/*` (which get no reply at all)
//! - `tools/list`: served from the session's catalog
//! - `tools/call` and any other method: forwarded to the gateway, with the
//!   reply normalized into a JSON-RPC envelope carrying the request id

use serde_json::Value as JsonValue;
use tracing::{debug, error, info, warn};

use crate::convert::{
    get_optional_string, get_string_arg, is_jsonrpc_shaped, tool_arguments, tool_content,
};
use crate::error::{McpError, Result, INVALID_REQUEST};
use crate::gateway::Gateway;
use crate::server::{JsonRpcRequest, JsonRpcResponse, Reply, RpcError};
use crate::session::McpSession;
use crate::tools::ToolTarget;

/// Protocol version answered when the host does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "mcp-chroma-bridge";

/// Dispatch classes for inbound methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    /// `initialize`
    Initialize,
    /// Any `notifications/*`
    Notification(&'a str),
    /// `ping`
    Ping,
    /// `resources/list`
    ResourcesList,
    /// `prompts/list`
    PromptsList,
    /// `tools/list`
    ToolsList,
    /// `tools/call`
    ToolsCall,
    /// Anything else, forwarded to `/mcp`
    Other(&'a str),
}

impl<'a> Method<'a> {
    /// Classify a method name.
    pub fn parse(name: &'a str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "ping" => Method::Ping,
            "resources/list" => Method::ResourcesList,
            "prompts/list" => Method::PromptsList,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            n if n.starts_with("notifications/") => Method::Notification(n),
            other => Method::Other(other),
        }
    }
}

/// How a bare gateway result is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrap {
    /// As MCP tool-call content.
    ToolContent,
    /// Directly as `result`.
    Direct,
}

/// Stateful translator between the host and the gateway.
pub struct Translator<G: Gateway> {
    session: McpSession<G>,
}

impl<G: Gateway> Translator<G> {
    /// Create a translator owning `session`.
    pub fn new(session: McpSession<G>) -> Self {
        Self { session }
    }

    /// Borrow the session.
    pub fn session(&self) -> &McpSession<G> {
        &self.session
    }

    /// Borrow the session mutably.
    pub fn session_mut(&mut self) -> &mut McpSession<G> {
        &mut self.session
    }

    /// Translate one inbound message. `None` means nothing is written back.
    pub async fn handle(&mut self, message: JsonValue) -> Option<Reply> {
        let request = match serde_json::from_value::<JsonRpcRequest>(message.clone()) {
            Ok(request) => request,
            Err(e) => return invalid_request(&message, &e.to_string()),
        };

        let id = request.reply_id();
        let reply = match Method::parse(&request.method) {
            Method::Initialize => Reply::Response(self.initialize(&request)),
            Method::Notification(name) => {
                if name == "notifications/initialized" {
                    self.session.mark_initialized();
                    info!("Client initialized");
                } else {
                    debug!("Ignoring notification {}", name);
                }
                return None;
            }
            Method::Ping => Reply::Response(JsonRpcResponse::success(id, serde_json::json!({}))),
            Method::ResourcesList => Reply::Response(JsonRpcResponse::success(
                id,
                serde_json::json!({ "resources": [] }),
            )),
            Method::PromptsList => Reply::Response(JsonRpcResponse::success(
                id,
                serde_json::json!({ "prompts": [] }),
            )),
            Method::ToolsList => {
                let catalog = self.session.catalog().await;
                Reply::Response(JsonRpcResponse::success(
                    id,
                    serde_json::json!({ "tools": catalog.tools() }),
                ))
            }
            Method::ToolsCall => {
                let outcome = self.call_tool(&request).await;
                respond(id, outcome, Wrap::ToolContent)
            }
            Method::Other(name) => {
                debug!("Forwarding {} to remote", name);
                let outcome = self.session.gateway_mut().forward(&message).await;
                respond(id, outcome, Wrap::Direct)
            }
        };

        self.session.record_request();
        Some(reply)
    }

    fn initialize(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let version = request
            .params_object()
            .and_then(|p| get_optional_string(p, "protocolVersion"))
            .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());
        self.session.set_protocol_version(&version);
        info!("Initialize with protocol version {}", version);

        JsonRpcResponse::success(
            request.reply_id(),
            serde_json::json!({
                "protocolVersion": version,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        )
    }

    async fn call_tool(&mut self, request: &JsonRpcRequest) -> Result<JsonValue> {
        let empty = serde_json::Map::new();
        let params = request.params_object().unwrap_or(&empty);
        let name = get_string_arg(params, "name")?;
        let target = self.session.tool_target(&name)?;
        let arguments = tool_arguments(params);

        match &target {
            ToolTarget::Known(tool) => debug!(tool = tool.name(), "Calling tool"),
            ToolTarget::Extended(name) => debug!(tool = %name, "Calling uncatalogued tool"),
        }

        self.session
            .gateway_mut()
            .call_tool(target.name(), &arguments)
            .await
    }
}

/// Turn a gateway outcome into the reply for request `id`.
fn respond(id: JsonValue, outcome: Result<JsonValue>, wrap: Wrap) -> Reply {
    match outcome {
        Ok(body) if is_jsonrpc_shaped(&body) => Reply::Passthrough(body),
        Ok(body) => {
            let result = match wrap {
                Wrap::ToolContent => tool_content(&body),
                Wrap::Direct => body,
            };
            Reply::Response(JsonRpcResponse::success(id, result))
        }
        Err(e) => {
            match &e {
                McpError::UnknownTool(name) => warn!("Unknown tool: {}", name),
                McpError::MissingArg(name) => warn!("tools/call without {}", name),
                McpError::Remote { status, .. } => error!("HTTP error from remote: {}", status),
                other => error!("Error forwarding to remote: {}", other),
            }
            Reply::Response(JsonRpcResponse::failure(id, e.to_rpc_error()))
        }
    }
}

/// A JSON line that is not a request. Answered only when it has an id.
fn invalid_request(message: &JsonValue, reason: &str) -> Option<Reply> {
    let id = message.get("id").filter(|id| !id.is_null())?;
    warn!("Invalid request: {}", reason);
    Some(Reply::Response(JsonRpcResponse::failure(
        id.clone(),
        RpcError::new(INVALID_REQUEST, "Invalid Request"),
    )))
}
