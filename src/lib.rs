//! # chroma-mcp-bridge
//!
//! Stdio bridge exposing a remote Chroma tool gateway as MCP tools.
//!
//! The bridge reads newline-delimited JSON-RPC 2.0 messages on stdin,
//! answers protocol housekeeping itself, forwards tool calls to the gateway
//! over HTTP (`POST /tools/{name}`) and writes JSON-RPC replies on stdout.
//! One message is handled at a time; the reply to a request is flushed
//! before the next line is read.
//!
//! ## Usage
//!
//! The bridge is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "chroma": {
//!       "command": "/path/to/chroma-mcp-bridge",
//!       "args": ["--remote-url", "https://chroma-gateway.example.com", "--auth-token", "..."]
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use chroma_mcp_bridge::{GatewayConfig, HttpGateway, McpServer, McpSession};
//!
//! # async fn run() -> chroma_mcp_bridge::Result<()> {
//! let gateway = HttpGateway::new(&GatewayConfig::new("http://localhost:8080"))?;
//! let mut server = McpServer::new(McpSession::new(gateway));
//! server.run_stdio().await?;
//! server.shutdown();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod convert;
mod error;
mod framer;
mod gateway;
pub mod logging;
mod server;
mod session;
pub mod tools;
mod translator;

pub use convert::{is_jsonrpc_shaped, result_text, tool_content};
pub use error::{McpError, Result, INTERNAL_ERROR, INVALID_REQUEST, METHOD_NOT_FOUND};
pub use framer::{Frame, MessageReader, MessageWriter};
pub use gateway::{Gateway, GatewayConfig, HttpGateway, DEFAULT_TIMEOUT};
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer, Reply, RpcError};
pub use session::McpSession;
pub use tools::{ChromaTool, ToolCatalog, ToolDef, ToolTarget, DEFAULT_TOOL_PREFIX};
pub use translator::{Method, Translator, DEFAULT_PROTOCOL_VERSION, SERVER_NAME};
