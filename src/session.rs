//! MCP session management.
//!
//! A session is the bridge's whole process-wide state: the gateway
//! connection, the recognized tool prefix, the cached tool catalog and what
//! the host negotiated during `initialize`. It has a single owner, the
//! translator, so nothing here needs locking.

use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::Gateway;
use crate::tools::{CatalogSource, ToolCatalog, ToolTarget, DEFAULT_TOOL_PREFIX};

/// MCP session state.
pub struct McpSession<G: Gateway> {
    /// Outbound connection to the tool gateway
    gateway: G,
    /// Recognized tool-name prefix
    tool_prefix: String,
    /// Catalog, fetched on first use
    catalog: Option<ToolCatalog>,
    /// Protocol version agreed in `initialize`
    protocol_version: Option<String>,
    /// Whether the host sent `notifications/initialized`
    initialized: bool,
    /// Requests answered so far
    requests_handled: u64,
    closed: bool,
}

impl<G: Gateway> McpSession<G> {
    /// Create a session recognizing the default `chroma_` prefix.
    pub fn new(gateway: G) -> Self {
        Self::with_prefix(gateway, DEFAULT_TOOL_PREFIX)
    }

    /// Create a session recognizing `tool_prefix`.
    pub fn with_prefix(gateway: G, tool_prefix: &str) -> Self {
        Self {
            gateway,
            tool_prefix: tool_prefix.to_string(),
            catalog: None,
            protocol_version: None,
            initialized: false,
            requests_handled: 0,
            closed: false,
        }
    }

    /// Classify a tool name against this session's prefix.
    pub fn tool_target(&self, name: &str) -> Result<ToolTarget> {
        ToolTarget::parse(name, &self.tool_prefix)
    }

    /// Get a mutable reference to the gateway.
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// The tool catalog, fetching it from the gateway on first use.
    ///
    /// Falls back to the built-in catalog when the gateway is unreachable or
    /// answers with an unexpected shape. Either way the result is kept for
    /// the rest of the session.
    pub async fn catalog(&mut self) -> &ToolCatalog {
        if self.catalog.is_none() {
            let catalog = match self.gateway.list_tools().await {
                Ok(body) => ToolCatalog::from_remote(body).unwrap_or_else(|| {
                    warn!("Unexpected tool list shape from remote, using default tools");
                    ToolCatalog::fallback()
                }),
                Err(e) => {
                    warn!("Failed to get tools from remote: {}", e);
                    ToolCatalog::fallback()
                }
            };
            info!(
                tools = catalog.tools().len(),
                remote = catalog.source() == CatalogSource::Remote,
                "Tool catalog loaded"
            );
            self.catalog = Some(catalog);
        }
        self.catalog.get_or_insert_with(ToolCatalog::fallback)
    }

    /// Probe the gateway's health endpoint and log the outcome.
    ///
    /// Never fails; an unhealthy gateway only earns a warning.
    pub async fn probe(&mut self) -> bool {
        match self.gateway.health().await {
            Ok(status) => {
                info!("Remote gateway health: {}", status);
                true
            }
            Err(e) => {
                warn!("Remote gateway health check failed: {}", e);
                false
            }
        }
    }

    /// Record the protocol version answered in `initialize`.
    pub fn set_protocol_version(&mut self, version: &str) {
        self.protocol_version = Some(version.to_string());
    }

    /// Get the negotiated protocol version.
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Mark the handshake complete.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Whether the host finished the handshake.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Count one answered request.
    pub fn record_request(&mut self) {
        self.requests_handled += 1;
    }

    /// Requests answered so far.
    pub fn requests_handled(&self) -> u64 {
        self.requests_handled
    }

    /// Close the gateway connection. Idempotent.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.gateway.close();
        info!(requests = self.requests_handled, "Bridge session closed");
    }
}
