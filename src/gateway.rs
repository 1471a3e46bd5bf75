//! Remote tool gateway.
//!
//! The gateway is an HTTP service with one endpoint per tool:
//!
//! - `POST /tools/{name}` with the tool arguments as the JSON body
//! - `GET /tools` for the tool catalog
//! - `POST /mcp` for JSON-RPC methods the bridge does not handle itself
//! - `GET /health` for a liveness probe
//!
//! The [`Gateway`] trait is the seam the translator talks to; [`HttpGateway`]
//! is the reqwest-backed implementation used by the binary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{McpError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the bridge needs from the remote side.
///
/// Every method either yields the parsed JSON body of a successful reply or
/// one of the [`McpError`] gateway kinds (`Remote`, `Timeout`, `Decode`,
/// `Transport`).
#[async_trait]
pub trait Gateway: Send {
    /// `POST /tools/{name}` with `arguments` as the body.
    async fn call_tool(&mut self, name: &str, arguments: &JsonValue) -> Result<JsonValue>;

    /// `GET /tools`.
    async fn list_tools(&mut self) -> Result<JsonValue>;

    /// `POST /mcp` with the original JSON-RPC message.
    async fn forward(&mut self, message: &JsonValue) -> Result<JsonValue>;

    /// `GET /health`.
    async fn health(&mut self) -> Result<JsonValue>;

    /// Tear down the connection. Later calls fail.
    fn close(&mut self) {}
}

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway
    pub remote_url: String,
    /// Bearer token attached to every request
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Config for `remote_url` with no token and the default timeout.
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach a bearer token.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.remote_url.trim_end_matches('/')
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| McpError::Internal(format!("invalid auth token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// reqwest-backed gateway.
pub struct HttpGateway {
    base_url: Url,
    client: Option<Client>,
}

impl HttpGateway {
    /// Build the HTTP client for `config`.
    ///
    /// Fails if the base URL is not an absolute http(s) URL, the timeout is
    /// zero, or the token cannot be sent as a header.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = config.base_url().to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| McpError::Internal(format!("invalid remote URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(McpError::Internal(format!(
                "invalid remote URL '{}': scheme must be http or https",
                base_url
            )));
        }
        if config.timeout.is_zero() {
            return Err(McpError::Internal("timeout must be greater than zero".into()));
        }

        let client = Client::builder()
            .default_headers(config.headers()?)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: parsed,
            client: Some(client),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append `segments` to the base path. Each segment is percent-encoded,
    /// so a `/`, `?` or `..` inside one cannot leave its position.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| McpError::Internal(format!("cannot extend remote URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| McpError::Transport("gateway client is closed".to_string()))
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<JsonValue> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(McpError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call_tool(&mut self, name: &str, arguments: &JsonValue) -> Result<JsonValue> {
        let url = self.url(&["tools", name])?;
        debug!("POST {}", url);
        let request = self.client()?.post(url).json(arguments);
        self.send_json(request).await
    }

    async fn list_tools(&mut self) -> Result<JsonValue> {
        let url = self.url(&["tools"])?;
        debug!("GET {}", url);
        let request = self.client()?.get(url);
        self.send_json(request).await
    }

    async fn forward(&mut self, message: &JsonValue) -> Result<JsonValue> {
        let url = self.url(&["mcp"])?;
        debug!("POST {}", url);
        let request = self.client()?.post(url).json(message);
        self.send_json(request).await
    }

    async fn health(&mut self) -> Result<JsonValue> {
        let url = self.url(&["health"])?;
        let request = self.client()?.get(url);
        self.send_json(request).await
    }

    fn close(&mut self) {
        self.client = None;
    }
}
