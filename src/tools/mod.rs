//! Tool catalog and tool-name classification.
//!
//! The bridge forwards every tool whose name carries the recognized prefix.
//! Tools the bridge knows about by name are the closed [`ChromaTool`] set;
//! they also make up the fallback catalog served when the gateway cannot
//! describe itself.

pub mod chroma;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use tracing::warn;

use crate::error::{McpError, Result};

pub use chroma::ChromaTool;

/// Default recognized tool-name prefix.
pub const DEFAULT_TOOL_PREFIX: &str = "chroma_";

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "chroma_add_documents")
    pub name: String,
    /// Tool description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", default = "empty_schema")]
    pub input_schema: JsonValue,
    /// Fields the gateway sent that the bridge does not interpret
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            extra: Map::new(),
        }
    }
}

fn empty_schema() -> JsonValue {
    crate::schema!(object {})
}

/// Where a catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Served by the gateway's `/tools` endpoint.
    Remote,
    /// Built-in defaults.
    Fallback,
}

/// The tool list served for `tools/list`.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDef>,
    source: CatalogSource,
}

impl ToolCatalog {
    /// The built-in catalog.
    pub fn fallback() -> Self {
        Self {
            tools: chroma::tools(),
            source: CatalogSource::Fallback,
        }
    }

    /// Interpret a `/tools` response body.
    ///
    /// Accepts `{"tools": [...]}` or a bare list and returns `None` for any
    /// other shape. Entries that are not tool definitions are skipped; the
    /// rest of the gateway's list is kept.
    pub fn from_remote(body: JsonValue) -> Option<Self> {
        let list = match body {
            JsonValue::Object(mut obj) => match obj.remove("tools") {
                Some(JsonValue::Array(list)) => list,
                _ => return None,
            },
            JsonValue::Array(list) => list,
            _ => return None,
        };

        let tools = list
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ToolDef>(entry) {
                Ok(tool) => Some(tool),
                Err(e) => {
                    warn!("Skipping malformed tool entry from remote: {}", e);
                    None
                }
            })
            .collect();

        Some(Self {
            tools,
            source: CatalogSource::Remote,
        })
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Where the definitions came from.
    pub fn source(&self) -> CatalogSource {
        self.source
    }
}

/// A tool name that passed the prefix check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolTarget {
    /// One of the tools the bridge knows by name.
    Known(ChromaTool),
    /// Prefixed, but only the gateway knows what it is.
    Extended(String),
}

impl ToolTarget {
    /// Classify `name`, rejecting names without `prefix`.
    pub fn parse(name: &str, prefix: &str) -> Result<Self> {
        if !name.starts_with(prefix) {
            return Err(McpError::UnknownTool(name.to_string()));
        }
        Ok(match ChromaTool::from_name(name) {
            Some(tool) => ToolTarget::Known(tool),
            None => ToolTarget::Extended(name.to_string()),
        })
    }

    /// Name used for the gateway endpoint.
    pub fn name(&self) -> &str {
        match self {
            ToolTarget::Known(tool) => tool.name(),
            ToolTarget::Extended(name) => name,
        }
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@type $req_type));)*
        $(props.insert($opt_name.to_string(), $crate::schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@type $req_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type object) => { serde_json::json!({"type": "object"}) };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
    (@type array_object) => { serde_json::json!({"type": "array", "items": {"type": "object"}}) };
}
