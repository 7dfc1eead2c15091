//! MCP method dispatch.
//!
//! The server is stateless: each request is answered from the configuration
//! and the evidence checks alone.

use evidence_core::{run_tool, tool_descriptors, EvidenceError, ToolOutcome};
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::jsonrpc::{error_codes, CallToolParams, JsonRpcRequest, JsonRpcResponse, ToolResultBody};

/// Protocol revisions this server can speak, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 4] =
    ["2025-06-18", "2025-03-26", "2024-11-05", "2024-10-07"];

pub const LATEST_PROTOCOL_VERSION: &str = SUPPORTED_PROTOCOL_VERSIONS[0];

pub struct EvidenceServer {
    config: ServerConfig,
}

impl EvidenceServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle one raw input line. Returns `None` when nothing should be sent.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.len() > self.config.max_request_bytes {
            return Some(self.oversized_response(line.len()));
        }

        match JsonRpcRequest::parse(line) {
            Ok(request) => self.handle(request),
            Err(response) => {
                tracing::warn!("Rejected malformed message");
                Some(response)
            }
        }
    }

    /// Reply for a line longer than `max_request_bytes`.
    ///
    /// The id is unknown because the line is never parsed.
    pub fn oversized_response(&self, bytes: usize) -> JsonRpcResponse {
        tracing::warn!(
            bytes,
            limit = self.config.max_request_bytes,
            "Request exceeds size limit"
        );
        JsonRpcResponse::error(
            Value::Null,
            error_codes::INVALID_REQUEST,
            format!(
                "Invalid Request: exceeds {} bytes",
                self.config.max_request_bytes
            ),
        )
    }

    /// Dispatch a parsed request.
    pub fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Notification ignored");
            return None;
        };

        tracing::debug!(method = %request.method, id = %id, "Request received");

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::result(id, self.initialize(&request.params)),
            "ping" => JsonRpcResponse::result(id, json!({})),
            "tools/list" => JsonRpcResponse::result(id, json!({ "tools": tool_descriptors() })),
            "tools/call" => self.call_tool(id, request.params),
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };

        Some(response)
    }

    fn initialize(&self, params: &Value) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let protocol_version = requested
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(LATEST_PROTOCOL_VERSION);

        if let Some(client) = params.get("clientInfo").and_then(|c| c.get("name")) {
            tracing::info!(client = %client, protocol_version, "Client initialized");
        }

        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.config.name,
                "version": self.config.version,
            }
        })
    }

    fn call_tool(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                )
            }
        };

        let body = match run_tool(&params.name, &params.arguments) {
            Ok(ToolOutcome::Text(text)) => {
                tracing::info!(tool = %params.name, "Tool call completed");
                ToolResultBody::text(text)
            }
            Ok(ToolOutcome::InvalidArguments(errors)) => {
                tracing::warn!(tool = %params.name, errors = ?errors, "Tool arguments rejected");
                ToolResultBody::error_text(format!(
                    "Invalid arguments for {}: {}",
                    params.name,
                    errors.join("; ")
                ))
            }
            Err(EvidenceError::Catalog(e)) => {
                tracing::warn!(tool = %params.name, "Unknown tool requested");
                return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, e.to_string());
            }
            Err(e) => {
                tracing::error!(tool = %params.name, error = %e, "Tool call failed");
                return JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string());
            }
        };

        match serde_json::to_value(body) {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }
}

impl Default for EvidenceServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
