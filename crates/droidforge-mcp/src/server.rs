// crates/droidforge-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose Droidforge tools via JSON-RPC 2.0.
// Dependencies: droidforge-core, droidforge-contract, axum, tokio
// ============================================================================

//! ## Overview
//! The MCP server exposes the tool registry using JSON-RPC 2.0 over stdio or
//! HTTP. Every request routes through [`droidforge_core::Dispatcher`]; this
//! layer only frames messages, classifies methods, and maps dispatch
//! failures onto stable JSON-RPC error codes. Requests without an `id` are
//! notifications and never produce a response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use droidforge_contract::ToolDefinition;
use droidforge_core::CorrelationIdGenerator;
use droidforge_core::Dispatcher;
use droidforge_core::FailureKind;
use droidforge_core::ToolContext;
use droidforge_core::ToolFailure;
use droidforge_core::ToolOutcome;
use droidforge_core::ToolRegistry;
use droidforge_core::ToolRequest;
use droidforge_core::sanitize_client_correlation_id;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::audit::McpAuditEvent;
use crate::audit::McpAuditSink;
use crate::audit::McpStderrAuditSink;
use crate::audit::timestamp_ms;
use crate::config::ConfigError;
use crate::config::DroidforgeConfig;
use crate::config::ServerTransport;
use crate::config::StdioFraming;
use crate::telemetry::McpMethod;
use crate::telemetry::McpMetricEvent;
use crate::telemetry::McpMetrics;
use crate::telemetry::McpOutcome;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// MCP protocol version advertised by the initialize handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
/// Server name advertised by the initialize handshake.
pub const SERVER_NAME: &str = "droidforge";
/// Header carrying client-supplied correlation identifiers.
pub const CLIENT_CORRELATION_HEADER: &str = "x-correlation-id";

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request transport context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<IpAddr>,
    /// Sanitized client correlation identifier when provided.
    pub client_correlation_id: Option<String>,
}

impl RequestContext {
    /// Builds a stdio request context.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
            client_correlation_id: None,
        }
    }

    /// Builds an HTTP request context.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>, client_correlation_id: Option<String>) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip,
            client_correlation_id,
        }
    }
}

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: DroidforgeConfig,
    /// Dispatcher over the frozen tool registry.
    dispatcher: Dispatcher,
    /// Generator for per-request server correlation identifiers.
    correlations: CorrelationIdGenerator,
    /// Audit sink for request events.
    audit: Arc<dyn McpAuditSink>,
    /// Metrics sink for request counters and latencies.
    metrics: Arc<dyn McpMetrics>,
}

impl McpServer {
    /// Builds a new MCP server from configuration and a frozen registry.
    ///
    /// The registry is built by the embedding application: catalog schemas
    /// paired with its handler implementations.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the configuration is invalid.
    pub fn from_config(
        config: DroidforgeConfig,
        registry: Arc<ToolRegistry>,
    ) -> Result<Self, McpServerError> {
        config.validate()?;
        Ok(Self {
            config,
            dispatcher: Dispatcher::new(registry),
            correlations: CorrelationIdGenerator::new(),
            audit: Arc::new(McpStderrAuditSink),
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Returns a server with a custom audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn McpAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns a server with a custom metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn McpMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport fails. A clean stdio
    /// EOF is a normal shutdown, not an error.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.config.server.transport {
            ServerTransport::Stdio => self.serve_stdio(),
            ServerTransport::Http => self.serve_http().await,
        }
    }

    // ------------------------------------------------------------------
    // Stdio transport
    // ------------------------------------------------------------------

    /// Serves JSON-RPC requests over stdin/stdout.
    fn serve_stdio(&self) -> Result<(), McpServerError> {
        let mut reader = BufReader::new(std::io::stdin());
        let mut writer = std::io::stdout();
        match self.config.server.framing {
            StdioFraming::Line => self.serve_stdio_lines(&mut reader, &mut writer),
            StdioFraming::ContentLength => self.serve_stdio_framed(&mut reader, &mut writer),
        }
    }

    /// Serves line-delimited JSON-RPC messages.
    fn serve_stdio_lines(
        &self,
        reader: &mut BufReader<impl Read>,
        writer: &mut impl Write,
    ) -> Result<(), McpServerError> {
        let context = RequestContext::stdio();
        loop {
            let mut line = String::new();
            let bytes = reader
                .read_line(&mut line)
                .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
            if bytes == 0 {
                return Ok(());
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some((_, response)) = self.handle_raw(&context, trimmed.as_bytes()) {
                write_line(writer, &response)?;
            }
        }
    }

    /// Serves Content-Length framed JSON-RPC messages.
    fn serve_stdio_framed(
        &self,
        reader: &mut BufReader<impl Read>,
        writer: &mut impl Write,
    ) -> Result<(), McpServerError> {
        let context = RequestContext::stdio();
        loop {
            let Some(bytes) = read_framed(reader, self.config.server.max_body_bytes)? else {
                return Ok(());
            };
            if let Some((_, response)) = self.handle_raw(&context, &bytes) {
                let payload = serde_json::to_vec(&response).map_err(|_| {
                    McpServerError::Transport("json-rpc serialization failed".to_string())
                })?;
                write_framed(writer, &payload)?;
            }
        }
    }

    // ------------------------------------------------------------------
    // HTTP transport
    // ------------------------------------------------------------------

    /// Serves JSON-RPC requests over HTTP.
    async fn serve_http(self) -> Result<(), McpServerError> {
        let bind = self
            .config
            .server
            .bind
            .clone()
            .ok_or_else(|| McpServerError::Transport("bind address required".to_string()))?;
        let addr: SocketAddr = bind
            .parse()
            .map_err(|_| McpServerError::Transport("invalid bind address".to_string()))?;
        let state = Arc::new(self);
        let app = Router::new().route("/rpc", post(handle_http)).with_state(state);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| McpServerError::Transport("http server failed".to_string()))
    }

    // ------------------------------------------------------------------
    // JSON-RPC handling
    // ------------------------------------------------------------------

    /// Handles a raw message: size check, parse, dispatch, audit.
    ///
    /// Returns `None` for notifications, which produce no response.
    pub fn handle_raw(
        &self,
        context: &RequestContext,
        bytes: &[u8],
    ) -> Option<(StatusCode, JsonRpcResponse)> {
        let started = Instant::now();
        let mut method = McpMethod::Invalid;
        let mut tool = None;
        let mut request_id = None;

        let response = if bytes.len() > self.config.server.max_body_bytes {
            Some((
                StatusCode::PAYLOAD_TOO_LARGE,
                error_response(Value::Null, -32070, "request body too large".to_string(), None),
            ))
        } else {
            match serde_json::from_slice::<JsonRpcRequest>(bytes) {
                Err(_) => Some((
                    StatusCode::BAD_REQUEST,
                    error_response(Value::Null, -32700, "parse error".to_string(), None),
                )),
                Ok(request) => {
                    method = McpMethod::classify(&request.method);
                    tool = extract_tool_name(&request);
                    request_id = request.id.as_ref().map(render_id);
                    self.handle_request(request)
                }
            }
        };

        self.emit(context, method, tool, request_id, bytes.len(), response.as_ref(), started);
        response
    }

    /// Dispatches a decoded JSON-RPC request.
    ///
    /// Returns `None` for notifications (requests without an `id`).
    fn handle_request(&self, request: JsonRpcRequest) -> Option<(StatusCode, JsonRpcResponse)> {
        let id = request.id?;
        if request.jsonrpc != "2.0" {
            return Some((
                StatusCode::BAD_REQUEST,
                error_response(id, -32600, "invalid json-rpc version".to_string(), None),
            ));
        }
        match request.method.as_str() {
            "initialize" => Some((StatusCode::OK, ok_response(id, initialize_result()))),
            "tools/list" => Some(self.handle_tools_list(id)),
            "tools/call" => Some(self.handle_tools_call(id, request.params)),
            other => Some((
                StatusCode::BAD_REQUEST,
                error_response(id, -32601, format!("method not found: {other}"), None),
            )),
        }
    }

    /// Handles a `tools/list` request.
    fn handle_tools_list(&self, id: Value) -> (StatusCode, JsonRpcResponse) {
        let tools: Vec<ToolDefinition> = self
            .dispatcher
            .registry()
            .schemas()
            .map(ToolDefinition::from_schema)
            .collect();
        match serde_json::to_value(ToolListResult {
            tools,
        }) {
            Ok(value) => (StatusCode::OK, ok_response(id, value)),
            Err(_) => (
                StatusCode::OK,
                error_response(id, -32060, "serialization failed".to_string(), None),
            ),
        }
    }

    /// Handles a `tools/call` request.
    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> (StatusCode, JsonRpcResponse) {
        let params = params.unwrap_or(Value::Null);
        let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
            return (
                StatusCode::BAD_REQUEST,
                error_response(id, -32602, "invalid tool call params".to_string(), None),
            );
        };
        let correlation_id = self.correlations.issue();
        let mut context = ToolContext::new(self.config.server.project_root.clone())
            .with_correlation_id(correlation_id);
        if let Some(request_id) = match &id {
            Value::Null => None,
            other => Some(render_id(other)),
        } {
            context = context.with_request_id(request_id);
        }
        let request =
            ToolRequest::new(id.clone(), &call.name, call.arguments.unwrap_or(Value::Null));
        let result = self.dispatcher.dispatch(request, &context);
        match result.outcome {
            ToolOutcome::Success {
                payload,
            } => {
                let content = ToolCallResult {
                    content: vec![ToolContent::Json {
                        json: payload,
                    }],
                };
                match serde_json::to_value(content) {
                    Ok(value) => (StatusCode::OK, ok_response(id, value)),
                    Err(_) => (
                        StatusCode::OK,
                        error_response(id, -32060, "serialization failed".to_string(), None),
                    ),
                }
            }
            ToolOutcome::Failure(failure) => tool_error_response(id, &failure),
        }
    }

    /// Emits audit and metric events for one handled message.
    #[allow(
        clippy::too_many_arguments,
        reason = "Trace fields are flat by design; bundling them hides nothing."
    )]
    fn emit(
        &self,
        context: &RequestContext,
        method: McpMethod,
        tool: Option<String>,
        request_id: Option<String>,
        request_bytes: usize,
        response: Option<&(StatusCode, JsonRpcResponse)>,
        started: Instant,
    ) {
        let (outcome, error_code) = response.map_or((McpOutcome::Ok, None), |(_, response)| {
            response
                .error
                .as_ref()
                .map_or((McpOutcome::Ok, None), |error| (McpOutcome::Error, Some(error.code)))
        });
        let response_bytes = response
            .and_then(|(_, response)| serde_json::to_vec(response).ok())
            .map_or(0, |payload| payload.len());
        let metric = McpMetricEvent {
            transport: context.transport,
            method,
            tool: tool.clone(),
            outcome,
            error_code,
            error_kind: error_code.map(error_kind_label),
            request_bytes,
            response_bytes,
        };
        self.metrics.record_request(&metric);
        self.metrics.record_latency(&metric, started.elapsed());
        self.audit.record(&McpAuditEvent {
            event: "mcp_request",
            timestamp_ms: timestamp_ms(),
            request_id,
            transport: context.transport,
            peer_ip: context.peer_ip.map(|ip| ip.to_string()),
            method,
            tool,
            outcome,
            error_code,
            error_kind: error_code.map(error_kind_label),
            client_correlation_id: context.client_correlation_id.clone(),
            request_bytes,
            response_bytes,
        });
    }
}

// ============================================================================
// SECTION: HTTP Handler
// ============================================================================

/// Handles HTTP JSON-RPC requests.
async fn handle_http(
    State(server): State<Arc<McpServer>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    let header = headers.get(CLIENT_CORRELATION_HEADER).and_then(|value| value.to_str().ok());
    let client_correlation_id = match sanitize_client_correlation_id(header) {
        Ok(value) => value,
        Err(rejection) => {
            let response = error_response(
                Value::Null,
                -32600,
                format!("invalid correlation id: {rejection}"),
                None,
            );
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::to_value(&response).unwrap_or(Value::Null)),
            );
        }
    };
    let context = RequestContext::http(Some(peer.ip()), client_correlation_id);
    let handled = run_blocking(|| server.handle_raw(&context, bytes.as_ref()));
    match handled {
        Some((status, response)) => {
            (status, axum::Json(serde_json::to_value(&response).unwrap_or(Value::Null)))
        }
        None => (StatusCode::ACCEPTED, axum::Json(Value::Null)),
    }
}

/// Runs a blocking closure, shifting off the async worker when possible.
fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

// ============================================================================
// SECTION: JSON-RPC Types
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    pub jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Optional parameters payload.
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    pub jsonrpc: &'static str,
    /// Request identifier.
    pub id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Structured error detail, such as validation violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments; absent means no arguments.
    #[serde(default)]
    arguments: Option<Value>,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions in insertion order.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// JSON tool output.
    Json {
        /// JSON payload.
        json: Value,
    },
}

// ============================================================================
// SECTION: Response Builders
// ============================================================================

/// Builds the initialize handshake result.
fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Builds a successful JSON-RPC response.
fn ok_response(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

/// Builds a JSON-RPC error response.
fn error_response(id: Value, code: i64, message: String, data: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
            data,
        }),
    }
}

/// Maps a dispatch failure onto a JSON-RPC error response.
fn tool_error_response(id: Value, failure: &ToolFailure) -> (StatusCode, JsonRpcResponse) {
    let (status, code, data) = match failure.kind {
        FailureKind::Validation => {
            let data = serde_json::to_value(&failure.violations)
                .map(|violations| json!({ "violations": violations }))
                .ok();
            (StatusCode::BAD_REQUEST, -32602, data)
        }
        FailureKind::ToolNotFound => (StatusCode::BAD_REQUEST, -32601, None),
        FailureKind::Handler => (StatusCode::OK, -32010, None),
        FailureKind::Internal => {
            let data = failure
                .correlation_id
                .as_ref()
                .map(|correlation_id| json!({ "correlation_id": correlation_id }));
            (StatusCode::OK, -32050, data)
        }
    };
    (status, error_response(id, code, failure.message.clone(), data))
}

/// Returns a stable error kind label for a JSON-RPC error code.
const fn error_kind_label(code: i64) -> &'static str {
    match code {
        -32700 => "parse_error",
        -32600 => "invalid_request",
        -32601 => "not_found",
        -32602 => "invalid_params",
        -32010 => "handler_error",
        -32050 => "internal_error",
        -32060 => "serialization_failed",
        -32070 => "body_too_large",
        _ => "other",
    }
}

/// Extracts the tool name from a tools/call request for trace labels.
fn extract_tool_name(request: &JsonRpcRequest) -> Option<String> {
    if request.method != "tools/call" {
        return None;
    }
    request
        .params
        .as_ref()
        .and_then(|params| params.get("name"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Renders an opaque request identifier for trace labels.
fn render_id(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Writes a JSON-RPC response as one line.
fn write_line(writer: &mut impl Write, response: &JsonRpcResponse) -> Result<(), McpServerError> {
    let payload = serde_json::to_vec(response)
        .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
    writer
        .write_all(&payload)
        .and_then(|()| writer.write_all(b"\n"))
        .and_then(|()| writer.flush())
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

/// Reads a framed stdio payload using MCP Content-Length headers.
///
/// Returns `Ok(None)` on a clean end-of-stream before any header.
fn read_framed(
    reader: &mut BufReader<impl Read>,
    max_body_bytes: usize,
) -> Result<Option<Vec<u8>>, McpServerError> {
    let mut content_length: Option<usize> = None;
    let mut saw_header = false;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            if saw_header {
                return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
            }
            return Ok(None);
        }
        if line.trim().is_empty() {
            if saw_header {
                break;
            }
            continue;
        }
        saw_header = true;
        if let Some(value) = line.strip_prefix("Content-Length:") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| McpServerError::Transport("invalid content length".to_string()))?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| McpServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        return Err(McpServerError::Transport("payload too large".to_string()));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(Some(buf))
}

/// Writes a framed stdio payload using MCP Content-Length headers.
fn write_framed(writer: &mut impl Write, payload: &[u8]) -> Result<(), McpServerError> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .and_then(|()| writer.write_all(payload))
        .and_then(|()| writer.flush())
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only framing assertions."
    )]

    use std::io::BufReader;
    use std::io::Cursor;

    use super::read_framed;
    use super::write_framed;

    #[test]
    fn read_framed_rejects_payload_over_limit() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = format!(
            "Content-Length: {}\r\n\r\n{}",
            payload.len(),
            String::from_utf8_lossy(payload)
        );
        let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
        let result = read_framed(&mut reader, payload.len() - 1);
        assert!(result.is_err());
    }

    #[test]
    fn read_framed_accepts_payload_at_limit() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = format!(
            "Content-Length: {}\r\n\r\n{}",
            payload.len(),
            String::from_utf8_lossy(payload)
        );
        let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
        let result = read_framed(&mut reader, payload.len());
        let bytes = result.expect("frame read").expect("frame present");
        assert_eq!(bytes, payload);
    }

    #[test]
    fn read_framed_reports_clean_eof() {
        let mut reader = BufReader::new(Cursor::new(Vec::new()));
        let result = read_framed(&mut reader, 1024).expect("clean eof");
        assert!(result.is_none());
    }

    #[test]
    fn read_framed_rejects_missing_content_length() {
        let framed = "X-Other: 1\r\n\r\n{}";
        let mut reader = BufReader::new(Cursor::new(framed.as_bytes().to_vec()));
        let result = read_framed(&mut reader, 1024);
        assert!(result.is_err());
    }

    #[test]
    fn write_framed_emits_content_length_header() {
        let mut output = Vec::new();
        write_framed(&mut output, b"{}").expect("write");
        let rendered = String::from_utf8(output).expect("utf8");
        assert!(rendered.starts_with("Content-Length: 2\r\n\r\n"));
        assert!(rendered.ends_with("{}"));
    }
}
