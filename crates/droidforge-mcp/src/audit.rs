// crates/droidforge-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for MCP request handling.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: droidforge-mcp::config, droidforge-mcp::telemetry, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for MCP request
//! logging. Events carry normalized labels and byte counts, never raw
//! request or response payloads, so the audit stream stays safe to ship to
//! shared logging pipelines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::ServerTransport;
use crate::telemetry::McpMethod;
use crate::telemetry::McpOutcome;

// ============================================================================
// SECTION: Events
// ============================================================================

/// MCP audit event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
/// - Payload contents are never included.
#[derive(Debug, Clone, Serialize)]
pub struct McpAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// JSON-RPC method classification.
    pub method: McpMethod,
    /// Tool name when available (tools/call).
    pub tool: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Sanitized client correlation identifier when provided.
    pub client_correlation_id: Option<String>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

/// Returns the current timestamp in milliseconds since the epoch.
#[must_use]
pub fn timestamp_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for MCP request events.
pub trait McpAuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: &McpAuditEvent);
}

/// Audit sink writing JSON lines to stderr.
///
/// # Invariants
/// - Write failures are swallowed; auditing never takes the server down.
pub struct McpStderrAuditSink;

impl McpAuditSink for McpStderrAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{line}");
        }
    }
}

/// Audit sink appending JSON lines to a file.
///
/// # Invariants
/// - Writes are serialized through an internal mutex.
pub struct McpFileAuditSink {
    /// Open append-only audit file.
    file: Mutex<File>,
}

impl McpFileAuditSink {
    /// Opens (or creates) the audit file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl McpAuditSink for McpFileAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(line) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Audit sink that discards events.
///
/// # Invariants
/// - Events are intentionally dropped.
pub struct McpNoopAuditSink;

impl McpAuditSink for McpNoopAuditSink {
    fn record(&self, _event: &McpAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::McpAuditEvent;
    use super::McpAuditSink;
    use super::McpFileAuditSink;
    use super::timestamp_ms;
    use crate::config::ServerTransport;
    use crate::telemetry::McpMethod;
    use crate::telemetry::McpOutcome;

    fn sample_event() -> McpAuditEvent {
        McpAuditEvent {
            event: "mcp_request",
            timestamp_ms: timestamp_ms(),
            request_id: Some("1".to_string()),
            transport: ServerTransport::Stdio,
            peer_ip: None,
            method: McpMethod::ToolsCall,
            tool: Some("gradle_build".to_string()),
            outcome: McpOutcome::Ok,
            error_code: None,
            error_kind: None,
            client_correlation_id: None,
            request_bytes: 120,
            response_bytes: 64,
        }
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = McpFileAuditSink::open(&path).unwrap();
        sink.record(&sample_event());
        sink.record(&sample_event());

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.get("event"), Some(&serde_json::json!("mcp_request")));
            assert_eq!(parsed.get("tool"), Some(&serde_json::json!("gradle_build")));
        }
    }

    #[test]
    fn events_never_serialize_payload_fields() {
        let serialized = serde_json::to_string(&sample_event()).unwrap();
        assert!(!serialized.contains("arguments"));
        assert!(!serialized.contains("payload"));
    }
}
