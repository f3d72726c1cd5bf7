// crates/droidforge-mcp/src/lib.rs
// ============================================================================
// Module: Droidforge MCP
// Description: MCP server for the Droidforge tool registry.
// Purpose: Expose registered tools via JSON-RPC 2.0 over stdio and HTTP.
// Dependencies: droidforge-core, droidforge-contract, axum, tokio
// ============================================================================

//! ## Overview
//! Droidforge MCP frames JSON-RPC 2.0 messages over stdio or HTTP and routes
//! every tool call through the core dispatcher. The embedding application
//! builds the registry (catalog schemas plus its handlers) and hands it to
//! [`McpServer::from_config`]; everything transport-facing lives here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod server;
pub mod telemetry;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::McpAuditEvent;
pub use audit::McpAuditSink;
pub use audit::McpFileAuditSink;
pub use audit::McpNoopAuditSink;
pub use audit::McpStderrAuditSink;
pub use config::ConfigError;
pub use config::DroidforgeConfig;
pub use config::ServerConfig;
pub use config::ServerTransport;
pub use config::StdioFraming;
pub use server::McpServer;
pub use server::McpServerError;
pub use server::RequestContext;
pub use telemetry::MCP_LATENCY_BUCKETS_MS;
pub use telemetry::McpMethod;
pub use telemetry::McpMetricEvent;
pub use telemetry::McpMetrics;
pub use telemetry::McpOutcome;
pub use telemetry::NoopMetrics;
