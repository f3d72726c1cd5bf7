// crates/droidforge-core/src/lib.rs
// ============================================================================
// Module: Droidforge Core
// Description: Tool registry, argument validation, and dispatch for Droidforge.
// Purpose: Provide the schema-driven routing layer behind the MCP server.
// Dependencies: serde, serde_json, thiserror, rand
// ============================================================================

//! ## Overview
//! Droidforge core holds the authoritative tool registry and routes validated
//! tool requests to handler implementations. Handlers are external
//! collaborators supplied by the embedding application; this crate owns the
//! schema model, the validator, and the dispatch boundary where every failure
//! is normalized into a stable taxonomy.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod correlation;
pub mod dispatch;
pub mod handler;
pub mod incident;
pub mod registry;
pub mod schema;
pub mod validate;

#[cfg(test)]
mod tests {
    //! Test-only lint relaxations for panic-based assertions and debug output.
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
        reason = "Test-only output and panic-based assertions are permitted."
    )]
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::ContextError;
pub use context::ToolContext;
pub use correlation::CorrelationIdGenerator;
pub use correlation::CorrelationIdRejection;
pub use correlation::sanitize_client_correlation_id;
pub use dispatch::Dispatcher;
pub use dispatch::FailureKind;
pub use dispatch::ToolFailure;
pub use dispatch::ToolOutcome;
pub use dispatch::ToolRequest;
pub use dispatch::ToolResult;
pub use handler::HandlerError;
pub use handler::ToolHandler;
pub use incident::IncidentLog;
pub use incident::IncidentRecord;
pub use incident::NoopIncidentLog;
pub use incident::StderrIncidentLog;
pub use registry::RegisteredTool;
pub use registry::RegistryError;
pub use registry::ToolRegistry;
pub use registry::ToolRegistryBuilder;
pub use schema::ParamType;
pub use schema::ParameterSpec;
pub use schema::SchemaError;
pub use schema::ToolSchema;
pub use validate::ValidationFailure;
pub use validate::Violation;
pub use validate::validate_arguments;
pub use validate::validate_payload;
