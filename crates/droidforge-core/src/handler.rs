// crates/droidforge-core/src/handler.rs
// ============================================================================
// Module: Tool Handlers
// Description: Handler trait and failure taxonomy for tool implementations.
// Purpose: Define the contract between the dispatcher and external handlers.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Handlers are the external collaborators behind each registered tool: file
//! scaffolding, build-tool invocation, AI backends. The dispatcher treats
//! them uniformly as black boxes that accept validated arguments and either
//! return a payload or raise a typed [`HandlerError`]. Retry policy is the
//! handler's own concern; the dispatcher never retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::context::ToolContext;

// ============================================================================
// SECTION: Handler Trait
// ============================================================================

/// Implementation behind a registered tool.
///
/// # Invariants
/// - `handle` receives arguments that already passed schema validation, with
///   defaults injected.
/// - Implementations must be safe to call from concurrent dispatches.
pub trait ToolHandler: Send + Sync {
    /// Executes the tool with normalized arguments.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when execution fails; the message is
    /// preserved verbatim in the dispatch response.
    fn handle(
        &self,
        context: &ToolContext,
        arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError>;
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Typed failures raised by tool handlers.
///
/// # Invariants
/// - Messages are caller-safe: handlers must not embed secrets or internal
///   paths outside the project root.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request was valid but violates a handler precondition, such as a
    /// path escaping the project root.
    #[error("rejected: {0}")]
    Rejected(String),
    /// Execution failed, such as a subprocess exiting non-zero.
    #[error("execution failed: {message}")]
    Execution {
        /// Summary of the failure.
        message: String,
        /// Captured diagnostic output, such as stderr.
        detail: Option<String>,
    },
    /// A backing service was unreachable, such as an AI backend.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl HandlerError {
    /// Builds an execution failure without captured diagnostics.
    #[must_use]
    pub fn execution(message: &str) -> Self {
        Self::Execution {
            message: message.to_string(),
            detail: None,
        }
    }

    /// Returns the captured diagnostic output when present.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Execution {
                detail, ..
            } => detail.as_deref(),
            _ => None,
        }
    }
}
