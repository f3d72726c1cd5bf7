// crates/droidforge-core/src/dispatch.rs
// ============================================================================
// Module: Dispatcher
// Description: Routes validated tool requests to handlers.
// Purpose: Normalize every outcome into a stable result taxonomy.
// Dependencies: droidforge-core::registry, droidforge-core::validate, serde
// ============================================================================

//! ## Overview
//! The dispatcher is the single entry point from the transport layer. Each
//! request moves linearly through lookup, validation, and handler invocation,
//! and always produces exactly one [`ToolResult`]. No failure crosses the
//! dispatch boundary raw: handler errors keep their message, unexpected
//! panics are logged server-side and surfaced as a generic internal failure
//! with a correlation identifier. The dispatcher performs no retries and
//! holds no per-request state between calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::context::ToolContext;
use crate::correlation::CorrelationIdGenerator;
use crate::handler::ToolHandler;
use crate::incident::IncidentLog;
use crate::incident::IncidentRecord;
use crate::incident::StderrIncidentLog;
use crate::registry::ToolRegistry;
use crate::validate::ValidationFailure;
use crate::validate::Violation;
use crate::validate::validate_payload;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// One incoming tool invocation.
///
/// # Invariants
/// - `request_id` is opaque: it is echoed back verbatim and never
///   interpreted.
/// - Consumed by exactly one [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Caller-supplied correlation token, echoed in the result.
    pub request_id: Value,
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// Raw, unvalidated argument payload.
    pub arguments: Value,
}

impl ToolRequest {
    /// Creates a tool request.
    #[must_use]
    pub fn new(request_id: Value, tool_name: &str, arguments: Value) -> Self {
        Self {
            request_id,
            tool_name: tool_name.to_string(),
            arguments,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Failure classification surfaced to callers.
///
/// # Invariants
/// - Variants are stable: callers branch on them to distinguish their own
///   mistakes from execution and server faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The arguments did not satisfy the tool schema.
    Validation,
    /// The tool name is not registered.
    ToolNotFound,
    /// The handler reported a typed execution failure.
    Handler,
    /// The handler failed unexpectedly; detail is server-side only.
    Internal,
}

impl FailureKind {
    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::ToolNotFound => "tool_not_found",
            Self::Handler => "handler_error",
            Self::Internal => "internal_error",
        }
    }
}

/// Failure payload for a dispatched request.
///
/// # Invariants
/// - `violations` is populated exactly for [`FailureKind::Validation`].
/// - `correlation_id` is populated exactly for [`FailureKind::Internal`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolFailure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Caller-safe failure message.
    pub message: String,
    /// Complete violation list for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Correlation identifier for internal failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Outcome of a dispatched request.
///
/// # Invariants
/// - Exactly one variant per request; there is no partial outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// Handler completed and produced a payload.
    Success {
        /// Structured payload returned by the handler.
        payload: Value,
    },
    /// The request failed before or during handler execution.
    Failure(ToolFailure),
}

/// Result of one dispatched request.
///
/// # Invariants
/// - `request_id` is copied verbatim from the originating request.
/// - Every [`ToolRequest`] produces exactly one result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// Correlation token echoed from the request.
    pub request_id: Value,
    /// Success or failure outcome.
    pub outcome: ToolOutcome,
}

impl ToolResult {
    /// Returns true for successful outcomes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    /// Returns the failure payload when the outcome is a failure.
    #[must_use]
    pub const fn failure(&self) -> Option<&ToolFailure> {
        match &self.outcome {
            ToolOutcome::Failure(failure) => Some(failure),
            ToolOutcome::Success { .. } => None,
        }
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Routes tool requests through lookup, validation, and handler invocation.
///
/// # Invariants
/// - The registry is frozen before the dispatcher is constructed.
/// - `dispatch` is a blocking call; any waiting happens inside handlers.
pub struct Dispatcher {
    /// Frozen tool registry.
    registry: Arc<ToolRegistry>,
    /// Generator for internal-failure correlation identifiers.
    correlations: CorrelationIdGenerator,
    /// Sink for server-side incident records.
    incidents: Arc<dyn IncidentLog>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    ///
    /// Incidents are written to stderr by default.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            correlations: CorrelationIdGenerator::new(),
            incidents: Arc::new(StderrIncidentLog),
        }
    }

    /// Returns a dispatcher with a custom incident sink.
    #[must_use]
    pub fn with_incident_log(mut self, incidents: Arc<dyn IncidentLog>) -> Self {
        self.incidents = incidents;
        self
    }

    /// Returns the frozen registry backing this dispatcher.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatches one request to completion.
    ///
    /// Unknown tools never reach a handler. Validation failures enumerate
    /// every violation. Handler messages pass through verbatim; unexpected
    /// handler panics become a generic internal failure whose detail is
    /// logged server-side under the returned correlation identifier.
    #[must_use]
    pub fn dispatch(&self, request: ToolRequest, context: &ToolContext) -> ToolResult {
        let Some(entry) = self.registry.lookup(&request.tool_name) else {
            return ToolResult {
                request_id: request.request_id,
                outcome: ToolOutcome::Failure(ToolFailure {
                    kind: FailureKind::ToolNotFound,
                    message: format!("unknown tool: {}", request.tool_name),
                    violations: Vec::new(),
                    correlation_id: None,
                }),
            };
        };
        let arguments = match validate_payload(entry.schema(), &request.arguments) {
            Ok(arguments) => arguments,
            Err(failure) => {
                return ToolResult {
                    request_id: request.request_id,
                    outcome: ToolOutcome::Failure(validation_failure(failure)),
                };
            }
        };
        let handler = Arc::clone(entry.handler());
        let outcome =
            self.invoke(handler, &request.tool_name, &request.request_id, context, &arguments);
        ToolResult {
            request_id: request.request_id,
            outcome,
        }
    }

    /// Invokes the handler with panic containment.
    fn invoke(
        &self,
        handler: Arc<dyn ToolHandler>,
        tool_name: &str,
        request_id: &Value,
        context: &ToolContext,
        arguments: &Map<String, Value>,
    ) -> ToolOutcome {
        let invocation =
            panic::catch_unwind(AssertUnwindSafe(|| handler.handle(context, arguments)));
        match invocation {
            Ok(Ok(payload)) => ToolOutcome::Success {
                payload,
            },
            Ok(Err(error)) => {
                let mut message = error.to_string();
                if let Some(detail) = error.detail() {
                    message.push_str(": ");
                    message.push_str(detail);
                }
                ToolOutcome::Failure(ToolFailure {
                    kind: FailureKind::Handler,
                    message,
                    violations: Vec::new(),
                    correlation_id: None,
                })
            }
            Err(payload) => {
                let correlation_id = self.correlations.issue();
                self.incidents.record(&IncidentRecord {
                    event: "dispatch_internal_error",
                    correlation_id: correlation_id.clone(),
                    tool: tool_name.to_string(),
                    request_id: render_request_id(request_id),
                    detail: panic_detail(payload.as_ref()),
                });
                ToolOutcome::Failure(ToolFailure {
                    kind: FailureKind::Internal,
                    message: "internal error".to_string(),
                    violations: Vec::new(),
                    correlation_id: Some(correlation_id),
                })
            }
        }
    }
}

/// Builds the failure payload for a validation failure.
fn validation_failure(failure: ValidationFailure) -> ToolFailure {
    ToolFailure {
        kind: FailureKind::Validation,
        message: failure.to_string(),
        violations: failure.violations,
        correlation_id: None,
    }
}

/// Renders an opaque request identifier for logging.
fn render_request_id(request_id: &Value) -> Option<String> {
    match request_id {
        Value::Null => None,
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

/// Extracts a loggable detail string from a panic payload.
fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
