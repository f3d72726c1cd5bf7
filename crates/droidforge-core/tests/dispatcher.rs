// crates/droidforge-core/tests/dispatcher.rs
// ============================================================================
// Module: Dispatcher Tests
// Description: Tests for request routing and failure normalization.
// Purpose: Ensure every request yields exactly one result with the correct
// failure taxonomy and no leaked internals.
// ============================================================================

//! ## Overview
//! Covers the dispatch contract: unknown tools never reach handlers, handler
//! messages pass through verbatim, panics become generic internal failures
//! with correlation identifiers, and normalized arguments reach handlers
//! with defaults applied.

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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use droidforge_core::Dispatcher;
use droidforge_core::FailureKind;
use droidforge_core::HandlerError;
use droidforge_core::IncidentLog;
use droidforge_core::IncidentRecord;
use droidforge_core::ParamType;
use droidforge_core::ParameterSpec;
use droidforge_core::ToolContext;
use droidforge_core::ToolHandler;
use droidforge_core::ToolOutcome;
use droidforge_core::ToolRegistryBuilder;
use droidforge_core::ToolRequest;
use droidforge_core::ToolSchema;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Handler echoing its normalized arguments back as the payload.
struct EchoHandler;

impl ToolHandler for EchoHandler {
    fn handle(
        &self,
        _context: &ToolContext,
        arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        Ok(Value::Object(arguments.clone()))
    }
}

/// Handler failing with a typed execution error.
struct FailingHandler;

impl ToolHandler for FailingHandler {
    fn handle(
        &self,
        _context: &ToolContext,
        _arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        Err(HandlerError::Execution {
            message: "gradle exited with status 1".to_string(),
            detail: Some("e: Unresolved reference: viewModel".to_string()),
        })
    }
}

/// Handler that panics with a secret-bearing message.
struct PanickingHandler;

impl ToolHandler for PanickingHandler {
    fn handle(
        &self,
        _context: &ToolContext,
        _arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        panic!("secret internal state: /etc/droidforge/token");
    }
}

/// Handler recording whether it was invoked.
struct TracingHandler(Arc<AtomicBool>);

impl ToolHandler for TracingHandler {
    fn handle(
        &self,
        _context: &ToolContext,
        _arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        self.0.store(true, Ordering::SeqCst);
        Ok(json!({"invoked": true}))
    }
}

/// Incident sink capturing records for assertions.
#[derive(Default)]
struct CapturingIncidentLog(Mutex<Vec<IncidentRecord>>);

impl IncidentLog for CapturingIncidentLog {
    fn record(&self, incident: &IncidentRecord) {
        if let Ok(mut records) = self.0.lock() {
            records.push(incident.clone());
        }
    }
}

fn build_schema() -> ToolSchema {
    ToolSchema::new(
        "gradle_build",
        "Build the project",
        vec![
            ParameterSpec::required("task", ParamType::String, "Gradle task"),
            ParameterSpec::optional("clean", ParamType::Boolean, "run clean first")
                .with_default(json!(false)),
        ],
    )
}

fn context() -> ToolContext {
    ToolContext::new("/workspace/project")
}

fn dispatcher_with(handler: Arc<dyn ToolHandler>) -> Dispatcher {
    let mut builder = ToolRegistryBuilder::new();
    builder.register(build_schema(), handler).unwrap();
    Dispatcher::new(Arc::new(builder.build()))
}

#[test]
fn valid_request_succeeds_with_normalized_arguments() {
    let dispatcher = dispatcher_with(Arc::new(EchoHandler));
    let request = ToolRequest::new(json!(1), "gradle_build", json!({"task": "test"}));
    let result = dispatcher.dispatch(request, &context());
    assert!(result.is_success());
    match result.outcome {
        ToolOutcome::Success {
            payload,
        } => {
            assert_eq!(payload.get("task"), Some(&json!("test")));
            assert_eq!(payload.get("clean"), Some(&json!(false)));
        }
        ToolOutcome::Failure(failure) => panic!("unexpected failure: {}", failure.message),
    }
}

#[test]
fn request_id_echoed_verbatim() {
    let dispatcher = dispatcher_with(Arc::new(EchoHandler));
    for request_id in [json!("req-7"), json!(42), Value::Null] {
        let request =
            ToolRequest::new(request_id.clone(), "gradle_build", json!({"task": "test"}));
        let result = dispatcher.dispatch(request, &context());
        assert_eq!(result.request_id, request_id);
    }
}

#[test]
fn unknown_tool_fails_without_invoking_any_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = dispatcher_with(Arc::new(TracingHandler(Arc::clone(&invoked))));
    let request = ToolRequest::new(json!(1), "nonexistent_tool", json!({}));
    let result = dispatcher.dispatch(request, &context());
    let failure = result.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::ToolNotFound);
    assert!(failure.message.contains("nonexistent_tool"));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[test]
fn invalid_arguments_fail_without_invoking_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = dispatcher_with(Arc::new(TracingHandler(Arc::clone(&invoked))));
    let request =
        ToolRequest::new(json!(1), "gradle_build", json!({"clean": "yes", "typo": true}));
    let result = dispatcher.dispatch(request, &context());
    let failure = result.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Validation);
    assert_eq!(failure.violations.len(), 3);
    assert!(!invoked.load(Ordering::SeqCst));
}

#[test]
fn valid_request_never_yields_caller_fault_failures() {
    let dispatcher = dispatcher_with(Arc::new(FailingHandler));
    let request = ToolRequest::new(json!(1), "gradle_build", json!({"task": "assembleDebug"}));
    let result = dispatcher.dispatch(request, &context());
    let failure = result.failure().unwrap();
    assert_ne!(failure.kind, FailureKind::Validation);
    assert_ne!(failure.kind, FailureKind::ToolNotFound);
}

#[test]
fn handler_error_message_preserved_verbatim() {
    let dispatcher = dispatcher_with(Arc::new(FailingHandler));
    let request = ToolRequest::new(json!(1), "gradle_build", json!({"task": "assembleDebug"}));
    let result = dispatcher.dispatch(request, &context());
    let failure = result.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Handler);
    assert!(failure.message.contains("gradle exited with status 1"));
    assert!(failure.message.contains("Unresolved reference: viewModel"));
    assert!(failure.correlation_id.is_none());
}

#[test]
fn handler_panic_becomes_generic_internal_failure() {
    let incidents = Arc::new(CapturingIncidentLog::default());
    let mut builder = ToolRegistryBuilder::new();
    builder.register(build_schema(), Arc::new(PanickingHandler)).unwrap();
    let sink: Arc<dyn IncidentLog> = incidents.clone();
    let dispatcher = Dispatcher::new(Arc::new(builder.build())).with_incident_log(sink);

    let request = ToolRequest::new(json!("req-9"), "gradle_build", json!({"task": "test"}));
    let result = dispatcher.dispatch(request, &context());
    let failure = result.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Internal);
    assert_eq!(failure.message, "internal error");
    assert!(!failure.message.contains("secret internal state"));
    let correlation_id = failure.correlation_id.clone().unwrap();

    let records = incidents.0.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correlation_id, correlation_id);
    assert_eq!(records[0].tool, "gradle_build");
    assert_eq!(records[0].request_id.as_deref(), Some("req-9"));
    assert!(records[0].detail.contains("secret internal state"));
}

#[test]
fn serialized_internal_failure_never_contains_panic_text() {
    let mut builder = ToolRegistryBuilder::new();
    builder.register(build_schema(), Arc::new(PanickingHandler)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(builder.build()))
        .with_incident_log(Arc::new(CapturingIncidentLog::default()));

    let request = ToolRequest::new(json!(3), "gradle_build", json!({"task": "test"}));
    let result = dispatcher.dispatch(request, &context());
    let serialized = serde_json::to_string(&result).unwrap();
    assert!(!serialized.contains("secret internal state"));
    assert!(serialized.contains("internal_error"));
}

#[test]
fn dispatch_after_panic_continues_serving() {
    let mut builder = ToolRegistryBuilder::new();
    builder.register(build_schema(), Arc::new(PanickingHandler)).unwrap();
    builder
        .register(
            ToolSchema::new("analyze_project", "Analyze the project", Vec::new()),
            Arc::new(EchoHandler),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(Arc::new(builder.build()))
        .with_incident_log(Arc::new(CapturingIncidentLog::default()));

    let panicked =
        dispatcher.dispatch(ToolRequest::new(json!(1), "gradle_build", json!({"task": "x"})), &context());
    assert_eq!(panicked.failure().unwrap().kind, FailureKind::Internal);

    let healthy =
        dispatcher.dispatch(ToolRequest::new(json!(2), "analyze_project", json!({})), &context());
    assert!(healthy.is_success());
}

#[test]
fn internal_correlation_ids_are_unique_per_failure() {
    let mut builder = ToolRegistryBuilder::new();
    builder.register(build_schema(), Arc::new(PanickingHandler)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(builder.build()))
        .with_incident_log(Arc::new(CapturingIncidentLog::default()));

    let first = dispatcher
        .dispatch(ToolRequest::new(json!(1), "gradle_build", json!({"task": "x"})), &context());
    let second = dispatcher
        .dispatch(ToolRequest::new(json!(2), "gradle_build", json!({"task": "x"})), &context());
    let first_id = first.failure().unwrap().correlation_id.clone().unwrap();
    let second_id = second.failure().unwrap().correlation_id.clone().unwrap();
    assert_ne!(first_id, second_id);
}
