// crates/droidforge-core/tests/registry.rs
// ============================================================================
// Module: Registry Tests
// Description: Tests for tool registration, lookup, and listing order.
// Purpose: Ensure the frozen registry honors its uniqueness and ordering
// invariants.
// ============================================================================

//! ## Overview
//! Covers duplicate rejection, exact-name lookup, deterministic listing, and
//! concurrent reads against a frozen registry.

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

use droidforge_core::HandlerError;
use droidforge_core::ParamType;
use droidforge_core::ParameterSpec;
use droidforge_core::RegistryError;
use droidforge_core::ToolContext;
use droidforge_core::ToolHandler;
use droidforge_core::ToolRegistry;
use droidforge_core::ToolRegistryBuilder;
use droidforge_core::ToolSchema;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Handler returning a fixed payload.
struct StaticHandler(Value);

impl ToolHandler for StaticHandler {
    fn handle(
        &self,
        _context: &ToolContext,
        _arguments: &Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        Ok(self.0.clone())
    }
}

fn schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema::new(
        name,
        description,
        vec![
            ParameterSpec::optional("task", ParamType::String, "task name")
                .with_default(json!("assembleDebug")),
        ],
    )
}

fn sample_registry() -> ToolRegistry {
    let mut builder = ToolRegistryBuilder::new();
    for name in ["gradle_build", "run_tests", "run_lint", "analyze_project"] {
        builder
            .register(schema(name, "sample tool"), Arc::new(StaticHandler(json!({"tool": name}))))
            .unwrap();
    }
    builder.build()
}

#[test]
fn lookup_finds_registered_tool() {
    let registry = sample_registry();
    let entry = registry.lookup("run_lint").unwrap();
    assert_eq!(entry.schema().name, "run_lint");
}

#[test]
fn lookup_is_exact_name_only() {
    let registry = sample_registry();
    assert!(registry.lookup("run_lin").is_none());
    assert!(registry.lookup("RUN_LINT").is_none());
    assert!(registry.lookup("run_lint ").is_none());
}

#[test]
fn duplicate_registration_rejected_and_first_retained() {
    let mut builder = ToolRegistryBuilder::new();
    builder
        .register(schema("gradle_build", "first"), Arc::new(StaticHandler(json!(1))))
        .unwrap();
    let error = builder
        .register(schema("gradle_build", "second"), Arc::new(StaticHandler(json!(2))))
        .unwrap_err();
    assert!(matches!(error, RegistryError::DuplicateTool(name) if name == "gradle_build"));

    let registry = builder.build();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("gradle_build").unwrap().schema().description, "first");
}

#[test]
fn invalid_schema_rejected_at_registration() {
    let mut builder = ToolRegistryBuilder::new();
    let invalid = ToolSchema::new(
        "bad",
        "invalid tool",
        vec![ParameterSpec::required("path", ParamType::String, "path").with_default(json!("x"))],
    );
    let error = builder.register(invalid, Arc::new(StaticHandler(json!(null)))).unwrap_err();
    assert!(matches!(error, RegistryError::Schema(_)));
    assert!(builder.build().is_empty());
}

#[test]
fn listing_preserves_insertion_order() {
    let registry = sample_registry();
    let names: Vec<&str> = registry.schemas().map(|schema| schema.name.as_str()).collect();
    assert_eq!(names, vec!["gradle_build", "run_tests", "run_lint", "analyze_project"]);
}

#[test]
fn listing_is_stable_across_calls() {
    let registry = sample_registry();
    let first: Vec<String> = registry.schemas().map(|schema| schema.name.clone()).collect();
    let second: Vec<String> = registry.schemas().map(|schema| schema.name.clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn concurrent_lookups_are_consistent() {
    let registry = Arc::new(sample_registry());
    let mut workers = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        workers.push(std::thread::spawn(move || {
            for _ in 0..1_000 {
                assert!(registry.lookup("gradle_build").is_some());
                assert!(registry.lookup("missing_tool").is_none());
                assert_eq!(registry.len(), 4);
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }
}
