// crates/droidforge-contract/src/catalog.rs
// ============================================================================
// Module: Tool Catalog
// Description: Canonical Android/Kotlin tool schemas for Droidforge.
// Purpose: Declare the tool surface once, data-driven, validated at startup.
// Dependencies: droidforge-core, serde_json
// ============================================================================

//! ## Overview
//! Each catalog entry is a static schema declaration: the parameters a tool
//! accepts, their defaults, and their enumerations. The embedding application
//! pairs these schemas with its handler implementations when building the
//! registry; nothing here executes anything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use droidforge_core::ParamType;
use droidforge_core::ParameterSpec;
use droidforge_core::ToolSchema;
use serde_json::json;

use crate::types::ToolName;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the canonical tool catalog.
///
/// The order is intentional: it matches [`ToolName::all`] and is preserved in
/// `tools/list` responses to keep listings stable across releases. Append new
/// tools at the end.
#[must_use]
pub fn catalog() -> Vec<ToolSchema> {
    vec![
        gradle_build(),
        run_tests(),
        run_lint(),
        format_code(),
        create_kotlin_file(),
        create_layout_file(),
        create_compose_component(),
        analyze_project(),
        generate_docs(),
        query_llm(),
    ]
}

/// Builds the schema for `gradle_build`.
#[must_use]
pub fn gradle_build() -> ToolSchema {
    ToolSchema::new(
        ToolName::GradleBuild.as_str(),
        "Build the Android project with Gradle. Supports standard Gradle tasks including \
         compilation, packaging, and testing.",
        vec![
            ParameterSpec::optional(
                "task",
                ParamType::String,
                "Gradle task to execute (e.g. 'assembleDebug', 'assembleRelease', 'test')",
            )
            .with_default(json!("assembleDebug")),
            ParameterSpec::optional(
                "clean",
                ParamType::Boolean,
                "Run the 'clean' task first to ensure a fresh build",
            )
            .with_default(json!(false)),
        ],
    )
}

/// Builds the schema for `run_tests`.
#[must_use]
pub fn run_tests() -> ToolSchema {
    ToolSchema::new(
        ToolName::RunTests.as_str(),
        "Run Android tests: 'unit' for JVM tests, 'instrumented' for device tests, 'all' for \
         both.",
        vec![ParameterSpec::enumeration(
            "test_type",
            "Type of tests to run",
            &["unit", "instrumented", "all"],
            Some("unit"),
        )],
    )
}

/// Builds the schema for `run_lint`.
#[must_use]
pub fn run_lint() -> ToolSchema {
    ToolSchema::new(
        ToolName::RunLint.as_str(),
        "Run a static analysis tool over the project sources.",
        vec![ParameterSpec::enumeration(
            "lint_tool",
            "Lint tool to run",
            &["detekt", "ktlint", "android_lint"],
            Some("detekt"),
        )],
    )
}

/// Builds the schema for `format_code`.
#[must_use]
pub fn format_code() -> ToolSchema {
    ToolSchema::new(
        ToolName::FormatCode.as_str(),
        "Format Kotlin sources using ktlint.",
        Vec::new(),
    )
}

/// Builds the schema for `create_kotlin_file`.
#[must_use]
pub fn create_kotlin_file() -> ToolSchema {
    ToolSchema::new(
        ToolName::CreateKotlinFile.as_str(),
        "Create a new Kotlin file from a class template.",
        vec![
            ParameterSpec::required(
                "file_path",
                ParamType::String,
                "Path for the new file, relative to the project root",
            ),
            ParameterSpec::required("package_name", ParamType::String, "Kotlin package name"),
            ParameterSpec::required("class_name", ParamType::String, "Class name"),
            ParameterSpec::enumeration(
                "class_type",
                "Kind of declaration to generate",
                &["activity", "fragment", "class", "data_class", "interface"],
                Some("class"),
            ),
        ],
    )
}

/// Builds the schema for `create_layout_file`.
#[must_use]
pub fn create_layout_file() -> ToolSchema {
    ToolSchema::new(
        ToolName::CreateLayoutFile.as_str(),
        "Create a new Android layout XML file.",
        vec![
            ParameterSpec::required(
                "layout_name",
                ParamType::String,
                "Layout file name without the .xml extension",
            ),
            ParameterSpec::enumeration(
                "layout_type",
                "Layout template to use",
                &["activity", "fragment", "item", "custom"],
                Some("activity"),
            ),
        ],
    )
}

/// Builds the schema for `create_compose_component`.
#[must_use]
pub fn create_compose_component() -> ToolSchema {
    ToolSchema::new(
        ToolName::CreateComposeComponent.as_str(),
        "Create a Jetpack Compose UI component.",
        vec![
            ParameterSpec::required(
                "file_path",
                ParamType::String,
                "Path for the Compose file, relative to the project root",
            ),
            ParameterSpec::required(
                "component_name",
                ParamType::String,
                "Name of the Compose component",
            ),
            ParameterSpec::required("package_name", ParamType::String, "Kotlin package name"),
            ParameterSpec::enumeration(
                "component_type",
                "Kind of component to generate",
                &["screen", "component", "dialog", "bottom_sheet"],
                Some("component"),
            ),
            ParameterSpec::optional(
                "uses_state",
                ParamType::Boolean,
                "Include state management scaffolding",
            )
            .with_default(json!(false)),
            ParameterSpec::optional(
                "uses_navigation",
                ParamType::Boolean,
                "Include navigation scaffolding",
            )
            .with_default(json!(false)),
        ],
    )
}

/// Builds the schema for `analyze_project`.
#[must_use]
pub fn analyze_project() -> ToolSchema {
    ToolSchema::new(
        ToolName::AnalyzeProject.as_str(),
        "Analyze the Android project structure, dependencies, or manifest.",
        vec![ParameterSpec::enumeration(
            "analysis_type",
            "Analysis to perform",
            &["structure", "dependencies", "manifest", "all"],
            Some("all"),
        )],
    )
}

/// Builds the schema for `generate_docs`.
#[must_use]
pub fn generate_docs() -> ToolSchema {
    ToolSchema::new(
        ToolName::GenerateDocs.as_str(),
        "Generate project documentation with Dokka.",
        vec![ParameterSpec::enumeration(
            "doc_type",
            "Documentation format",
            &["html", "javadoc"],
            Some("html"),
        )],
    )
}

/// Builds the schema for `query_llm`.
#[must_use]
pub fn query_llm() -> ToolSchema {
    ToolSchema::new(
        ToolName::QueryLlm.as_str(),
        "Query an LLM backend for code assistance.",
        vec![
            ParameterSpec::required("prompt", ParamType::String, "Prompt for the LLM"),
            ParameterSpec::enumeration(
                "llm_provider",
                "Backend to query",
                &["openai", "anthropic", "local"],
                Some("local"),
            ),
            ParameterSpec::optional("model", ParamType::String, "Specific model to use"),
            ParameterSpec::optional("max_tokens", ParamType::Integer, "Response token budget")
                .with_default(json!(1000)),
            ParameterSpec::optional(
                "context_files",
                ParamType::StringArray,
                "Project files to include as context, relative to the project root",
            ),
            ParameterSpec::optional(
                "privacy_mode",
                ParamType::Boolean,
                "Use privacy-preserving mode",
            )
            .with_default(json!(true)),
        ],
    )
}
