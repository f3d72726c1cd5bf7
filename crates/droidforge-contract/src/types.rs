// crates/droidforge-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Tool names and listing shapes for the Droidforge contract.
// Purpose: Provide stable identifiers and the MCP tool listing payload.
// Dependencies: droidforge-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Tool names are part of the external contract surface: callers address
//! tools by these exact strings and no fuzzy matching is attempted. The
//! listing shape mirrors the MCP `tools/list` wire format.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use droidforge_core::ToolSchema;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Canonical tool names for the Droidforge catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Build the project with Gradle.
    GradleBuild,
    /// Run unit or instrumented tests.
    RunTests,
    /// Run a static analysis tool.
    RunLint,
    /// Format Kotlin sources.
    FormatCode,
    /// Create a Kotlin source file from a template.
    CreateKotlinFile,
    /// Create an Android layout XML file.
    CreateLayoutFile,
    /// Create a Jetpack Compose component.
    CreateComposeComponent,
    /// Analyze project structure, dependencies, or manifest.
    AnalyzeProject,
    /// Generate project documentation.
    GenerateDocs,
    /// Query an LLM backend for code assistance.
    QueryLlm,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GradleBuild => "gradle_build",
            Self::RunTests => "run_tests",
            Self::RunLint => "run_lint",
            Self::FormatCode => "format_code",
            Self::CreateKotlinFile => "create_kotlin_file",
            Self::CreateLayoutFile => "create_layout_file",
            Self::CreateComposeComponent => "create_compose_component",
            Self::AnalyzeProject => "analyze_project",
            Self::GenerateDocs => "generate_docs",
            Self::QueryLlm => "query_llm",
        }
    }

    /// Parses a canonical tool name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tool| tool.as_str() == name)
    }

    /// Returns all catalog tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GradleBuild,
            Self::RunTests,
            Self::RunLint,
            Self::FormatCode,
            Self::CreateKotlinFile,
            Self::CreateLayoutFile,
            Self::CreateComposeComponent,
            Self::AnalyzeProject,
            Self::GenerateDocs,
            Self::QueryLlm,
        ]
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Listing Shape
// ============================================================================

/// Tool definition shape used by MCP tool listings.
///
/// # Invariants
/// - `input_schema` is the JSON Schema document rendered from the typed tool
///   schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name as addressed by callers.
    pub name: String,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Builds the listing shape for a tool schema.
    #[must_use]
    pub fn from_schema(schema: &ToolSchema) -> Self {
        Self {
            name: schema.name.clone(),
            description: schema.description.clone(),
            input_schema: schema.input_schema(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
