// crates/droidforge-core/src/registry.rs
// ============================================================================
// Module: Tool Registry
// Description: Name-keyed registry of tool schemas and handlers.
// Purpose: Hold the authoritative tool set and provide frozen lookups.
// Dependencies: droidforge-core::handler, droidforge-core::schema, thiserror
// ============================================================================

//! ## Overview
//! The registry is built once during single-threaded startup and frozen
//! before the first dispatch. [`ToolRegistryBuilder`] is the only mutable
//! surface; [`ToolRegistry`] exposes pure reads, so a frozen registry can be
//! shared across concurrent dispatches without locking.
//!
//! ## Invariants
//! - Tool names are unique; the first registration wins and duplicates fail.
//! - Listing order is insertion order and is stable across calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::handler::ToolHandler;
use crate::schema::SchemaError;
use crate::schema::ToolSchema;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Registered tool entry pairing a schema with its handler.
pub struct RegisteredTool {
    /// Validated tool schema.
    schema: ToolSchema,
    /// Handler invoked when the tool is dispatched.
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    /// Returns the tool schema.
    #[must_use]
    pub const fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    /// Returns the tool handler.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Mutable registry surface used during startup.
///
/// # Invariants
/// - Registration is single-threaded; the builder is consumed by
///   [`ToolRegistryBuilder::build`] before request handling begins.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    /// Entries in registration order.
    entries: Vec<RegisteredTool>,
    /// Name index into `entries`.
    index: HashMap<String, usize>,
}

impl ToolRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool schema with its handler.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] when the name is already
    /// registered (the existing entry is retained), or a schema error when
    /// the declaration is invalid.
    pub fn register(
        &mut self,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        schema.validate()?;
        if self.index.contains_key(&schema.name) {
            return Err(RegistryError::DuplicateTool(schema.name));
        }
        self.index.insert(schema.name.clone(), self.entries.len());
        self.entries.push(RegisteredTool {
            schema,
            handler,
        });
        Ok(())
    }

    /// Freezes the builder into an immutable registry.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            entries: self.entries,
            index: self.index,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable tool registry.
///
/// # Invariants
/// - Read-only after construction; safe for concurrent lookups.
pub struct ToolRegistry {
    /// Entries in registration order.
    entries: Vec<RegisteredTool>,
    /// Name index into `entries`.
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Looks up a registered tool by exact name.
    ///
    /// Exact-name contract: no fuzzy matching is attempted for near misses.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).and_then(|position| self.entries.get(*position))
    }

    /// Returns registered schemas in insertion order.
    pub fn schemas(&self) -> impl Iterator<Item = &ToolSchema> {
        self.entries.iter().map(RegisteredTool::schema)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry construction errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A tool name was registered twice.
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),
    /// The schema declaration is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
