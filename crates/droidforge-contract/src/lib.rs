// crates/droidforge-contract/src/lib.rs
// ============================================================================
// Module: Droidforge Contract
// Description: Canonical tool surface for the Droidforge MCP server.
// Purpose: Provide the Android/Kotlin tool catalog and listing shapes.
// Dependencies: droidforge-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The contract crate declares the canonical Android/Kotlin development tool
//! surface as static, typed schemas. Handlers are supplied by the embedding
//! application; this crate holds only the declarations and the listing shape
//! MCP clients receive from `tools/list`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod types;

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

pub use catalog::catalog;
pub use types::ToolDefinition;
pub use types::ToolName;
