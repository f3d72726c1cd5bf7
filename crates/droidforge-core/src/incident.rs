// crates/droidforge-core/src/incident.rs
// ============================================================================
// Module: Incident Logging
// Description: Server-side records for unexpected dispatch failures.
// Purpose: Keep internal failure detail out of responses but findable in logs.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! When a handler fails in an unrecognized way, the caller receives only a
//! generic internal error plus a correlation identifier. The full detail is
//! written through an [`IncidentLog`] sink keyed by that identifier, so
//! operators can correlate a caller report with the server-side record. The
//! sink interface is dependency-light so deployments can route incidents to
//! their preferred logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use serde::Serialize;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Server-side record of an unexpected dispatch failure.
///
/// # Invariants
/// - `correlation_id` matches the identifier returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentRecord {
    /// Event identifier.
    pub event: &'static str,
    /// Correlation identifier shared with the caller.
    pub correlation_id: String,
    /// Tool whose handler failed.
    pub tool: String,
    /// Caller-supplied request identifier rendering, when available.
    pub request_id: Option<String>,
    /// Internal failure detail. Never sent to the caller.
    pub detail: String,
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink for internal incident records.
pub trait IncidentLog: Send + Sync {
    /// Records one incident.
    fn record(&self, incident: &IncidentRecord);
}

/// Incident sink writing JSON lines to stderr.
///
/// # Invariants
/// - Write failures are swallowed; incident logging never takes the server
///   down.
pub struct StderrIncidentLog;

impl IncidentLog for StderrIncidentLog {
    fn record(&self, incident: &IncidentRecord) {
        if let Ok(line) = serde_json::to_string(incident) {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{line}");
        }
    }
}

/// Incident sink that discards records.
///
/// # Invariants
/// - Records are intentionally dropped.
pub struct NoopIncidentLog;

impl IncidentLog for NoopIncidentLog {
    fn record(&self, _incident: &IncidentRecord) {}
}
