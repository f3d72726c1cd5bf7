// crates/droidforge-core/src/correlation.rs
// ============================================================================
// Module: Correlation IDs
// Description: Server correlation ID generation and client ID sanitization.
// Purpose: Tie internal failure logs to caller-visible references.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Internal errors never expose their detail to callers; instead the server
//! issues a correlation identifier that appears both in the response and in
//! the server-side incident log. Identifiers combine a boot-scoped random
//! seed with a monotonic counter, so they are unique per process without
//! coordination. Client-supplied correlation headers are untrusted and pass
//! through a strict token sanitizer before use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::RngCore;
use rand::rngs::OsRng;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default prefix for server-issued correlation identifiers.
pub const DEFAULT_CORRELATION_PREFIX: &str = "dfg";
/// Maximum accepted length for client correlation identifiers.
pub const MAX_CLIENT_CORRELATION_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Boot-scoped correlation identifier generator.
///
/// # Invariants
/// - Issued identifiers are unique within the process lifetime.
#[derive(Debug)]
pub struct CorrelationIdGenerator {
    /// Prefix included in every issued identifier.
    prefix: &'static str,
    /// Random seed drawn once per process.
    boot_seed: u64,
    /// Monotonic counter of issued identifiers.
    counter: AtomicU64,
}

impl CorrelationIdGenerator {
    /// Creates a generator with the default prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_CORRELATION_PREFIX)
    }

    /// Creates a generator with a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: &'static str) -> Self {
        let mut seed = [0u8; 8];
        OsRng.fill_bytes(&mut seed);
        Self {
            prefix,
            boot_seed: u64::from_be_bytes(seed),
            counter: AtomicU64::new(1),
        }
    }

    /// Issues the next correlation identifier.
    #[must_use]
    pub fn issue(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:016x}-{:08x}", self.prefix, self.boot_seed, sequence)
    }
}

impl Default for CorrelationIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Client Sanitization
// ============================================================================

/// Typed rejection reasons for client correlation identifiers.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationIdRejection {
    /// Value was empty after trimming.
    Empty,
    /// Value exceeded [`MAX_CLIENT_CORRELATION_ID_LENGTH`].
    TooLong,
    /// Value contained characters outside the strict token charset.
    DisallowedCharacter,
}

impl CorrelationIdRejection {
    /// Returns a stable label for this rejection reason.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::DisallowedCharacter => "disallowed_character",
        }
    }
}

impl fmt::Display for CorrelationIdRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sanitizes a client-supplied correlation identifier.
///
/// Returns `Ok(None)` when no value was supplied. Accepted identifiers are
/// restricted to ASCII token characters so they can be logged and echoed
/// without escaping.
///
/// # Errors
///
/// Returns [`CorrelationIdRejection`] when the value is empty, too long, or
/// contains a disallowed character.
pub fn sanitize_client_correlation_id(
    value: Option<&str>,
) -> Result<Option<String>, CorrelationIdRejection> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CorrelationIdRejection::Empty);
    }
    if trimmed.len() > MAX_CLIENT_CORRELATION_ID_LENGTH {
        return Err(CorrelationIdRejection::TooLong);
    }
    if !trimmed.chars().all(is_token_char) {
        return Err(CorrelationIdRejection::DisallowedCharacter);
    }
    Ok(Some(trimmed.to_string()))
}

/// Returns true for characters allowed in correlation identifiers.
const fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':')
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use std::collections::HashSet;

    use super::CorrelationIdGenerator;
    use super::CorrelationIdRejection;
    use super::MAX_CLIENT_CORRELATION_ID_LENGTH;
    use super::sanitize_client_correlation_id;

    #[test]
    fn issued_identifiers_are_unique() {
        let generator = CorrelationIdGenerator::new();
        let issued: HashSet<String> = (0..64).map(|_| generator.issue()).collect();
        assert_eq!(issued.len(), 64);
    }

    #[test]
    fn issued_identifiers_carry_prefix() {
        let generator = CorrelationIdGenerator::with_prefix("test");
        assert!(generator.issue().starts_with("test-"));
    }

    #[test]
    fn sanitize_accepts_token_values() {
        let sanitized = sanitize_client_correlation_id(Some(" req-42.a:b ")).unwrap();
        assert_eq!(sanitized.as_deref(), Some("req-42.a:b"));
    }

    #[test]
    fn sanitize_passes_through_absence() {
        assert_eq!(sanitize_client_correlation_id(None).unwrap(), None);
    }

    #[test]
    fn sanitize_rejects_empty_values() {
        let error = sanitize_client_correlation_id(Some("   ")).unwrap_err();
        assert_eq!(error, CorrelationIdRejection::Empty);
    }

    #[test]
    fn sanitize_rejects_oversized_values() {
        let value = "a".repeat(MAX_CLIENT_CORRELATION_ID_LENGTH + 1);
        let error = sanitize_client_correlation_id(Some(&value)).unwrap_err();
        assert_eq!(error, CorrelationIdRejection::TooLong);
    }

    #[test]
    fn sanitize_rejects_control_and_whitespace() {
        for value in ["with space", "tab\tvalue", "new\nline", "emoji-\u{1f600}"] {
            let error = sanitize_client_correlation_id(Some(value)).unwrap_err();
            assert_eq!(error, CorrelationIdRejection::DisallowedCharacter);
        }
    }
}
