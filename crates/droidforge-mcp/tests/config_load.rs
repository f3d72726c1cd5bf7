// crates/droidforge-mcp/tests/config_load.rs
// ============================================================================
// Module: Config Loading Tests
// Description: Tests for TOML configuration loading and limits.
// Purpose: Ensure config parsing fails closed on bad or oversized input.
// ============================================================================

//! ## Overview
//! Exercises file-based configuration loading: happy path, size cap, parse
//! failures, and validation failures surfaced at load time.

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

use std::io::Write;

use droidforge_mcp::ConfigError;
use droidforge_mcp::DroidforgeConfig;
use droidforge_mcp::ServerTransport;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("droidforge.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn load_reads_valid_config() {
    let (_dir, path) = write_config(
        r#"
            [server]
            transport = "http"
            bind = "127.0.0.1:8319"
            project_root = "/workspace/app"
        "#,
    );
    let config = DroidforgeConfig::load(Some(&path)).unwrap();
    assert_eq!(config.server.transport, ServerTransport::Http);
    assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:8319"));
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let error = DroidforgeConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::NotFound(_)));
}

#[test]
fn load_rejects_oversized_file() {
    let padding = format!("# {}\n", "x".repeat(2 * 1024 * 1024));
    let (_dir, path) = write_config(&padding);
    let error = DroidforgeConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::TooLarge { .. }));
}

#[test]
fn load_rejects_malformed_toml() {
    let (_dir, path) = write_config("[server\ntransport=stdio");
    let error = DroidforgeConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn load_runs_validation() {
    let (_dir, path) = write_config(
        r#"
            [server]
            transport = "http"
        "#,
    );
    let error = DroidforgeConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}
