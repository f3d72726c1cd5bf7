// crates/droidforge-mcp/src/config.rs
// ============================================================================
// Module: Droidforge Configuration
// Description: Configuration loading and validation for the MCP server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a hard size limit and
//! validated before the server starts. Missing or invalid configuration
//! fails closed: the server refuses to start rather than guessing at
//! defaults for contradictory input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "droidforge.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DROIDFORGE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Minimum allowed request body limit.
pub const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum allowed request body limit.
pub const MAX_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Transport used to serve JSON-RPC requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Newline- or header-framed JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

impl ServerTransport {
    /// Returns a stable label for the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Framing used for the stdio transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdioFraming {
    /// One JSON-RPC message per line.
    Line,
    /// MCP `Content-Length` header framing.
    ContentLength,
}

impl StdioFraming {
    /// Returns a stable label for the framing mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::ContentLength => "content_length",
        }
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Server section of the Droidforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport used to serve requests.
    #[serde(default = "default_transport")]
    pub transport: ServerTransport,
    /// Framing for the stdio transport.
    #[serde(default = "default_framing")]
    pub framing: StdioFraming,
    /// Bind address, required for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Root directory of the project the tools operate on.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            framing: default_framing(),
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            project_root: default_project_root(),
        }
    }
}

/// Top-level Droidforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DroidforgeConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Returns the default transport.
const fn default_transport() -> ServerTransport {
    ServerTransport::Stdio
}

/// Returns the default stdio framing.
const fn default_framing() -> StdioFraming {
    StdioFraming::Line
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default project root.
fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

impl DroidforgeConfig {
    /// Builds a stdio configuration rooted at the given project directory.
    #[must_use]
    pub fn stdio(project_root: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                project_root: project_root.into(),
                ..ServerConfig::default()
            },
        }
    }

    /// Loads configuration from a file.
    ///
    /// Resolution order: explicit path, then the `DROIDFORGE_CONFIG`
    /// environment variable, then `droidforge.toml` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized,
    /// unparsable, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(path) => path.to_path_buf(),
            None => env::var_os(CONFIG_ENV_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
        };
        let metadata = fs::metadata(&resolved)
            .map_err(|_| ConfigError::NotFound(resolved.display().to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                bytes: metadata.len(),
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }
        let contents = fs::read_to_string(&resolved)
            .map_err(|error| ConfigError::Io(error.to_string()))?;
        let config: Self =
            toml::from_str(&contents).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let server = &self.server;
        if server.max_body_bytes < MIN_MAX_BODY_BYTES
            || server.max_body_bytes > MAX_MAX_BODY_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must be between {MIN_MAX_BODY_BYTES} and {MAX_MAX_BODY_BYTES}"
            )));
        }
        if server.project_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("project_root must not be empty".to_string()));
        }
        match server.transport {
            ServerTransport::Http => {
                let Some(bind) = server.bind.as_ref() else {
                    return Err(ConfigError::Invalid(
                        "http transport requires a bind address".to_string(),
                    ));
                };
                if bind.parse::<SocketAddr>().is_err() {
                    return Err(ConfigError::Invalid(format!("invalid bind address: {bind}")));
                }
            }
            ServerTransport::Stdio => {
                if server.bind.is_some() {
                    return Err(ConfigError::Invalid(
                        "bind address is only valid for the http transport".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for startup failure classification.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found at the resolved path.
    #[error("config file not found: {0}")]
    NotFound(String),
    /// Config file could not be read.
    #[error("config read failed: {0}")]
    Io(String),
    /// Config file exceeds the size limit.
    #[error("config file too large: {bytes} bytes (limit {limit})")]
    TooLarge {
        /// Observed file size.
        bytes: u64,
        /// Maximum accepted size.
        limit: u64,
    },
    /// Config file is not valid TOML for this schema.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// Config contents violate a validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
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

    use super::ConfigError;
    use super::DroidforgeConfig;
    use super::ServerTransport;
    use super::StdioFraming;

    #[test]
    fn defaults_are_valid() {
        let config = DroidforgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.transport, ServerTransport::Stdio);
        assert_eq!(config.server.framing, StdioFraming::Line);
    }

    #[test]
    fn http_requires_bind_address() {
        let mut config = DroidforgeConfig::default();
        config.server.transport = ServerTransport::Http;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.server.bind = Some("not-an-address".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.server.bind = Some("127.0.0.1:8319".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stdio_rejects_bind_address() {
        let mut config = DroidforgeConfig::default();
        config.server.bind = Some("127.0.0.1:8319".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn body_limit_bounds_enforced() {
        let mut config = DroidforgeConfig::default();
        config.server.max_body_bytes = 16;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.server.max_body_bytes = super::MAX_MAX_BODY_BYTES + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let rendered = r#"
            [server]
            transport = "http"
            framing = "content_length"
            bind = "127.0.0.1:8319"
            max_body_bytes = 65536
            project_root = "/workspace/app"
        "#;
        let config: DroidforgeConfig = toml::from_str(rendered).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.transport, ServerTransport::Http);
        assert_eq!(config.server.max_body_bytes, 65_536);
    }

    #[test]
    fn unknown_fields_rejected() {
        let rendered = r#"
            [server]
            transport = "stdio"
            unexpected = true
        "#;
        assert!(toml::from_str::<DroidforgeConfig>(rendered).is_err());
    }
}
