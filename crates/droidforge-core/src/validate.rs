// crates/droidforge-core/src/validate.rs
// ============================================================================
// Module: Argument Validation
// Description: Validates raw tool arguments against a tool schema.
// Purpose: Reject malformed requests with complete, aggregated feedback.
// Dependencies: droidforge-core::schema, serde, serde_json
// ============================================================================

//! ## Overview
//! Validation is a pure function from a schema and a raw argument payload to
//! either a normalized argument map or a failure listing **every** violation
//! found. Aggregation is deliberate: callers are LLM-driven agents whose
//! round-trips are expensive, so one response must carry complete feedback.
//! Unknown parameters are rejected outright to keep typos from being
//! silently ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::schema::ParamType;
use crate::schema::ParameterSpec;
use crate::schema::ToolSchema;
use crate::schema::value_kind;

// ============================================================================
// SECTION: Violations
// ============================================================================

/// One validation violation.
///
/// # Invariants
/// - Variants and their serialized shapes are stable for callers that parse
///   structured error data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required parameter was not supplied.
    MissingRequired {
        /// Missing parameter name.
        parameter: String,
    },
    /// A supplied parameter is not declared by the schema.
    UnknownParameter {
        /// Unknown parameter name.
        parameter: String,
    },
    /// A supplied value does not match the declared type.
    TypeMismatch {
        /// Offending parameter name.
        parameter: String,
        /// Declared parameter type.
        expected: ParamType,
        /// Observed JSON shape.
        found: String,
    },
    /// An enumeration value is not a member of the allowed literals.
    NotInEnumeration {
        /// Offending parameter name.
        parameter: String,
        /// Supplied literal.
        value: String,
        /// Allowed literals.
        allowed: Vec<String>,
    },
    /// The argument payload is not a JSON object.
    PayloadNotObject {
        /// Observed JSON shape.
        found: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired {
                parameter,
            } => write!(f, "missing required parameter: {parameter}"),
            Self::UnknownParameter {
                parameter,
            } => write!(f, "unknown parameter: {parameter}"),
            Self::TypeMismatch {
                parameter,
                expected,
                found,
            } => write!(f, "parameter {parameter}: expected {expected}, found {found}"),
            Self::NotInEnumeration {
                parameter,
                value,
                allowed,
            } => write!(
                f,
                "parameter {parameter}: value {value:?} not one of [{}]",
                allowed.join(", ")
            ),
            Self::PayloadNotObject {
                found,
            } => write!(f, "arguments must be an object, found {found}"),
        }
    }
}

// ============================================================================
// SECTION: Failure
// ============================================================================

/// Aggregated validation failure.
///
/// # Invariants
/// - `violations` is non-empty and lists every violation found, not just the
///   first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Every violation found during validation.
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> =
            self.violations.iter().map(ToString::to_string).collect();
        write!(f, "invalid parameters: {}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a raw argument payload against a tool schema.
///
/// A `null` payload is treated as empty arguments, matching callers that
/// omit the field entirely.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every violation found.
pub fn validate_payload(
    schema: &ToolSchema,
    payload: &Value,
) -> Result<Map<String, Value>, ValidationFailure> {
    match payload {
        Value::Null => validate_arguments(schema, &Map::new()),
        Value::Object(arguments) => validate_arguments(schema, arguments),
        other => Err(ValidationFailure {
            violations: vec![Violation::PayloadNotObject {
                found: value_kind(other).to_string(),
            }],
        }),
    }
}

/// Validates an argument map against a tool schema.
///
/// On success, returns a normalized map: supplied values pass through and
/// defaults are injected for omitted optional parameters that declare one.
/// Optional parameters without a default stay absent.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every violation found.
pub fn validate_arguments(
    schema: &ToolSchema,
    arguments: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationFailure> {
    let mut violations = Vec::new();
    for param in &schema.parameters {
        if param.required && !arguments.contains_key(&param.name) {
            violations.push(Violation::MissingRequired {
                parameter: param.name.clone(),
            });
        }
    }
    for key in arguments.keys() {
        if schema.parameter(key).is_none() {
            violations.push(Violation::UnknownParameter {
                parameter: key.clone(),
            });
        }
    }
    for (key, value) in arguments {
        if let Some(param) = schema.parameter(key)
            && let Some(violation) = check_value(param, value)
        {
            violations.push(violation);
        }
    }
    if !violations.is_empty() {
        return Err(ValidationFailure {
            violations,
        });
    }
    let mut normalized = arguments.clone();
    for param in &schema.parameters {
        if !normalized.contains_key(&param.name)
            && let Some(default) = &param.default
        {
            normalized.insert(param.name.clone(), default.clone());
        }
    }
    Ok(normalized)
}

/// Checks one supplied value against its parameter declaration.
fn check_value(param: &ParameterSpec, value: &Value) -> Option<Violation> {
    match param.param_type {
        ParamType::Enumeration => {
            let Some(literal) = value.as_str() else {
                return Some(Violation::TypeMismatch {
                    parameter: param.name.clone(),
                    expected: param.param_type,
                    found: value_kind(value).to_string(),
                });
            };
            if param.allowed_values.iter().any(|allowed| allowed == literal) {
                None
            } else {
                Some(Violation::NotInEnumeration {
                    parameter: param.name.clone(),
                    value: literal.to_string(),
                    allowed: param.allowed_values.clone(),
                })
            }
        }
        ParamType::StringArray => {
            if param.param_type.accepts(value) {
                None
            } else {
                let found = if value
                    .as_array()
                    .is_some_and(|items| items.iter().any(|item| !item.is_string()))
                {
                    "array containing non-string values".to_string()
                } else {
                    value_kind(value).to_string()
                };
                Some(Violation::TypeMismatch {
                    parameter: param.name.clone(),
                    expected: param.param_type,
                    found,
                })
            }
        }
        _ => {
            if param.param_type.accepts(value) {
                None
            } else {
                Some(Violation::TypeMismatch {
                    parameter: param.name.clone(),
                    expected: param.param_type,
                    found: value_kind(value).to_string(),
                })
            }
        }
    }
}
