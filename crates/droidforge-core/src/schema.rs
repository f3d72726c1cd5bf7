// crates/droidforge-core/src/schema.rs
// ============================================================================
// Module: Tool Schemas
// Description: Typed parameter and tool schema model for Droidforge.
// Purpose: Describe tool surfaces declaratively and validate them at startup.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Tool schemas are static, data-driven declarations: each tool names its
//! parameters, their types, and their defaults, and the whole set is checked
//! once at registration time. Schemas also render the JSON Schema documents
//! MCP clients receive from `tools/list`, so the typed model is the single
//! source of truth for both validation and discovery.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Parameter Types
// ============================================================================

/// Accepted parameter types for tool schemas.
///
/// # Invariants
/// - Variants are stable for wire serialization and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// UTF-8 string value.
    String,
    /// Boolean value.
    Boolean,
    /// Integer value (floats are rejected).
    Integer,
    /// Array of string values.
    StringArray,
    /// String value restricted to an allow-list of literals.
    Enumeration,
}

impl ParamType {
    /// Returns a stable label for error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::StringArray => "array of strings",
            Self::Enumeration => "enum",
        }
    }

    /// Returns true when a JSON value has the shape this type accepts.
    ///
    /// Enumeration membership is checked separately; this only verifies that
    /// the value is a string.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String | Self::Enumeration => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::StringArray => {
                value.as_array().is_some_and(|items| items.iter().all(Value::is_string))
            }
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns a stable label for the JSON type of a value.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Parameter Specs
// ============================================================================

/// Declared shape of one tool parameter.
///
/// # Invariants
/// - `required` parameters never carry a `default`.
/// - `allowed_values` is non-empty exactly when `param_type` is
///   [`ParamType::Enumeration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name (unique within a tool).
    pub name: String,
    /// Declared parameter type.
    pub param_type: ParamType,
    /// Human-readable description for discovery listings.
    pub description: String,
    /// Whether the caller must supply the parameter.
    pub required: bool,
    /// Value injected when the parameter is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed literals for enumeration parameters.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub allowed_values: Vec<String>,
}

impl ParameterSpec {
    /// Declares a required parameter.
    #[must_use]
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
            default: None,
            allowed_values: Vec::new(),
        }
    }

    /// Declares an optional parameter without a default.
    #[must_use]
    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: false,
            default: None,
            allowed_values: Vec::new(),
        }
    }

    /// Declares an enumeration parameter with an optional default literal.
    #[must_use]
    pub fn enumeration(
        name: &str,
        description: &str,
        allowed_values: &[&str],
        default: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Enumeration,
            description: description.to_string(),
            required: false,
            default: default.map(|value| Value::String(value.to_string())),
            allowed_values: allowed_values.iter().map(ToString::to_string).collect(),
        }
    }

    /// Returns a copy with the default value set.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Renders the JSON Schema property document for this parameter.
    #[must_use]
    pub fn property_schema(&self) -> Value {
        let mut property = match self.param_type {
            ParamType::String => json!({ "type": "string" }),
            ParamType::Boolean => json!({ "type": "boolean" }),
            ParamType::Integer => json!({ "type": "integer" }),
            ParamType::StringArray => json!({
                "type": "array",
                "items": { "type": "string" }
            }),
            ParamType::Enumeration => json!({
                "type": "string",
                "enum": self.allowed_values
            }),
        };
        if let Some(object) = property.as_object_mut() {
            object.insert("description".to_string(), Value::String(self.description.clone()));
            if let Some(default) = &self.default {
                object.insert("default".to_string(), default.clone());
            }
        }
        property
    }
}

// ============================================================================
// SECTION: Tool Schemas
// ============================================================================

/// Declared surface of one callable tool.
///
/// # Invariants
/// - `parameters` preserve declaration order for deterministic listings.
/// - Parameter names are unique once [`ToolSchema::validate`] has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool name (registry key).
    pub name: String,
    /// Human-readable summary for discovery listings.
    pub description: String,
    /// Ordered parameter declarations.
    pub parameters: Vec<ParameterSpec>,
}

impl ToolSchema {
    /// Creates a tool schema from ordered parameter declarations.
    #[must_use]
    pub fn new(name: &str, description: &str, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }

    /// Looks up a parameter declaration by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Checks the schema invariants.
    ///
    /// Runs once per tool at registration time so an invalid schema set is a
    /// startup failure rather than a per-request surprise.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyToolName);
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            if param.name.trim().is_empty() {
                return Err(SchemaError::EmptyParameterName {
                    tool: self.name.clone(),
                });
            }
            if seen.contains(&param.name.as_str()) {
                return Err(SchemaError::DuplicateParameter {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
            seen.push(param.name.as_str());
            Self::validate_parameter(&self.name, param)?;
        }
        Ok(())
    }

    /// Checks the invariants of a single parameter declaration.
    fn validate_parameter(tool: &str, param: &ParameterSpec) -> Result<(), SchemaError> {
        if param.required && param.default.is_some() {
            return Err(SchemaError::RequiredWithDefault {
                tool: tool.to_string(),
                parameter: param.name.clone(),
            });
        }
        match param.param_type {
            ParamType::Enumeration => {
                if param.allowed_values.is_empty() {
                    return Err(SchemaError::EmptyEnumeration {
                        tool: tool.to_string(),
                        parameter: param.name.clone(),
                    });
                }
            }
            _ => {
                if !param.allowed_values.is_empty() {
                    return Err(SchemaError::AllowedValuesOutsideEnumeration {
                        tool: tool.to_string(),
                        parameter: param.name.clone(),
                    });
                }
            }
        }
        if let Some(default) = &param.default {
            if !param.param_type.accepts(default) {
                return Err(SchemaError::DefaultTypeMismatch {
                    tool: tool.to_string(),
                    parameter: param.name.clone(),
                    expected: param.param_type,
                });
            }
            if param.param_type == ParamType::Enumeration
                && let Some(literal) = default.as_str()
                && !param.allowed_values.iter().any(|allowed| allowed == literal)
            {
                return Err(SchemaError::DefaultNotAllowed {
                    tool: tool.to_string(),
                    parameter: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Renders the MCP `inputSchema` JSON document for this tool.
    ///
    /// Unknown properties are rejected at the schema level to match the
    /// validator's strict unknown-parameter policy.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            properties.insert(param.name.clone(), param.property_schema());
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }
        let mut document = serde_json::Map::new();
        document.insert("type".to_string(), Value::String("object".to_string()));
        document.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            document.insert("required".to_string(), Value::Array(required));
        }
        document.insert("additionalProperties".to_string(), Value::Bool(false));
        Value::Object(document)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema declaration errors.
///
/// # Invariants
/// - Variants are stable for startup failure classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Tool name is empty or whitespace.
    #[error("tool name must not be empty")]
    EmptyToolName,
    /// A parameter name is empty or whitespace.
    #[error("tool {tool}: parameter name must not be empty")]
    EmptyParameterName {
        /// Tool declaring the parameter.
        tool: String,
    },
    /// A parameter name is declared twice.
    #[error("tool {tool}: duplicate parameter {parameter}")]
    DuplicateParameter {
        /// Tool declaring the parameter.
        tool: String,
        /// Duplicated parameter name.
        parameter: String,
    },
    /// A required parameter declares a default value.
    #[error("tool {tool}: required parameter {parameter} must not declare a default")]
    RequiredWithDefault {
        /// Tool declaring the parameter.
        tool: String,
        /// Offending parameter name.
        parameter: String,
    },
    /// An enumeration parameter declares no allowed values.
    #[error("tool {tool}: enumeration parameter {parameter} must list allowed values")]
    EmptyEnumeration {
        /// Tool declaring the parameter.
        tool: String,
        /// Offending parameter name.
        parameter: String,
    },
    /// A non-enumeration parameter declares allowed values.
    #[error("tool {tool}: parameter {parameter} is not an enumeration but lists allowed values")]
    AllowedValuesOutsideEnumeration {
        /// Tool declaring the parameter.
        tool: String,
        /// Offending parameter name.
        parameter: String,
    },
    /// A default value does not match the declared parameter type.
    #[error("tool {tool}: default for parameter {parameter} is not a valid {expected}")]
    DefaultTypeMismatch {
        /// Tool declaring the parameter.
        tool: String,
        /// Offending parameter name.
        parameter: String,
        /// Declared parameter type.
        expected: ParamType,
    },
    /// An enumeration default is not a member of the allowed values.
    #[error("tool {tool}: default for parameter {parameter} is not an allowed value")]
    DefaultNotAllowed {
        /// Tool declaring the parameter.
        tool: String,
        /// Offending parameter name.
        parameter: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================
