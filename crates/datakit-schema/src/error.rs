//! Error types for schema handling.
//!
//! Distinct variants for `UnsupportedResourceType` and `Validation` let
//! callers map each to its own HTTP response without string-matching
//! error messages.

use std::fmt;

use thiserror::Error;

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Error during schema-set construction, resolution, or validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema-list entry is not usable as a resource-type definition.
    #[error("schema at index {index} is invalid: {reason}")]
    InvalidSchemaList { index: usize, reason: String },

    /// Two schemas share a title (case-insensitively).
    #[error("duplicate schema title '{title}'")]
    DuplicateTitle { title: String },

    /// The title collides with the fixed dataset path group.
    #[error("schema title '{title}' is reserved")]
    ReservedTitle { title: String },

    /// The requested resource type matches no schema title in the app.
    #[error(
        "resource type '{resource_type}' not supported; supported resource types: {}",
        supported.join(", ")
    )]
    UnsupportedResourceType {
        resource_type: String,
        supported: Vec<String>,
    },

    /// The value did not conform to its resource type's schema.
    #[error("validation failed: {violations}")]
    Validation { violations: ValidationViolations },

    /// The schema itself could not be compiled by the validation engine.
    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },
}
