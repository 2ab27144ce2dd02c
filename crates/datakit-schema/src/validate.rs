//! JSON Schema validation of resource values.
//!
//! A thin pass-through to the `jsonschema` crate: the full vocabulary
//! (types, required, enum, format, nested object/array schemas) comes
//! from the engine. This module only compiles the resolved schema and
//! shapes the engine's errors into structured [`Violation`]s.

use serde_json::Value;

use crate::error::{SchemaError, ValidationViolations, Violation};

/// Validate `value` against `schema`.
///
/// Collects every violation rather than stopping at the first, so a
/// client sees the complete set of problems in one response.
///
/// # Errors
///
/// [`SchemaError::InvalidSchema`] when the schema itself does not
/// compile; [`SchemaError::Validation`] with the violation list when the
/// value does not conform.
pub fn validate(value: &Value, schema: &Value) -> Result<(), SchemaError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| SchemaError::InvalidSchema {
        reason: e.to_string(),
    })?;

    let violations: Vec<Violation> = validator
        .iter_errors(value)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Validation {
            violations: ValidationViolations::new(violations),
        })
    }
}
