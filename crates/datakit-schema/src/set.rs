//! Resource-type resolution over an app's schema list.
//!
//! The original lookup was "first schema whose lower-cased title matches";
//! here the mapping is built explicitly once, and the conditions under
//! which ordering mattered (duplicate titles) are rejected outright when
//! the list is accepted.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::SchemaError;

/// The resource-type segment occupied by the fixed dataset path group in
/// the synthesized OpenAPI document. A schema with this title would
/// silently corrupt the document's path keyspace.
pub const RESERVED_TITLE: &str = "datasets";

/// An app's schema list indexed by lower-cased title.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    /// Lower-cased titles in schema-list order.
    titles: Vec<String>,
    by_title: HashMap<String, Value>,
}

impl SchemaSet {
    /// Build the title index, enforcing the title policy.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidSchemaList`] — an entry is not a JSON
    ///   object or lacks a string `title`.
    /// - [`SchemaError::DuplicateTitle`] — two titles collide
    ///   case-insensitively.
    /// - [`SchemaError::ReservedTitle`] — a title is literally `datasets`.
    pub fn new(schemas: &[Value]) -> Result<Self, SchemaError> {
        let mut titles = Vec::with_capacity(schemas.len());
        let mut by_title = HashMap::with_capacity(schemas.len());

        for (index, schema) in schemas.iter().enumerate() {
            if !schema.is_object() {
                return Err(SchemaError::InvalidSchemaList {
                    index,
                    reason: "schema must be a JSON object".to_string(),
                });
            }
            let title = schema
                .get("title")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::InvalidSchemaList {
                    index,
                    reason: "schema must carry a string 'title'".to_string(),
                })?
                .to_lowercase();

            if title == RESERVED_TITLE {
                return Err(SchemaError::ReservedTitle { title });
            }
            if by_title.insert(title.clone(), schema.clone()).is_some() {
                return Err(SchemaError::DuplicateTitle { title });
            }
            titles.push(title);
        }

        Ok(Self { titles, by_title })
    }

    /// Resolve a resource type to its schema, case-insensitively.
    ///
    /// On miss the error enumerates every supported type for the app, in
    /// schema-list order, for client debuggability.
    pub fn resolve(&self, resource_type: &str) -> Result<&Value, SchemaError> {
        let key = resource_type.to_lowercase();
        self.by_title
            .get(&key)
            .ok_or_else(|| SchemaError::UnsupportedResourceType {
                resource_type: resource_type.to_string(),
                supported: self.titles.clone(),
            })
    }

    /// Lower-cased titles in schema-list order.
    pub fn supported_types(&self) -> &[String] {
        &self.titles
    }
}
