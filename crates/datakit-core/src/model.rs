//! Record types stored by the [`Database`](crate::Database).
//!
//! Serialized field shapes are part of the HTTP contract: `Dataset::app`
//! and `Resource::dataset` carry the owning record's id, matching the
//! wire format clients see.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level tenant owning an ordered list of resource-type schema
/// definitions.
///
/// Each entry in `schemas` is a raw JSON Schema object whose `title`
/// (lower-cased) doubles as the resource-type tag for records stored
/// under this app's datasets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct App {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub schemas: Vec<Value>,
}

/// Named collection of resources under an [`App`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Owning app id.
    pub app: i64,
}

/// A single typed JSON record under a [`Dataset`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: i64,
    /// Lower-cased schema title identifying which schema governs `value`.
    pub resource_type: String,
    /// Owning dataset id.
    pub dataset: i64,
    pub value: Value,
}
