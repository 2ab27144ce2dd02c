//! # datakit-schema — Schema-Driven Validation and OpenAPI Synthesis
//!
//! The dynamic core of the system. An app carries a runtime-supplied list
//! of JSON Schemas; this crate is everything that list drives:
//!
//! - [`SchemaSet`] — the explicit lower-cased-title → schema mapping built
//!   when an app's schema list is accepted, with resource-type resolution.
//! - [`validate`] — pass-through to the `jsonschema` engine, reporting
//!   structured violations.
//! - [`openapi::document_for_app`] — pure synthesis of a complete OpenAPI
//!   3.0 document from the app's schema list alone.
//!
//! ## Title Policy
//!
//! Enforced by [`SchemaSet::new`] at app-write time, not at lookup time:
//! every schema must be an object with a string `title`; titles are unique
//! case-insensitively; `datasets` is reserved because the fixed dataset
//! path group in the synthesized document already occupies that segment.

pub mod error;
pub mod openapi;
pub mod set;
pub mod validate;

pub use error::{SchemaError, ValidationViolations, Violation};
pub use set::SchemaSet;
pub use validate::validate;
