//! # datakit-core — Domain Model and Record Store
//!
//! The three record types of the system — [`App`], [`Dataset`], and
//! [`Resource`] — and the in-memory [`Database`] that holds them.
//!
//! ## Ownership Chain
//!
//! ```text
//! App 1─* Dataset 1─* Resource
//! ```
//!
//! Deletes cascade down the chain: removing an app removes its datasets
//! and their resources; removing a dataset removes its resources.
//!
//! ## Store Semantics
//!
//! - IDs are sequential positive `i64`, assigned per table on save.
//! - Listing and filtering return records in insertion order.
//! - Each call takes the store lock once; there are no cross-record
//!   transactions. Two concurrent writers to the same resource race at
//!   last-write-wins granularity.

pub mod model;
pub mod store;

pub use model::{App, Dataset, Resource};
pub use store::Database;
