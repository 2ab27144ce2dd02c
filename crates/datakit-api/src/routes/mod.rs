//! Route modules. Each defines an Axum router for one API surface area;
//! routers are assembled in [`crate::app`].

pub mod apps;
pub mod datasets;
pub mod resources;
