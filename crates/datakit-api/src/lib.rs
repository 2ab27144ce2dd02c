//! # datakit-api — HTTP Gateway
//!
//! Axum service tying the pieces together: inbound operations are
//! dispatched by verb and resource type, resource types are resolved
//! against the owning app's schema set, write payloads are validated
//! before any store mutation, and the store's records are serialized
//! back out.
//!
//! ## API Surface
//!
//! | Prefix                                              | Module                 |
//! |-----------------------------------------------------|------------------------|
//! | `/apps/`                                            | [`routes::apps`]       |
//! | `/apps/{app_id}/schema`, `/apps/{app_id}/swagger`   | [`routes::apps`]       |
//! | `/apps/{app_id}/datasets/`                          | [`routes::datasets`]   |
//! | `/apps/{app_id}/datasets/{id}/dump`                 | [`routes::datasets`]   |
//! | `/apps/{app_id}/datasets/{id}/{resource_type}/`     | [`routes::resources`]  |
//! | `/health/*`                                         | probes, this module    |
//!
//! Every request is handled synchronously end to end: resolve, validate,
//! mutate, respond. Failures surface as structured JSON error bodies and
//! never affect subsequent requests.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod swagger;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Assemble the full application router.
///
/// Body size limit: 2 MiB. Arbitrary JSON payloads and schema lists come
/// in through these routes; the limit bounds memory per request.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::apps::router())
        .merge(routes::datasets::router())
        .merge(routes::resources::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the store lock is acquirable.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.db.len();
    (StatusCode::OK, "ready")
}
