//! Resource routes — the validation gateway.
//!
//! - GET/POST `/apps/{app_id}/datasets/{dataset_id}/{resource_type}/`
//! - GET/PUT/DELETE `.../{resource_type}/{resource_id}`
//!
//! Every operation resolves the resource type against the owning app's
//! schema set before touching storage, so unknown types fail fast with
//! the supported-type list. Create and update additionally validate the
//! payload against the resolved schema; a validation failure leaves the
//! store untouched. Lookups key on id + type, so an id addressed under
//! the wrong type is not found rather than crossing types.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use datakit_core::Resource;
use datakit_schema::{validate, SchemaSet};

use crate::error::ApiError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/apps/:app_id/datasets/:dataset_id/:resource_type/",
            get(list_resources).post(create_resource),
        )
        .route(
            "/apps/:app_id/datasets/:dataset_id/:resource_type/:resource_id",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
}

/// Resolved request context: the dataset exists under the app, and the
/// resource type maps to this schema. `resource_type` is lower-cased.
struct ResolvedType {
    resource_type: String,
    schema: Value,
}

/// Resolve app, dataset, and resource type, in that order, before any
/// resource-table access.
fn resolve(
    state: &AppState,
    app_id: i64,
    dataset_id: i64,
    resource_type: &str,
) -> Result<ResolvedType, ApiError> {
    let app = state
        .db
        .get_app(app_id)
        .ok_or_else(|| ApiError::NotFound(format!("app {app_id} not found")))?;

    state
        .db
        .get_dataset(dataset_id)
        .filter(|d| d.app == app_id)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {dataset_id} not found")))?;

    // The schema list was policy-checked when the app was created, so a
    // failure here means the store holds an app this build would not
    // have accepted.
    let set = SchemaSet::new(&app.schemas)
        .map_err(|e| ApiError::Internal(format!("stored schema list is invalid: {e}")))?;
    let schema = set.resolve(resource_type)?.clone();

    Ok(ResolvedType {
        resource_type: resource_type.to_lowercase(),
        schema,
    })
}

/// Look up a resource by id + type and check it belongs to the dataset.
fn resource_in_dataset(
    state: &AppState,
    dataset_id: i64,
    resource_type: &str,
    resource_id: i64,
) -> Result<Resource, ApiError> {
    state
        .db
        .get_resource(resource_id, resource_type)
        .filter(|r| r.dataset == dataset_id)
        .ok_or_else(|| {
            ApiError::NotFound(format!("{resource_type} {resource_id} not found"))
        })
}

/// GET .../:resource_type/ — List resources of one type.
async fn list_resources(
    State(state): State<AppState>,
    Path((app_id, dataset_id, resource_type)): Path<(i64, i64, String)>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let resolved = resolve(&state, app_id, dataset_id, &resource_type)?;
    Ok(Json(
        state
            .db
            .list_resources(dataset_id, Some(&resolved.resource_type)),
    ))
}

/// POST .../:resource_type/ — Validate and create a resource.
async fn create_resource(
    State(state): State<AppState>,
    Path((app_id, dataset_id, resource_type)): Path<(i64, i64, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let resolved = resolve(&state, app_id, dataset_id, &resource_type)?;
    let value = extract_json(body)?;

    validate(&value, &resolved.schema)?;

    let resource = state
        .db
        .create_resource(dataset_id, resolved.resource_type, value)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {dataset_id} not found")))?;
    tracing::info!(
        app_id,
        dataset_id,
        resource_id = resource.id,
        resource_type = %resource.resource_type,
        "resource created"
    );
    Ok((StatusCode::CREATED, Json(resource)))
}

/// GET .../:resource_type/:resource_id — Get one resource.
async fn get_resource(
    State(state): State<AppState>,
    Path((app_id, dataset_id, resource_type, resource_id)): Path<(i64, i64, String, i64)>,
) -> Result<Json<Resource>, ApiError> {
    let resolved = resolve(&state, app_id, dataset_id, &resource_type)?;
    resource_in_dataset(&state, dataset_id, &resolved.resource_type, resource_id).map(Json)
}

/// PUT .../:resource_type/:resource_id — Validate and overwrite the value.
async fn update_resource(
    State(state): State<AppState>,
    Path((app_id, dataset_id, resource_type, resource_id)): Path<(i64, i64, String, i64)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Resource>, ApiError> {
    let resolved = resolve(&state, app_id, dataset_id, &resource_type)?;
    let value = extract_json(body)?;

    resource_in_dataset(&state, dataset_id, &resolved.resource_type, resource_id)?;
    validate(&value, &resolved.schema)?;

    state
        .db
        .update_resource(resource_id, &resolved.resource_type, value)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "{} {resource_id} not found",
                resolved.resource_type
            ))
        })
}

/// DELETE .../:resource_type/:resource_id — Delete by id + type.
async fn delete_resource(
    State(state): State<AppState>,
    Path((app_id, dataset_id, resource_type, resource_id)): Path<(i64, i64, String, i64)>,
) -> Result<StatusCode, ApiError> {
    let resolved = resolve(&state, app_id, dataset_id, &resource_type)?;
    resource_in_dataset(&state, dataset_id, &resolved.resource_type, resource_id)?;
    state
        .db
        .delete_resource(resource_id, &resolved.resource_type);
    tracing::info!(app_id, dataset_id, resource_id, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}
