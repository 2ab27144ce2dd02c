//! Dataset routes.
//!
//! - GET/POST `/apps/{app_id}/datasets/` — list / create
//! - GET/PUT/DELETE `/apps/{app_id}/datasets/{dataset_id}/` — detail
//! - GET `/apps/{app_id}/datasets/{dataset_id}/dump?type=json|xlsx` — export
//!
//! Deleting a dataset cascades to its resources at the store layer.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use datakit_core::Dataset;
use datakit_export::{dump_to_json, dump_to_xlsx};

use crate::error::ApiError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request to create or update a dataset.
#[derive(Debug, Deserialize)]
pub struct DatasetRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Dump format selector, read from the `type` query parameter.
#[derive(Debug, Deserialize)]
pub struct DumpParams {
    #[serde(rename = "type")]
    pub dump_type: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/apps/:app_id/datasets/",
            get(list_datasets).post(create_dataset),
        )
        .route(
            "/apps/:app_id/datasets/:dataset_id/",
            get(get_dataset).put(update_dataset).delete(delete_dataset),
        )
        .route("/apps/:app_id/datasets/:dataset_id/dump", get(dump_dataset))
}

/// Look up a dataset and check it belongs to the app in the path.
fn dataset_in_app(state: &AppState, app_id: i64, dataset_id: i64) -> Result<Dataset, ApiError> {
    if state.db.get_app(app_id).is_none() {
        return Err(ApiError::NotFound(format!("app {app_id} not found")));
    }
    state
        .db
        .get_dataset(dataset_id)
        .filter(|d| d.app == app_id)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {dataset_id} not found")))
}

/// GET /apps/:app_id/datasets/ — List an app's datasets.
async fn list_datasets(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<Vec<Dataset>>, ApiError> {
    if state.db.get_app(app_id).is_none() {
        return Err(ApiError::NotFound(format!("app {app_id} not found")));
    }
    Ok(Json(state.db.list_datasets(app_id)))
}

/// POST /apps/:app_id/datasets/ — Create a dataset.
async fn create_dataset(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
    body: Result<Json<DatasetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Dataset>), ApiError> {
    let req = extract_json(body)?;
    let dataset = state
        .db
        .create_dataset(app_id, req.name, req.description)
        .ok_or_else(|| ApiError::NotFound(format!("app {app_id} not found")))?;
    tracing::info!(app_id, dataset_id = dataset.id, "dataset created");
    Ok((StatusCode::CREATED, Json(dataset)))
}

/// GET /apps/:app_id/datasets/:dataset_id/ — Get a dataset.
async fn get_dataset(
    State(state): State<AppState>,
    Path((app_id, dataset_id)): Path<(i64, i64)>,
) -> Result<Json<Dataset>, ApiError> {
    dataset_in_app(&state, app_id, dataset_id).map(Json)
}

/// PUT /apps/:app_id/datasets/:dataset_id/ — Update name and description.
async fn update_dataset(
    State(state): State<AppState>,
    Path((app_id, dataset_id)): Path<(i64, i64)>,
    body: Result<Json<DatasetRequest>, JsonRejection>,
) -> Result<Json<Dataset>, ApiError> {
    let req = extract_json(body)?;
    dataset_in_app(&state, app_id, dataset_id)?;
    state
        .db
        .update_dataset(dataset_id, req.name, req.description)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {dataset_id} not found")))
}

/// DELETE /apps/:app_id/datasets/:dataset_id/ — Delete with cascade.
async fn delete_dataset(
    State(state): State<AppState>,
    Path((app_id, dataset_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    dataset_in_app(&state, app_id, dataset_id)?;
    state.db.delete_dataset(dataset_id);
    tracing::info!(app_id, dataset_id, "dataset deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /apps/:app_id/datasets/:dataset_id/dump — Export the dataset.
///
/// `?type=json` (default) returns the grouped mapping; `?type=xlsx`
/// returns a workbook attachment. The export reads a point-in-time
/// snapshot with no isolation against concurrent writers.
async fn dump_dataset(
    State(state): State<AppState>,
    Path((app_id, dataset_id)): Path<(i64, i64)>,
    Query(params): Query<DumpParams>,
) -> Result<Response, ApiError> {
    let dataset = dataset_in_app(&state, app_id, dataset_id)?;
    let resources = state.db.list_resources(dataset_id, None);

    match params.dump_type.as_deref().unwrap_or("json") {
        "json" => Ok(Json(dump_to_json(&resources)).into_response()),
        "xlsx" => {
            let bytes = dump_to_xlsx(&resources)
                .map_err(|e| ApiError::Internal(format!("xlsx export failed: {e}")))?;
            let headers = [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                        .to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=dataset_{}.xlsx", dataset.id),
                ),
            ];
            Ok((headers, bytes).into_response())
        }
        other => Err(ApiError::BadRequest(format!("invalid dump type {other}"))),
    }
}
