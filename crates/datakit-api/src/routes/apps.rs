//! App routes.
//!
//! - GET/POST `/apps/` — list / create apps
//! - GET `/apps/{app_id}/` — get one app
//! - GET `/apps/{app_id}/schema` — synthesized OpenAPI document
//! - GET `/apps/{app_id}/swagger` — Swagger UI page
//!
//! App creation is where the schema-list title policy is enforced:
//! duplicate or reserved titles never make it into the store, so every
//! persisted app has a well-formed schema set.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use datakit_core::App;
use datakit_schema::{openapi, SchemaSet};

use crate::error::ApiError;
use crate::extractors::extract_json;
use crate::state::AppState;
use crate::swagger;

/// Request to create an app.
#[derive(Debug, Deserialize)]
pub struct CreateAppRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub schemas: Vec<Value>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apps/", get(list_apps).post(create_app))
        .route("/apps/:app_id/", get(get_app))
        .route("/apps/:app_id/schema", get(openapi_document))
        .route("/apps/:app_id/swagger", get(swagger_page))
}

/// GET /apps/ — List all apps.
async fn list_apps(State(state): State<AppState>) -> Json<Vec<App>> {
    Json(state.db.list_apps())
}

/// POST /apps/ — Create an app with its schema list.
async fn create_app(
    State(state): State<AppState>,
    body: Result<Json<CreateAppRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<App>), ApiError> {
    let req = extract_json(body)?;

    // Title policy check before the store is touched.
    let set = SchemaSet::new(&req.schemas)?;

    let app = state.db.create_app(req.name, req.description, req.schemas);
    tracing::info!(
        app_id = app.id,
        name = %app.name,
        resource_types = ?set.supported_types(),
        "app created"
    );
    Ok((StatusCode::CREATED, Json(app)))
}

/// GET /apps/:app_id/ — Get one app.
async fn get_app(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<App>, ApiError> {
    state
        .db
        .get_app(app_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("app {app_id} not found")))
}

/// GET /apps/:app_id/schema — Synthesized OpenAPI document.
async fn openapi_document(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let app = state
        .db
        .get_app(app_id)
        .ok_or_else(|| ApiError::NotFound(format!("app {app_id} not found")))?;
    Ok(Json(openapi::document_for_app(&app)))
}

/// GET /apps/:app_id/swagger — Swagger UI page for the app.
async fn swagger_page(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    if state.db.get_app(app_id).is_none() {
        return Err(ApiError::NotFound(format!("app {app_id} not found")));
    }
    Ok(Html(swagger::render(&format!("/apps/{app_id}/schema"))))
}
