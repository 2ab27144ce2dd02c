//! # Integration tests for datakit-api
//!
//! Drives the assembled router end to end: app creation with the title
//! policy, schema-validated resource writes, type resolution, OpenAPI
//! synthesis, Swagger rendering, and dataset export in both formats.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use datakit_api::{app, AppState};

fn test_app() -> axum::Router {
    app(AppState::new())
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> axum::http::Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(v) => builder.body(Body::from(v.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

/// Create the Shop app with a Product schema; returns its id.
async fn create_shop_app(router: &axum::Router) -> i64 {
    let response = send(
        router,
        "POST",
        "/apps/",
        Some(json!({
            "name": "Shop",
            "description": "demo shop",
            "schemas": [{
                "title": "Product",
                "type": "object",
                "required": ["sku"],
                "properties": {"sku": {"type": "string"}}
            }]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_dataset(router: &axum::Router, app_id: i64) -> i64 {
    let response = send(
        router,
        "POST",
        &format!("/apps/{app_id}/datasets/"),
        Some(json!({"name": "inventory"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// -- Health probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe() {
    let response = send(&test_app(), "GET", "/health/liveness", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_probe() {
    let response = send(&test_app(), "GET", "/health/readiness", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Apps ---------------------------------------------------------------------

#[tokio::test]
async fn create_and_list_apps() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    assert_eq!(app_id, 1);

    let response = send(&router, "GET", "/apps/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let apps = body_json(response).await;
    assert_eq!(apps.as_array().unwrap().len(), 1);
    assert_eq!(apps[0]["name"], "Shop");
    assert_eq!(apps[0]["schemas"][0]["title"], "Product");
}

#[tokio::test]
async fn get_app_detail_and_missing_app() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;

    let response = send(&router, "GET", &format!("/apps/{app_id}/"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["description"], "demo shop");

    let response = send(&router, "GET", "/apps/99/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_schema_titles_rejected_at_creation() {
    let response = send(
        &test_app(),
        "POST",
        "/apps/",
        Some(json!({
            "name": "Bad",
            "schemas": [{"title": "Product"}, {"title": "PRODUCT"}]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("duplicate"));
}

#[tokio::test]
async fn reserved_title_datasets_rejected() {
    let response = send(
        &test_app(),
        "POST",
        "/apps/",
        Some(json!({"name": "Bad", "schemas": [{"title": "Datasets"}]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]["message"]
        .as_str()
        .unwrap()
        .contains("reserved"));
}

#[tokio::test]
async fn malformed_app_body_is_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/apps/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

// -- Datasets -----------------------------------------------------------------

#[tokio::test]
async fn dataset_crud_lifecycle() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(&router, "GET", &format!("/apps/{app_id}/datasets/"), None).await;
    let datasets = body_json(response).await;
    assert_eq!(datasets.as_array().unwrap().len(), 1);
    assert_eq!(datasets[0]["app"], app_id);

    let response = send(
        &router,
        "PUT",
        &format!("/apps/{app_id}/datasets/{dataset_id}/"),
        Some(json!({"name": "renamed", "description": "updated"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "renamed");

    let response = send(
        &router,
        "DELETE",
        &format!("/apps/{app_id}/datasets/{dataset_id}/"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &router,
        "GET",
        &format!("/apps/{app_id}/datasets/{dataset_id}/"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dataset_under_wrong_app_is_not_found() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    // Second app must not see the first app's dataset.
    let response = send(
        &router,
        "POST",
        "/apps/",
        Some(json!({"name": "Other", "schemas": []})),
    )
    .await;
    let other_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(
        &router,
        "GET",
        &format!("/apps/{other_id}/datasets/{dataset_id}/"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Resources ----------------------------------------------------------------

#[tokio::test]
async fn create_resource_returns_201_with_identity() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(
        &router,
        "POST",
        &format!("/apps/{app_id}/datasets/{dataset_id}/product/"),
        Some(json!({"sku": "A1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["resource_type"], "product");
    assert_eq!(body["dataset"], dataset_id);
    assert_eq!(body["value"]["sku"], "A1");
}

#[tokio::test]
async fn missing_required_field_returns_400_naming_it() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;
    let base = format!("/apps/{app_id}/datasets/{dataset_id}/product/");

    let response = send(&router, "POST", &base, Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("sku"));

    // The failed create must not have touched the store.
    let response = send(&router, "GET", &base, None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unsupported_type_fails_before_storage() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(
        &router,
        "POST",
        &format!("/apps/{app_id}/datasets/{dataset_id}/gadget/"),
        Some(json!({"sku": "A1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNSUPPORTED_RESOURCE_TYPE");
    assert!(body["error"]["message"].as_str().unwrap().contains("product"));

    // Nothing was stored under any type.
    let response = send(
        &router,
        "GET",
        &format!("/apps/{app_id}/datasets/{dataset_id}/dump"),
        None,
    )
    .await;
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn resource_type_resolution_is_case_insensitive() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(
        &router,
        "POST",
        &format!("/apps/{app_id}/datasets/{dataset_id}/PRODUCT/"),
        Some(json!({"sku": "A1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    // The stored type tag is always lower-cased.
    assert_eq!(body_json(response).await["resource_type"], "product");

    let response = send(
        &router,
        "GET",
        &format!("/apps/{app_id}/datasets/{dataset_id}/Product/"),
        None,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn resource_get_update_delete() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;
    let base = format!("/apps/{app_id}/datasets/{dataset_id}/product");

    let response = send(&router, "POST", &format!("{base}/"), Some(json!({"sku": "A1"}))).await;
    let resource_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(&router, "GET", &format!("{base}/{resource_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["value"]["sku"], "A1");

    let response = send(
        &router,
        "PUT",
        &format!("{base}/{resource_id}"),
        Some(json!({"sku": "Z9"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], resource_id);
    assert_eq!(body["value"]["sku"], "Z9");

    let response = send(&router, "DELETE", &format!("{base}/{resource_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&router, "GET", &format!("{base}/{resource_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_invalid_payload_leaves_record_unchanged() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;
    let base = format!("/apps/{app_id}/datasets/{dataset_id}/product");

    let response = send(&router, "POST", &format!("{base}/"), Some(json!({"sku": "A1"}))).await;
    let resource_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(
        &router,
        "PUT",
        &format!("{base}/{resource_id}"),
        Some(json!({"sku": 42})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&router, "GET", &format!("{base}/{resource_id}"), None).await;
    assert_eq!(body_json(response).await["value"]["sku"], "A1");
}

#[tokio::test]
async fn wrong_type_lookup_never_crosses_types() {
    let router = test_app();
    // App with two types so the "wrong" type still resolves.
    let response = send(
        &router,
        "POST",
        "/apps/",
        Some(json!({
            "name": "Shop",
            "schemas": [
                {"title": "Product", "type": "object"},
                {"title": "Order", "type": "object"}
            ]
        })),
    )
    .await;
    let app_id = body_json(response).await["id"].as_i64().unwrap();
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(
        &router,
        "POST",
        &format!("/apps/{app_id}/datasets/{dataset_id}/product/"),
        Some(json!({"sku": "A1"})),
    )
    .await;
    let resource_id = body_json(response).await["id"].as_i64().unwrap();

    // Addressing the product's id under the order type is not-found, and
    // the delete attempt must not remove the product.
    let order_path = format!("/apps/{app_id}/datasets/{dataset_id}/order/{resource_id}");
    let response = send(&router, "GET", &order_path, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&router, "DELETE", &order_path, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &router,
        "GET",
        &format!("/apps/{app_id}/datasets/{dataset_id}/product/{resource_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- OpenAPI + Swagger --------------------------------------------------------

#[tokio::test]
async fn openapi_document_covers_resource_and_dataset_paths() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;

    let response = send(&router, "GET", &format!("/apps/{app_id}/schema"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["openapi"], "3.0.0");
    assert_eq!(doc["info"]["title"], "Shop API");

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key(&format!("/apps/{app_id}/datasets/{{dataset_id}}/product/")));
    assert!(paths.contains_key(&format!(
        "/apps/{app_id}/datasets/{{dataset_id}}/product/{{resource_id}}/"
    )));
    assert!(paths.contains_key(&format!("/apps/{app_id}/datasets/")));
    assert!(paths.contains_key(&format!("/apps/{app_id}/datasets/{{dataset_id}}/dump")));

    let schemas = doc["components"]["schemas"].as_object().unwrap();
    assert!(schemas.contains_key("product"));
    assert!(schemas.contains_key("dataset"));
}

#[tokio::test]
async fn swagger_page_links_schema_endpoint() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;

    let response = send(&router, "GET", &format!("/apps/{app_id}/swagger"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains(&format!("/apps/{app_id}/schema")));
}

// -- Dump ---------------------------------------------------------------------

#[tokio::test]
async fn json_dump_groups_by_type_in_insertion_order() {
    let router = test_app();
    let response = send(
        &router,
        "POST",
        "/apps/",
        Some(json!({
            "name": "Shop",
            "schemas": [
                {"title": "Product", "type": "object"},
                {"title": "Order", "type": "object"}
            ]
        })),
    )
    .await;
    let app_id = body_json(response).await["id"].as_i64().unwrap();
    let dataset_id = create_dataset(&router, app_id).await;
    let base = format!("/apps/{app_id}/datasets/{dataset_id}");

    for (ty, value) in [
        ("product", json!({"sku": "A1"})),
        ("order", json!({"no": 1})),
        ("product", json!({"sku": "B2"})),
    ] {
        let response = send(&router, "POST", &format!("{base}/{ty}/"), Some(value)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&router, "GET", &format!("{base}/dump"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "product": [{"sku": "A1"}, {"sku": "B2"}],
            "order": [{"no": 1}]
        })
    );
}

#[tokio::test]
async fn xlsx_dump_is_an_attachment() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;
    let base = format!("/apps/{app_id}/datasets/{dataset_id}");

    for sku in ["A1", "B2"] {
        send(
            &router,
            "POST",
            &format!("{base}/product/"),
            Some(json!({"sku": sku})),
        )
        .await;
    }

    let response = send(&router, "GET", &format!("{base}/dump?type=xlsx"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=dataset_{dataset_id}.xlsx")
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn invalid_dump_type_is_client_error() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let dataset_id = create_dataset(&router, app_id).await;

    let response = send(
        &router,
        "GET",
        &format!("/apps/{app_id}/datasets/{dataset_id}/dump?type=csv"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]["message"]
        .as_str()
        .unwrap()
        .contains("csv"));
}

#[tokio::test]
async fn dump_of_missing_dataset_is_not_found() {
    let router = test_app();
    let app_id = create_shop_app(&router).await;
    let response = send(&router, "GET", &format!("/apps/{app_id}/datasets/42/dump"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
