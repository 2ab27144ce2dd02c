//! OpenAPI 3.0 synthesis.
//!
//! A pure function of the app's identity, name, description, and schema
//! list: the same app state always yields a byte-identical document.
//! Object keys are emitted in insertion order (`serde_json` runs with
//! `preserve_order`), which is what keeps the output deterministic.
//!
//! Two path families are synthesized:
//!
//! - per resource type `t`: `/{prefix}/{t}/` (list, create) and
//!   `/{prefix}/{t}/{resource_id}/` (get, update, delete), where `prefix`
//!   embeds the app id and a `{dataset_id}` placeholder;
//! - the fixed dataset group under the app root, including the dump
//!   endpoint with its `dump_type` query parameter.
//!
//! Key collisions between the two families cannot occur: the `datasets`
//! segment is a reserved title, rejected by
//! [`SchemaSet::new`](crate::SchemaSet::new) when the app is created.

use serde_json::{json, Map, Value};

use datakit_core::App;

/// Synthesize the complete OpenAPI 3.0 document for an app.
pub fn document_for_app(app: &App) -> Value {
    let prefix = format!("apps/{}/datasets/{{dataset_id}}", app.id);
    let app_root = format!("apps/{}", app.id);

    let mut paths = Map::new();
    let mut schemas = Map::new();

    for schema in &app.schemas {
        let Some(title) = schema.get("title").and_then(Value::as_str) else {
            // Untitled schemas cannot occur for apps accepted by SchemaSet;
            // skip rather than emit an unaddressable path group.
            continue;
        };
        let t = title.to_lowercase();
        paths.extend(resource_paths(&prefix, &t));
        schemas.insert(t, schema.clone());
    }

    paths.extend(dataset_paths(&app_root));

    schemas.insert(
        "dataset".to_string(),
        json!({
            "title": "Dataset",
            "type": "object",
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "name": {"type": "string"},
                "description": {"type": "string"}
            }
        }),
    );

    json!({
        "openapi": "3.0.0",
        "info": {"title": format!("{} API", app.name), "version": "1.0.0"},
        "description": app.description,
        "paths": paths,
        "components": {
            "parameters": parameters_component(),
            "schemas": schemas,
        }
    })
}

/// The reusable `dataset_id` path parameter, the only entry in
/// `components.parameters`.
fn parameters_component() -> Value {
    json!({
        "dataset_id": {
            "name": "dataset_id",
            "in": "path",
            "description": "dataset id",
            "required": true,
            "schema": {"type": "integer", "format": "int64"}
        }
    })
}

fn dataset_id_ref() -> Value {
    json!({"$ref": "#/components/parameters/dataset_id"})
}

fn resource_id_param(t: &str) -> Value {
    json!({
        "name": "resource_id",
        "in": "path",
        "description": format!("{t} id"),
        "required": true,
        "schema": {"type": "integer", "format": "int64"}
    })
}

fn schema_ref(t: &str) -> Value {
    json!({"$ref": format!("#/components/schemas/{t}")})
}

fn dataset_schema_ref() -> Value {
    json!({"$ref": "#/components/schemas/dataset"})
}

/// CRUD path-operation groups for one resource type.
fn resource_paths(prefix: &str, t: &str) -> Map<String, Value> {
    let collection = json!({
        "get": {
            "summary": format!("List {t}"),
            "description": format!("List all {t}"),
            "operationId": format!("list_{t}"),
            "parameters": [dataset_id_ref()],
            "responses": {
                "200": {
                    "description": format!("List of {t}"),
                    "content": {
                        "application/json": {
                            "schema": {"type": "array", "items": schema_ref(t)}
                        }
                    }
                }
            }
        },
        "post": {
            "summary": format!("Create {t}"),
            "description": format!("Create a new {t}"),
            "operationId": format!("create_{t}"),
            "parameters": [dataset_id_ref()],
            "requestBody": {
                "description": format!("{t} to create"),
                "content": {"application/json": {"schema": schema_ref(t)}},
                "required": true
            },
            "responses": {
                "201": {
                    "description": format!("{t} created"),
                    "content": {"application/json": {"schema": schema_ref(t)}}
                }
            }
        }
    });

    let detail = json!({
        "get": {
            "summary": format!("Get {t}"),
            "description": format!("Get a {t}"),
            "operationId": format!("get_{t}"),
            "parameters": [resource_id_param(t), dataset_id_ref()],
            "responses": {
                "200": {
                    "description": format!("{t} found"),
                    "content": {"application/json": {"schema": schema_ref(t)}}
                }
            }
        },
        "put": {
            "summary": format!("Update {t}"),
            "description": format!("Update a {t}"),
            "operationId": format!("update_{t}"),
            "parameters": [resource_id_param(t), dataset_id_ref()],
            "requestBody": {
                "description": format!("{t} to update"),
                "content": {"application/json": {"schema": schema_ref(t)}},
                "required": true
            },
            "responses": {
                "200": {
                    "description": format!("{t} updated"),
                    "content": {"application/json": {"schema": schema_ref(t)}}
                }
            }
        },
        "delete": {
            "summary": format!("Delete {t}"),
            "description": format!("Delete a {t}"),
            "operationId": format!("delete_{t}"),
            "parameters": [resource_id_param(t), dataset_id_ref()],
            "responses": {"204": {"description": format!("{t} deleted")}}
        }
    });

    let mut paths = Map::new();
    paths.insert(format!("/{prefix}/{t}/"), collection);
    paths.insert(format!("/{prefix}/{t}/{{resource_id}}/"), detail);
    paths
}

/// The fixed dataset CRUD and dump paths. Independent of the schema list.
fn dataset_paths(app_root: &str) -> Map<String, Value> {
    let collection = json!({
        "get": {
            "summary": "List dataset",
            "description": "List all dataset",
            "operationId": "list_dataset",
            "responses": {
                "200": {
                    "description": "List of dataset",
                    "content": {
                        "application/json": {
                            "schema": {"type": "array", "items": dataset_schema_ref()}
                        }
                    }
                }
            }
        },
        "post": {
            "summary": "Create dataset",
            "description": "Create a new dataset",
            "operationId": "create_dataset",
            "requestBody": {
                "description": "Dataset to create",
                "content": {"application/json": {"schema": dataset_schema_ref()}},
                "required": true
            },
            "responses": {
                "201": {
                    "description": "Dataset created",
                    "content": {"application/json": {"schema": dataset_schema_ref()}}
                }
            }
        }
    });

    let detail = json!({
        "get": {
            "summary": "Get dataset",
            "description": "Get a dataset",
            "operationId": "get_dataset",
            "parameters": [dataset_id_ref()],
            "responses": {
                "200": {
                    "description": "Dataset found",
                    "content": {"application/json": {"schema": dataset_schema_ref()}}
                }
            }
        },
        "put": {
            "summary": "Update dataset",
            "description": "Update a dataset",
            "operationId": "update_dataset",
            "parameters": [dataset_id_ref()],
            "requestBody": {
                "description": "Dataset to update",
                "content": {"application/json": {"schema": dataset_schema_ref()}},
                "required": true
            },
            "responses": {
                "200": {
                    "description": "Dataset updated",
                    "content": {"application/json": {"schema": dataset_schema_ref()}}
                }
            }
        },
        "delete": {
            "summary": "Delete dataset",
            "description": "Delete a dataset",
            "operationId": "delete_dataset",
            "parameters": [dataset_id_ref()],
            "responses": {"204": {"description": "Dataset deleted"}}
        }
    });

    let dump = json!({
        "get": {
            "summary": "Dump dataset",
            "description": "Dump a dataset",
            "operationId": "dump_dataset",
            "parameters": [
                dataset_id_ref(),
                {
                    "name": "dump_type",
                    "in": "query",
                    "description": "Dump type",
                    "required": false,
                    "schema": {"type": "string", "enum": ["json", "xlsx"], "default": "json"}
                }
            ]
        }
    });

    let mut paths = Map::new();
    paths.insert(format!("/{app_root}/datasets/"), collection);
    paths.insert(format!("/{app_root}/datasets/{{dataset_id}}/"), detail);
    paths.insert(format!("/{app_root}/datasets/{{dataset_id}}/dump"), dump);
    paths
}
