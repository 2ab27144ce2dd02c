//! In-memory record store.
//!
//! A single [`Database`] holds the three record tables behind one
//! `parking_lot::RwLock`. IDs are sequential per table, so iterating a
//! table in id order is insertion order. All returned records are clones;
//! the lock is never held across a call boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::model::{App, Dataset, Resource};

#[derive(Debug, Default)]
struct Tables {
    next_app_id: i64,
    next_dataset_id: i64,
    next_resource_id: i64,
    apps: BTreeMap<i64, App>,
    datasets: BTreeMap<i64, Dataset>,
    resources: BTreeMap<i64, Resource>,
}

/// Keyed storage of apps, datasets, and resources.
///
/// Cheaply cloneable; clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: Arc<RwLock<Tables>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Apps -----------------------------------------------------------

    /// Persist a new app, assigning its id.
    pub fn create_app(&self, name: String, description: Option<String>, schemas: Vec<Value>) -> App {
        let mut t = self.tables.write();
        t.next_app_id += 1;
        let app = App {
            id: t.next_app_id,
            name,
            description,
            schemas,
        };
        t.apps.insert(app.id, app.clone());
        app
    }

    pub fn list_apps(&self) -> Vec<App> {
        self.tables.read().apps.values().cloned().collect()
    }

    pub fn get_app(&self, id: i64) -> Option<App> {
        self.tables.read().apps.get(&id).cloned()
    }

    /// Delete an app and cascade to its datasets and their resources.
    ///
    /// Returns `false` if the app does not exist.
    pub fn delete_app(&self, id: i64) -> bool {
        let mut t = self.tables.write();
        if t.apps.remove(&id).is_none() {
            return false;
        }
        let dataset_ids: Vec<i64> = t
            .datasets
            .values()
            .filter(|d| d.app == id)
            .map(|d| d.id)
            .collect();
        for ds_id in dataset_ids {
            t.datasets.remove(&ds_id);
            t.resources.retain(|_, r| r.dataset != ds_id);
        }
        true
    }

    // -- Datasets -------------------------------------------------------

    /// Persist a new dataset under `app_id`, assigning its id.
    ///
    /// Returns `None` when the owning app does not exist.
    pub fn create_dataset(
        &self,
        app_id: i64,
        name: String,
        description: Option<String>,
    ) -> Option<Dataset> {
        let mut t = self.tables.write();
        if !t.apps.contains_key(&app_id) {
            return None;
        }
        t.next_dataset_id += 1;
        let dataset = Dataset {
            id: t.next_dataset_id,
            name,
            description,
            app: app_id,
        };
        t.datasets.insert(dataset.id, dataset.clone());
        Some(dataset)
    }

    /// All datasets owned by `app_id`, in insertion order.
    pub fn list_datasets(&self, app_id: i64) -> Vec<Dataset> {
        self.tables
            .read()
            .datasets
            .values()
            .filter(|d| d.app == app_id)
            .cloned()
            .collect()
    }

    pub fn get_dataset(&self, id: i64) -> Option<Dataset> {
        self.tables.read().datasets.get(&id).cloned()
    }

    /// Overwrite a dataset's name and description in place.
    pub fn update_dataset(
        &self,
        id: i64,
        name: String,
        description: Option<String>,
    ) -> Option<Dataset> {
        let mut t = self.tables.write();
        let dataset = t.datasets.get_mut(&id)?;
        dataset.name = name;
        dataset.description = description;
        Some(dataset.clone())
    }

    /// Delete a dataset and cascade to its resources.
    pub fn delete_dataset(&self, id: i64) -> bool {
        let mut t = self.tables.write();
        if t.datasets.remove(&id).is_none() {
            return false;
        }
        t.resources.retain(|_, r| r.dataset != id);
        true
    }

    // -- Resources ------------------------------------------------------

    /// Persist a new resource under `dataset_id`, assigning its id.
    ///
    /// Returns `None` when the owning dataset does not exist.
    pub fn create_resource(
        &self,
        dataset_id: i64,
        resource_type: String,
        value: Value,
    ) -> Option<Resource> {
        let mut t = self.tables.write();
        if !t.datasets.contains_key(&dataset_id) {
            return None;
        }
        t.next_resource_id += 1;
        let resource = Resource {
            id: t.next_resource_id,
            resource_type,
            dataset: dataset_id,
            value,
        };
        t.resources.insert(resource.id, resource.clone());
        Some(resource)
    }

    /// Resources under `dataset_id`, optionally narrowed to one type,
    /// in insertion order.
    pub fn list_resources(&self, dataset_id: i64, resource_type: Option<&str>) -> Vec<Resource> {
        self.tables
            .read()
            .resources
            .values()
            .filter(|r| r.dataset == dataset_id)
            .filter(|r| resource_type.map_or(true, |ty| r.resource_type == ty))
            .cloned()
            .collect()
    }

    /// Look up a resource by id and type. The type is part of the key:
    /// a matching id under a different type is not found.
    pub fn get_resource(&self, id: i64, resource_type: &str) -> Option<Resource> {
        self.tables
            .read()
            .resources
            .get(&id)
            .filter(|r| r.resource_type == resource_type)
            .cloned()
    }

    /// Overwrite a resource's value in place; id and type are unchanged.
    pub fn update_resource(&self, id: i64, resource_type: &str, value: Value) -> Option<Resource> {
        let mut t = self.tables.write();
        let resource = t
            .resources
            .get_mut(&id)
            .filter(|r| r.resource_type == resource_type)?;
        resource.value = value;
        Some(resource.clone())
    }

    /// Delete by id and type. A wrong-type delete is a no-op returning
    /// `false`, never a cross-type delete.
    pub fn delete_resource(&self, id: i64, resource_type: &str) -> bool {
        let mut t = self.tables.write();
        match t.resources.get(&id) {
            Some(r) if r.resource_type == resource_type => {
                t.resources.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Total record count across all tables. Used by the readiness probe.
    pub fn len(&self) -> usize {
        let t = self.tables.read();
        t.apps.len() + t.datasets.len() + t.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
