//! Shared application state.

use datakit_core::Database;

/// State passed to every route handler. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
