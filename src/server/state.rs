//! Shared server state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Clone is required by Axum; the store is Arc-wrapped.

use std::sync::Arc;

use super::store::{FavoriteStore, InMemoryFavoriteStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FavoriteStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// State backed by an in-memory store limited to `known_documents`
    /// (any id when empty).
    #[must_use]
    pub fn in_memory(known_documents: &[String]) -> Self {
        Self::new(Arc::new(InMemoryFavoriteStore::with_catalog(known_documents.iter().cloned())))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
