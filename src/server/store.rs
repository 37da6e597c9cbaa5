//! Favorite store: authoritative favorite state per session.
//!
//! DESIGN
//! ======
//! The toggle endpoint only needs two operations, so the store is a small
//! async trait. [`InMemoryFavoriteStore`] keeps a set of document ids per
//! session behind an async `RwLock`; the lock is held only for the set
//! operation itself. An optional catalog restricts which document ids
//! exist.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("document not found: {0}")]
    UnknownDocument(String),
    #[error("store unavailable: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Flip the favorite flag of `document_id` for `session` and return the
    /// resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownDocument`] for ids outside the catalog,
    /// or [`StoreError::Backend`] if the state cannot be persisted.
    async fn toggle(&self, session: &str, document_id: &str) -> Result<bool, StoreError>;

    /// Current favorite flag of `document_id` for `session`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FavoriteStore::toggle`].
    async fn is_favorited(&self, session: &str, document_id: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<String, HashSet<String>>>,
    catalog: Option<HashSet<String>>,
}

impl InMemoryFavoriteStore {
    /// Store that accepts any document id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that only knows the given documents. An empty list means any id.
    #[must_use]
    pub fn with_catalog<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog: HashSet<String> = documents.into_iter().map(Into::into).collect();
        Self { favorites: RwLock::default(), catalog: (!catalog.is_empty()).then_some(catalog) }
    }

    /// Number of favorites held by `session`.
    pub async fn count(&self, session: &str) -> usize {
        self.favorites
            .read()
            .await
            .get(session)
            .map_or(0, HashSet::len)
    }

    fn check_known(&self, document_id: &str) -> Result<(), StoreError> {
        match &self.catalog {
            Some(catalog) if !catalog.contains(document_id) => Err(StoreError::UnknownDocument(document_id.to_owned())),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn toggle(&self, session: &str, document_id: &str) -> Result<bool, StoreError> {
        self.check_known(document_id)?;

        let mut favorites = self.favorites.write().await;
        let set = favorites.entry(session.to_owned()).or_default();
        if set.remove(document_id) {
            Ok(false)
        } else {
            set.insert(document_id.to_owned());
            Ok(true)
        }
    }

    async fn is_favorited(&self, session: &str, document_id: &str) -> Result<bool, StoreError> {
        self.check_known(document_id)?;

        let favorites = self.favorites.read().await;
        Ok(favorites
            .get(session)
            .is_some_and(|set| set.contains(document_id)))
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
