use std::sync::Arc;
use streamlist_models::CatalogItem;
use tracing::debug;
use crate::store::{keys, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// True when the item was a favorite and has been removed
    pub removed: bool,
}

/// Catalog items the user starred, kept in insertion order with unique ids
pub struct FavoritesRegistry {
    store: Arc<Store>,
}

impl FavoritesRegistry {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<CatalogItem> {
        self.store.read(keys::FAVORITES, Vec::new())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.list().iter().any(|item| item.id == id)
    }

    /// Remove the item if present, otherwise append it
    pub fn toggle(&self, item: &CatalogItem) -> Result<ToggleOutcome, StoreError> {
        let removed = self.store.update(keys::FAVORITES, Vec::<CatalogItem>::new(), |favorites| {
            let before = favorites.len();
            favorites.retain(|f| f.id != item.id);
            if favorites.len() == before {
                favorites.push(item.clone());
                false
            } else {
                true
            }
        })?;
        debug!("Favorite {} {}", item.id, if removed { "removed" } else { "added" });
        Ok(ToggleOutcome { removed })
    }

    /// Returns false if the item was already a favorite
    pub fn add(&self, item: &CatalogItem) -> Result<bool, StoreError> {
        self.store.update(keys::FAVORITES, Vec::<CatalogItem>::new(), |favorites| {
            if favorites.iter().any(|f| f.id == item.id) {
                return false;
            }
            favorites.push(item.clone());
            true
        })
    }

    /// Returns false if no favorite had this id
    pub fn remove(&self, id: u64) -> Result<bool, StoreError> {
        self.store.update(keys::FAVORITES, Vec::<CatalogItem>::new(), |favorites| {
            let before = favorites.len();
            favorites.retain(|f| f.id != id);
            favorites.len() != before
        })
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::FAVORITES)
    }
}
