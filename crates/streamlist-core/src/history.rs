use std::sync::Arc;
use streamlist_models::CatalogItem;
use tracing::warn;
use crate::store::{keys, Store};

pub const SEARCH_HISTORY_LIMIT: usize = 10;
pub const RECENTLY_VIEWED_LIMIT: usize = 20;

/// Past search terms, most recent first, without repeats
pub struct SearchHistory {
    store: Arc<Store>,
}

impl SearchHistory {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Blank terms are ignored. Failures are logged; history is a convenience.
    pub fn record(&self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        let result = self.store.update(keys::SEARCH_HISTORY, Vec::<String>::new(), |terms| {
            terms.retain(|t| t != term);
            terms.insert(0, term.to_string());
            terms.truncate(SEARCH_HISTORY_LIMIT);
        });
        if let Err(e) = result {
            warn!("Failed to record search term: {}", e);
        }
    }

    pub fn list(&self) -> Vec<String> {
        self.store.read(keys::SEARCH_HISTORY, Vec::new())
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::SEARCH_HISTORY) {
            warn!("Failed to clear search history: {}", e);
        }
    }
}

/// Catalog items whose detail view was opened, most recent first
pub struct RecentlyViewed {
    store: Arc<Store>,
}

impl RecentlyViewed {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn record(&self, item: &CatalogItem) {
        let result = self.store.update(keys::RECENTLY_VIEWED, Vec::<CatalogItem>::new(), |items| {
            items.retain(|i| i.id != item.id);
            items.insert(0, item.clone());
            items.truncate(RECENTLY_VIEWED_LIMIT);
        });
        if let Err(e) = result {
            warn!("Failed to record recently viewed item {}: {}", item.id, e);
        }
    }

    pub fn list(&self) -> Vec<CatalogItem> {
        self.store.read(keys::RECENTLY_VIEWED, Vec::new())
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::RECENTLY_VIEWED) {
            warn!("Failed to clear recently viewed: {}", e);
        }
    }
}
