use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use streamlist_models::{EntryDraft, EntryPatch, EventKind, WatchListEntry};
use tracing::{debug, info};
use crate::events::{payload, EventLog};
use crate::ids::IdGenerator;
use crate::pipeline::{derive, ViewFilters};
use crate::store::{keys, Store, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum WatchListAction {
    Add(WatchListEntry),
    Delete(u64),
    Update { id: u64, patch: EntryPatch },
    ToggleComplete(u64),
    ToggleFavorite(u64),
}

/// Apply one action to a list of entries.
///
/// Pure: actions naming an unknown id, and adds that reuse an existing id,
/// return the list unchanged.
pub fn reduce(entries: &[WatchListEntry], action: &WatchListAction) -> Vec<WatchListEntry> {
    let mut next = entries.to_vec();
    match action {
        WatchListAction::Add(entry) => {
            if !next.iter().any(|e| e.id == entry.id) {
                next.push(entry.clone());
            }
        }
        WatchListAction::Delete(id) => next.retain(|e| e.id != *id),
        WatchListAction::Update { id, patch } => {
            if let Some(entry) = next.iter_mut().find(|e| e.id == *id) {
                entry.apply_patch(patch.clone());
            }
        }
        WatchListAction::ToggleComplete(id) => {
            if let Some(entry) = next.iter_mut().find(|e| e.id == *id) {
                entry.completed = !entry.completed;
            }
        }
        WatchListAction::ToggleFavorite(id) => {
            if let Some(entry) = next.iter_mut().find(|e| e.id == *id) {
                entry.favorite = !entry.favorite;
            }
        }
    }
    next
}

/// The user's own watch list, persisted under `streamList_items`
pub struct WatchList {
    store: Arc<Store>,
    ids: IdGenerator,
    events: Arc<EventLog>,
}

impl WatchList {
    pub fn new(store: Arc<Store>, events: Arc<EventLog>) -> Self {
        let newest = store
            .read::<Vec<WatchListEntry>>(keys::WATCHLIST_ITEMS, Vec::new())
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0);
        Self {
            store,
            ids: IdGenerator::seeded(newest),
            events,
        }
    }

    pub fn entries(&self) -> Vec<WatchListEntry> {
        self.store.read(keys::WATCHLIST_ITEMS, Vec::new())
    }

    pub fn get(&self, id: u64) -> Option<WatchListEntry> {
        self.entries().into_iter().find(|e| e.id == id)
    }

    /// Apply an action to the persisted list. Returns whether anything changed.
    pub fn dispatch(&self, action: WatchListAction) -> Result<bool, StoreError> {
        self.store.update(keys::WATCHLIST_ITEMS, Vec::<WatchListEntry>::new(), |entries| {
            let next = reduce(entries, &action);
            let changed = next != *entries;
            *entries = next;
            changed
        })
    }

    /// Returns None without touching storage when the draft has a blank title
    pub fn add(&self, draft: EntryDraft) -> Result<Option<WatchListEntry>, StoreError> {
        let Some(entry) = draft.into_entry(self.ids.next(), Utc::now()) else {
            debug!("Ignoring watch list draft with a blank title");
            return Ok(None);
        };

        self.dispatch(WatchListAction::Add(entry.clone()))?;
        info!("Added '{}' to watch list", entry.title);
        self.events.record(
            EventKind::WatchlistAdd,
            payload([("itemId", json!(entry.id)), ("title", json!(entry.title))]),
        );
        Ok(Some(entry))
    }

    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let changed = self.dispatch(WatchListAction::Delete(id))?;
        if changed {
            self.events.record(EventKind::WatchlistDelete, payload([("itemId", json!(id))]));
        }
        Ok(changed)
    }

    pub fn update(&self, id: u64, patch: EntryPatch) -> Result<bool, StoreError> {
        self.dispatch(WatchListAction::Update { id, patch })
    }

    /// Returns the entry's new completed flag, or None for an unknown id
    pub fn toggle_complete(&self, id: u64) -> Result<Option<bool>, StoreError> {
        if !self.dispatch(WatchListAction::ToggleComplete(id))? {
            return Ok(None);
        }
        let completed = self.get(id).map(|e| e.completed);
        if let Some(completed) = completed {
            self.events.record(
                EventKind::WatchlistComplete,
                payload([("itemId", json!(id)), ("completed", json!(completed))]),
            );
        }
        Ok(completed)
    }

    /// Returns the entry's new favorite flag, or None for an unknown id
    pub fn toggle_favorite(&self, id: u64) -> Result<Option<bool>, StoreError> {
        if !self.dispatch(WatchListAction::ToggleFavorite(id))? {
            return Ok(None);
        }
        Ok(self.get(id).map(|e| e.favorite))
    }

    /// Entries the given filters let through, in display order
    pub fn visible(&self, filters: &ViewFilters) -> Vec<WatchListEntry> {
        derive(&self.entries(), filters)
    }

    pub fn save_filters(&self, filters: &ViewFilters) -> Result<(), StoreError> {
        self.store.write(keys::WATCHLIST_FILTERS, filters)
    }

    pub fn load_filters(&self) -> ViewFilters {
        self.store.read(keys::WATCHLIST_FILTERS, ViewFilters::default())
    }
}
