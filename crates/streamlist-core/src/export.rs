use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use streamlist_models::{Event, WatchListEntry};
use tracing::info;
use crate::store::{keys, Store};

/// Snapshot of the user's data, written as one JSON document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub stream_items: Vec<WatchListEntry>,
    pub user_events: Vec<Event>,
    pub search_history: Vec<String>,
    pub export_date: DateTime<Utc>,
}

pub fn build_export(store: &Store) -> ExportDocument {
    build_export_at(store, Utc::now())
}

pub fn build_export_at(store: &Store, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        stream_items: store.read(keys::WATCHLIST_ITEMS, Vec::new()),
        user_events: store.read(keys::USER_EVENTS, Vec::new()),
        search_history: store.read(keys::SEARCH_HISTORY, Vec::new()),
        export_date: now,
    }
}

impl ExportDocument {
    /// `streamlist-export-YYYY-MM-DD.json`
    pub fn file_name(&self) -> String {
        format!("streamlist-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    /// Write the document into `dir`, creating it if needed. Returns the file path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        info!(
            "Exported {} items and {} events to {:?}",
            self.stream_items.len(),
            self.user_events.len(),
            path
        );
        Ok(path)
    }
}
