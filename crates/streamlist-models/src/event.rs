use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EventPayload = serde_json::Map<String, serde_json::Value>;

/// A user action recorded in the event log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Search,
    MovieClick,
    AddFavorite,
    RemoveFavorite,
    WatchlistAdd,
    WatchlistDelete,
    WatchlistComplete,
    /// Kinds written by other versions of the app
    #[serde(other)]
    Unknown,
}
