use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use streamlist_models::{Event, EventKind, EventPayload};
use tracing::{debug, warn};
use crate::ids::IdGenerator;
use crate::store::{keys, Store};

/// Most recent events kept in the log
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Build a payload from `(field, value)` pairs
pub fn payload<I, K>(fields: I) -> EventPayload
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Bounded, newest-first record of user actions.
///
/// Recording is best effort: a failed write is logged and dropped, and the
/// log is the first thing the store evicts when it runs out of room.
pub struct EventLog {
    store: Arc<Store>,
    ids: IdGenerator,
}

impl EventLog {
    pub fn new(store: Arc<Store>) -> Self {
        let newest = store
            .read::<Vec<Event>>(keys::USER_EVENTS, Vec::new())
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0);
        Self {
            store,
            ids: IdGenerator::seeded(newest),
        }
    }

    pub fn record(&self, kind: EventKind, payload: EventPayload) {
        // Id and timestamp are taken under the namespace lock so the stored
        // order always matches id order
        let result = self.store.update(keys::USER_EVENTS, Vec::<Event>::new(), |events| {
            let event = Event {
                id: self.ids.next(),
                kind,
                timestamp: Utc::now(),
                payload,
            };
            events.insert(0, event);
            events.truncate(EVENT_LOG_CAPACITY);
            events.len()
        });

        match result {
            Ok(len) => debug!("Recorded {:?} event ({} in log)", kind, len),
            Err(e) => warn!("Dropped {:?} event: {}", kind, e),
        }
    }

    /// Newest first
    pub fn list(&self) -> Vec<Event> {
        self.store.read(keys::USER_EVENTS, Vec::new())
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::USER_EVENTS) {
            warn!("Failed to clear event log: {}", e);
        }
    }
}
