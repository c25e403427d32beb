use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Time-based ids: the current Unix millisecond, bumped past the last id
/// handed out so ids stay strictly increasing even within one millisecond
/// or across a clock step backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after ids already persisted elsewhere
    pub fn seeded(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// Raise the floor to `last` if it is above the current one
    pub fn seed(&self, last: u64) {
        self.last.fetch_max(last, Ordering::SeqCst);
    }

    pub fn next(&self) -> u64 {
        self.next_at(Utc::now())
    }

    pub fn next_at(&self, now: DateTime<Utc>) -> u64 {
        let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let id = candidate.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, id, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return id,
                Err(actual) => last = actual,
            }
        }
    }
}
