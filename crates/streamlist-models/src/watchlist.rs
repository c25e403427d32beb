use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const RATING_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank, higher means more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A title the user added to their own list. Never fetched from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchListEntry {
    pub id: u64, // milliseconds since epoch, bumped to stay strictly increasing
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rating: u8,
    pub date_added: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// User input for a new entry, before an id and timestamps are assigned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub genre: String,
    pub priority: Priority,
    pub notes: String,
    pub rating: u8,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    /// Build the entry. Returns None when the title is blank.
    pub fn into_entry(self, id: u64, created_at: DateTime<Utc>) -> Option<WatchListEntry> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(WatchListEntry {
            id,
            title: title.to_string(),
            genre: self.genre.trim().to_string(),
            priority: self.priority,
            notes: self.notes,
            rating: self.rating.min(RATING_MAX),
            date_added: created_at.date_naive(),
            completed: false,
            favorite: false,
            created_at,
        })
    }
}

/// Partial edit of an entry; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub rating: Option<u8>,
}

impl WatchListEntry {
    pub fn apply_patch(&mut self, patch: EntryPatch) {
        if let Some(title) = patch.title {
            let title = title.trim();
            // A blank title would make the entry unfindable; keep the old one
            if !title.is_empty() {
                self.title = title.to_string();
            }
        }
        if let Some(genre) = patch.genre {
            self.genre = genre.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating.min(RATING_MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_blank_draft_rejected() {
        assert!(EntryDraft::new("   ").into_entry(1, instant()).is_none());
    }

    #[test]
    fn test_draft_clamps_rating_and_trims() {
        let entry = EntryDraft::new("  Dune ")
            .with_genre(" sci-fi ")
            .with_rating(42)
            .into_entry(7, instant())
            .unwrap();
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.genre, "sci-fi");
        assert_eq!(entry.rating, 10);
        assert_eq!(entry.date_added, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(!entry.completed);
        assert!(!entry.favorite);
    }

    #[test]
    fn test_patch_keeps_title_when_blank() {
        let mut entry = EntryDraft::new("Alien").into_entry(1, instant()).unwrap();
        entry.apply_patch(EntryPatch {
            title: Some(" ".to_string()),
            priority: Some(Priority::High),
            ..EntryPatch::default()
        });
        assert_eq!(entry.title, "Alien");
        assert_eq!(entry.priority, Priority::High);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = EntryDraft::new("Heat").into_entry(5, instant()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["dateAdded"], "2024-03-09");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("createdAt").is_some());
    }
}
