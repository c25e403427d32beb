use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use streamlist_models::page::clamp_page;
use streamlist_models::{Page, Priority, WatchListEntry};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Newest first
    #[default]
    DateAdded,
    Title,
    /// High before medium before low
    Priority,
    /// Highest first
    Rating,
    Genre,
}

/// Everything that decides which entries a list view shows and in what order.
/// Persisted as the last-used view state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewFilters {
    pub search_term: String,
    pub genre_filter: Option<String>,
    pub priority_filter: Option<Priority>,
    pub completed_visible: bool,
    pub sort_key: SortKey,
}

impl Default for ViewFilters {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            genre_filter: None,
            priority_filter: None,
            completed_visible: true,
            sort_key: SortKey::default(),
        }
    }
}

impl ViewFilters {
    pub fn matches(&self, entry: &WatchListEntry) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if !term.is_empty() && !entry.title.to_lowercase().contains(&term) {
            return false;
        }
        if let Some(genre) = &self.genre_filter {
            if &entry.genre != genre {
                return false;
            }
        }
        if let Some(priority) = self.priority_filter {
            if entry.priority != priority {
                return false;
            }
        }
        self.completed_visible || !entry.completed
    }
}

/// Sort key that ignores case and accents: NFD decomposition with the
/// combining marks dropped, then lowercased ("Élan" sorts as "elan")
fn collation_key(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect::<String>().to_lowercase()
}

/// Dictionary-style order, falling back to the exact text so distinct
/// strings never compare equal
fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn compare(key: SortKey, a: &WatchListEntry, b: &WatchListEntry) -> Ordering {
    match key {
        SortKey::Title => compare_text(&a.title, &b.title),
        SortKey::Genre => compare_text(&a.genre, &b.genre),
        SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::Rating => b.rating.cmp(&a.rating),
        SortKey::DateAdded => b.created_at.cmp(&a.created_at),
    }
}

/// Filter and order entries for display. Pure; ties keep input order.
pub fn derive(items: &[WatchListEntry], filters: &ViewFilters) -> Vec<WatchListEntry> {
    let mut visible: Vec<WatchListEntry> = items
        .iter()
        .filter(|entry| filters.matches(entry))
        .cloned()
        .collect();
    visible.sort_by(|a, b| compare(filters.sort_key, a, b));
    visible
}

/// Slice `items` into the requested page, clamping the page into range
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Page<T> {
    let per_page = per_page.max(1) as usize;
    let total_pages = u32::try_from(items.len().div_ceil(per_page)).unwrap_or(u32::MAX).max(1);
    let page_number = clamp_page(page, total_pages);

    let start = (page_number as usize - 1) * per_page;
    let end = (start + per_page).min(items.len());
    let slice = items.get(start..end).unwrap_or(&[]).to_vec();
    Page::new(slice, page_number, total_pages)
}

/// Page numbers a pager shows: at most `max_visible`, centered on `current`
/// where possible and shifted to stay inside `1..=total`
pub fn page_window(current: u32, total: u32, max_visible: u32) -> Vec<u32> {
    if total == 0 || max_visible == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = total.min(start + max_visible - 1);
    if end - start < max_visible - 1 {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use streamlist_models::EntryDraft;

    fn entry(id: u64, title: &str, genre: &str, priority: Priority, rating: u8) -> WatchListEntry {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id as i64);
        EntryDraft::new(title)
            .with_genre(genre)
            .with_priority(priority)
            .with_rating(rating)
            .into_entry(id, created)
            .unwrap()
    }

    fn sample() -> Vec<WatchListEntry> {
        vec![
            entry(1, "alien", "sci-fi", Priority::Low, 7),
            entry(2, "Heat", "crime", Priority::High, 9),
            entry(3, "Brazil", "sci-fi", Priority::Medium, 9),
        ]
    }

    fn titles(entries: &[WatchListEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_priority_sort() {
        let filters = ViewFilters {
            sort_key: SortKey::Priority,
            ..ViewFilters::default()
        };
        let sorted = derive(&sample(), &filters);
        let priorities: Vec<Priority> = sorted.iter().map(|e| e.priority).collect();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn test_default_sort_newest_first() {
        let sorted = derive(&sample(), &ViewFilters::default());
        assert_eq!(titles(&sorted), vec!["Brazil", "Heat", "alien"]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let filters = ViewFilters {
            sort_key: SortKey::Title,
            ..ViewFilters::default()
        };
        assert_eq!(titles(&derive(&sample(), &filters)), vec!["alien", "Brazil", "Heat"]);
    }

    #[test]
    fn test_title_sort_ignores_accents() {
        let items = vec![
            entry(1, "Zodiac", "crime", Priority::Low, 0),
            entry(2, "Élan", "drama", Priority::Low, 0),
            entry(3, "eden", "drama", Priority::Low, 0),
        ];
        let filters = ViewFilters {
            sort_key: SortKey::Title,
            ..ViewFilters::default()
        };
        assert_eq!(titles(&derive(&items, &filters)), vec!["eden", "Élan", "Zodiac"]);
    }

    #[test]
    fn test_rating_ties_keep_input_order() {
        let filters = ViewFilters {
            sort_key: SortKey::Rating,
            ..ViewFilters::default()
        };
        assert_eq!(titles(&derive(&sample(), &filters)), vec!["Heat", "Brazil", "alien"]);
    }

    #[test]
    fn test_filters_combine() {
        let mut items = sample();
        items[2].completed = true;

        let filters = ViewFilters {
            search_term: "  A ".to_string(),
            genre_filter: Some("sci-fi".to_string()),
            completed_visible: false,
            ..ViewFilters::default()
        };
        assert_eq!(titles(&derive(&items, &filters)), vec!["alien"]);

        let filters = ViewFilters {
            priority_filter: Some(Priority::High),
            ..ViewFilters::default()
        };
        assert_eq!(titles(&derive(&items, &filters)), vec!["Heat"]);
    }

    #[test]
    fn test_derive_is_deterministic_and_idempotent() {
        let filters = ViewFilters {
            sort_key: SortKey::Genre,
            ..ViewFilters::default()
        };
        let once = derive(&sample(), &filters);
        assert_eq!(once, derive(&sample(), &filters));
        assert_eq!(once, derive(&once, &filters));
    }

    #[test]
    fn test_filters_deserialize_with_defaults() {
        let filters: ViewFilters = serde_json::from_str(r#"{"sortKey":"rating"}"#).unwrap();
        assert_eq!(filters.sort_key, SortKey::Rating);
        assert!(filters.completed_visible);
        assert!(filters.genre_filter.is_none());
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);

        let page = paginate(&items, 0, 10);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.items.len(), 10);

        assert_eq!(paginate(&items, 99, 10).page_number, 3);

        let empty = paginate::<u32>(&[], 4, 10);
        assert_eq!((empty.page_number, empty.total_pages), (1, 1));
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(2, 3, 5), vec![1, 2, 3]);
        assert!(page_window(1, 0, 5).is_empty());
    }
}
