use serde::{Deserialize, Serialize};

/// A movie as returned by catalog list endpoints.
///
/// Field names follow the provider's payload so a favorited item can be
/// persisted verbatim and read back by older data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>, // "YYYY-MM-DD", provider sends "" for unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>, // 0-10
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl CatalogItem {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            vote_average: None,
            genre_ids: Vec::new(),
        }
    }

    /// Release year parsed from the leading `YYYY` of the release date
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    /// Full poster URL for the given image base, if the item has a poster
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}
