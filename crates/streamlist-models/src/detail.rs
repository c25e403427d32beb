use serde::{Deserialize, Serialize};
use crate::catalog_item::{CatalogItem, Genre};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailRecord {
    pub item: CatalogItem,
    pub runtime: Option<u32>, // minutes
    pub budget: u64,
    pub revenue: u64,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    pub vote_count: u32,
}

impl DetailRecord {
    /// Runtime split into (hours, minutes)
    pub fn runtime_hours_minutes(&self) -> Option<(u32, u32)> {
        self.runtime.filter(|m| *m > 0).map(|m| (m / 60, m % 60))
    }
}
