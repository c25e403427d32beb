use async_trait::async_trait;
use streamlist_models::{CatalogItem, DetailRecord, Review};
use crate::error::CatalogError;
use crate::request::DiscoverSort;

/// A list response as the provider reported it, before any clamping
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPage {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub total_pages: u32,
}

/// The catalog provider's read surface.
///
/// Implementations return fully decoded models; payload shape never leaks
/// past this boundary.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn search_movies(&self, query: &str, page: u32) -> Result<ProviderPage, CatalogError>;

    async fn discover_movies(
        &self,
        page: u32,
        sort: DiscoverSort,
        genre: Option<u32>,
    ) -> Result<ProviderPage, CatalogError>;

    async fn movie_detail(&self, movie_id: u64) -> Result<DetailRecord, CatalogError>;

    async fn movie_reviews(&self, movie_id: u64) -> Result<Vec<Review>, CatalogError>;
}
