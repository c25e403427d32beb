use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use streamlist_config::CatalogConfig;
use streamlist_models::{CatalogItem, DetailRecord, Review};
use crate::error::CatalogError;
use crate::request::DiscoverSort;
use crate::tmdb::api;
use crate::traits::{CatalogSource, ProviderPage};

/// HTTP transport for a TMDB-compatible catalog
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
            api_key: api_key.into(),
            image_base_url: CatalogConfig::default().image_base_url,
        }
    }

    /// Build from configuration. Fails when no API key is available.
    pub fn from_config(config: &CatalogConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| anyhow::anyhow!("Catalog API key is not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            api_key,
            image_base_url: config.image_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full poster URL under the configured image base
    pub fn poster_url(&self, item: &CatalogItem) -> Option<String> {
        item.poster_url(&self.image_base_url)
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<ProviderPage, CatalogError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query, page).await
    }

    async fn discover_movies(
        &self,
        page: u32,
        sort: DiscoverSort,
        genre: Option<u32>,
    ) -> Result<ProviderPage, CatalogError> {
        api::discover_movies(&self.client, &self.base_url, &self.api_key, page, sort, genre).await
    }

    async fn movie_detail(&self, movie_id: u64) -> Result<DetailRecord, CatalogError> {
        api::movie_detail(&self.client, &self.base_url, &self.api_key, movie_id).await
    }

    async fn movie_reviews(&self, movie_id: u64) -> Result<Vec<Review>, CatalogError> {
        api::movie_reviews(&self.client, &self.base_url, &self.api_key, movie_id).await
    }
}
