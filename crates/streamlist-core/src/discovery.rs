use serde_json::json;
use std::sync::Arc;
use streamlist_catalog::{
    CatalogClient, CatalogError, CatalogQuery, CatalogSource, DetailFetcher, DetailView, LoadOutcome, SearchRequest,
};
use streamlist_models::{CatalogItem, EventKind, Page};
use tracing::debug;
use crate::events::{payload, EventLog};
use crate::favorites::{FavoritesRegistry, ToggleOutcome};
use crate::history::{RecentlyViewed, SearchHistory};
use crate::store::{Store, StoreError};

/// The discover screen's behavior: catalog browsing, the detail view, and
/// favorites, with the history and event bookkeeping each action implies.
pub struct DiscoverySession<S> {
    catalog: CatalogClient<S>,
    details: DetailFetcher<S>,
    favorites: FavoritesRegistry,
    history: SearchHistory,
    recent: RecentlyViewed,
    events: Arc<EventLog>,
}

impl<S: CatalogSource> DiscoverySession<S> {
    pub fn new(source: Arc<S>, store: Arc<Store>, events: Arc<EventLog>) -> Self {
        Self {
            catalog: CatalogClient::new(source.clone()),
            details: DetailFetcher::new(source),
            favorites: FavoritesRegistry::new(store.clone()),
            history: SearchHistory::new(store.clone()),
            recent: RecentlyViewed::new(store),
            events,
        }
    }

    pub fn catalog(&self) -> &CatalogClient<S> {
        &self.catalog
    }

    pub fn details(&self) -> &DetailFetcher<S> {
        &self.details
    }

    pub fn favorites(&self) -> &FavoritesRegistry {
        &self.favorites
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn recently_viewed(&self) -> &RecentlyViewed {
        &self.recent
    }

    /// Load a catalog page.
    ///
    /// Starting a search (search mode, page 1) records a `search` event. The
    /// term goes into search history once its results are applied.
    pub async fn load(&self, request: &SearchRequest) -> Result<LoadOutcome, CatalogError> {
        let term = match request.query() {
            CatalogQuery::Search { term } => Some(term),
            CatalogQuery::Discover { .. } => None,
        };

        if let Some(term) = &term {
            if request.page <= 1 {
                self.events.record(EventKind::Search, payload([("query", json!(term))]));
            }
        }

        let outcome = self.catalog.search(request).await?;
        if let (Some(term), true) = (&term, outcome.is_applied()) {
            self.history.record(term);
        }
        Ok(outcome)
    }

    /// Favorites shown in place of catalog results, as one page
    pub fn favorites_page(&self) -> Page<CatalogItem> {
        Page::new(self.favorites.list(), 1, 1)
    }

    /// Open the detail view for `item` and load its detail and reviews
    pub async fn open_detail(&self, item: &CatalogItem) -> DetailView {
        self.events.record(
            EventKind::MovieClick,
            payload([("movieId", json!(item.id)), ("movieTitle", json!(item.title))]),
        );
        self.recent.record(item);
        self.details.fetch_detail(item.id).await
    }

    pub fn close_detail(&self) {
        debug!("Closing detail view");
        self.details.reset();
    }

    pub fn toggle_favorite(&self, item: &CatalogItem) -> Result<ToggleOutcome, StoreError> {
        let outcome = self.favorites.toggle(item)?;
        let kind = if outcome.removed {
            EventKind::RemoveFavorite
        } else {
            EventKind::AddFavorite
        };
        self.events.record(
            kind,
            payload([("movieId", json!(item.id)), ("movieTitle", json!(item.title))]),
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use streamlist_catalog::{DiscoverSort, ProviderPage};
    use streamlist_models::{DetailRecord, Review};

    /// Answers every list call with three items; fails searches for "boom"
    struct StubSource;

    #[async_trait]
    impl CatalogSource for StubSource {
        fn source_name(&self) -> &str {
            "stub"
        }

        async fn search_movies(&self, query: &str, page: u32) -> Result<ProviderPage, CatalogError> {
            if query == "boom" {
                return Err(CatalogError::HttpStatus { status: 500, endpoint: "/search/movie".to_string() });
            }
            Ok(ProviderPage {
                items: (1..=3).map(|id| CatalogItem::new(id, format!("{} {}", query, id))).collect(),
                page,
                total_pages: 10_000,
            })
        }

        async fn discover_movies(
            &self,
            page: u32,
            _sort: DiscoverSort,
            _genre: Option<u32>,
        ) -> Result<ProviderPage, CatalogError> {
            Ok(ProviderPage {
                items: vec![CatalogItem::new(9, "Popular")],
                page,
                total_pages: 3,
            })
        }

        async fn movie_detail(&self, movie_id: u64) -> Result<DetailRecord, CatalogError> {
            Ok(DetailRecord {
                item: CatalogItem::new(movie_id, "Dune"),
                runtime: Some(155),
                budget: 0,
                revenue: 0,
                genres: Vec::new(),
                tagline: None,
                vote_count: 0,
            })
        }

        async fn movie_reviews(&self, _movie_id: u64) -> Result<Vec<Review>, CatalogError> {
            Ok(Vec::new())
        }
    }

    fn session() -> DiscoverySession<StubSource> {
        let store = Arc::new(Store::in_memory());
        let events = Arc::new(EventLog::new(store.clone()));
        DiscoverySession::new(Arc::new(StubSource), store, events)
    }

    #[tokio::test]
    async fn test_search_records_event_and_history() {
        let session = session();
        let page = session
            .load(&SearchRequest::search("batman", 1))
            .await
            .unwrap()
            .into_page()
            .unwrap();

        assert_eq!((page.page_number, page.total_pages), (1, 500));
        assert_eq!(session.search_history().list(), vec!["batman"]);
        let events = session.events.list();
        assert_eq!(events[0].kind, EventKind::Search);
        assert_eq!(events[0].payload["query"], "batman");
    }

    #[tokio::test]
    async fn test_failed_search_not_in_history() {
        let session = session();
        assert!(session.load(&SearchRequest::search("boom", 1)).await.is_err());
        assert!(session.search_history().list().is_empty());
        assert!(session.catalog().snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn test_discover_leaves_history_alone() {
        let session = session();
        let request = SearchRequest::discover(1, Some(28), DiscoverSort::default());
        session.load(&request).await.unwrap();
        assert!(session.search_history().list().is_empty());
        assert!(session.events.list().is_empty());
    }

    #[tokio::test]
    async fn test_open_detail_tracks_view() {
        let session = session();
        let dune = CatalogItem::new(42, "Dune");

        let view = session.open_detail(&dune).await;

        assert_eq!(view.movie_id, 42);
        assert_eq!(session.recently_viewed().list(), vec![dune]);
        assert_eq!(session.events.list()[0].kind, EventKind::MovieClick);
        assert!(session.details().current().is_some());

        session.close_detail();
        assert!(session.details().current().is_none());
    }

    #[test]
    fn test_toggle_favorite_events_and_page() {
        let session = session();
        let dune = CatalogItem::new(42, "Dune");

        assert!(!session.toggle_favorite(&dune).unwrap().removed);
        let page = session.favorites_page();
        assert_eq!((page.page_number, page.total_pages), (1, 1));
        assert_eq!(page.items, vec![dune.clone()]);

        assert!(session.toggle_favorite(&dune).unwrap().removed);
        assert!(session.favorites_page().items.is_empty());

        let kinds: Vec<EventKind> = session.events.list().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::RemoveFavorite, EventKind::AddFavorite]);
    }
}
