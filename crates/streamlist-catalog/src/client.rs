use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamlist_models::page::{clamp_page, clamp_total_pages};
use streamlist_models::{CatalogItem, Page, PROVIDER_PAGE_CAP};
use tracing::{debug, info, warn};
use crate::error::CatalogError;
use crate::request::{CatalogQuery, SearchRequest};
use crate::sequencer::{RequestSequencer, RequestToken};
use crate::traits::{CatalogSource, ProviderPage};

/// The listing currently applied, as the caller should render it
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    pub items: Vec<CatalogItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub loading: bool,
    /// Query that produced `items`; None when nothing is applied
    pub query: Option<CatalogQuery>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            loading: false,
            query: None,
        }
    }
}

/// Result of a load that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// This request was the newest when it resolved and its page is now applied
    Applied(Page<CatalogItem>),
    /// A newer request was issued while this one was in flight; nothing changed
    Superseded,
}

impl LoadOutcome {
    pub fn into_page(self) -> Option<Page<CatalogItem>> {
        match self {
            LoadOutcome::Applied(page) => Some(page),
            LoadOutcome::Superseded => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }
}

/// Runs search and discover queries with last-request-wins semantics.
///
/// Overlapping calls to [`CatalogClient::search`] may resolve in any order.
/// Only the most recently issued one mutates [`BrowseState`]; older results
/// and errors come back as [`LoadOutcome::Superseded`].
pub struct CatalogClient<S> {
    source: Arc<S>,
    sequencer: RequestSequencer,
    state: Mutex<BrowseState>,
}

impl<S: CatalogSource> CatalogClient<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            sequencer: RequestSequencer::new(),
            state: Mutex::new(BrowseState::default()),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    fn lock_state(&self) -> MutexGuard<'_, BrowseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the applied state
    pub fn snapshot(&self) -> BrowseState {
        self.lock_state().clone()
    }

    /// Load one page of `request`'s query.
    ///
    /// `loading` is raised when the request is issued. It is cleared when the
    /// request resolves, or when its future is dropped while still the newest.
    pub async fn search(&self, request: &SearchRequest) -> Result<LoadOutcome, CatalogError> {
        let query = request.query();

        // Clamp and issue under the state lock so the bound we read belongs to
        // the state this token will compete against
        let (token, mut page) = {
            let mut state = self.lock_state();
            let upper = if state.query.as_ref() == Some(&query) {
                state.total_pages
            } else {
                PROVIDER_PAGE_CAP
            };
            let page = clamp_page(request.page, upper);
            state.loading = true;
            (self.sequencer.issue(), page)
        };
        let mut loading = LoadingGuard {
            state: &self.state,
            sequencer: &self.sequencer,
            token,
            armed: true,
        };

        if page != request.page {
            debug!("Clamped requested page {} to {}", request.page, page);
        }
        debug!("Issuing catalog request #{} for {:?} page {}", token.value(), query, page);

        let mut result = self.fetch(&query, page).await;

        // A new query is only bounded by the provider cap, so the requested
        // page can lie past the end the provider reports. Ask once more for
        // the last page rather than showing another page's items.
        let past_end = result
            .as_ref()
            .ok()
            .and_then(|provider_page| last_page_if_past_end(provider_page, page));
        if let Some(last) = past_end {
            if self.sequencer.is_current(token) {
                info!("Page {} is past the last page {}; requesting page {} instead", page, last, last);
                page = last;
                result = self.fetch(&query, page).await;
            }
        }

        // Check and apply under one lock so a newer request cannot slip between
        let mut state = self.lock_state();
        loading.armed = false;
        if !self.sequencer.is_current(token) {
            match &result {
                Ok(_) => debug!("Discarding stale result of catalog request #{}", token.value()),
                Err(e) => debug!("Discarding stale error of catalog request #{}: {}", token.value(), e),
            }
            return Ok(LoadOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(mut provider_page) => {
                if let Some(last) = last_page_if_past_end(&provider_page, page) {
                    warn!(
                        "Provider still answered page {} past its last page {}; dropping its items",
                        page, last
                    );
                    provider_page.items.clear();
                    provider_page.page = last;
                }
                let page = normalize_page(provider_page, page);
                info!(
                    "Loaded {} items (page {} of {}) from {}",
                    page.items.len(),
                    page.page_number,
                    page.total_pages,
                    self.source.source_name()
                );
                state.items = page.items.clone();
                state.current_page = page.page_number;
                state.total_pages = page.total_pages;
                state.query = Some(query);
                Ok(LoadOutcome::Applied(page))
            }
            Err(e) => {
                warn!("Catalog request #{} failed: {}", token.value(), e);
                state.items.clear();
                state.current_page = 1;
                state.total_pages = 1;
                state.query = None;
                Err(e)
            }
        }
    }

    async fn fetch(&self, query: &CatalogQuery, page: u32) -> Result<ProviderPage, CatalogError> {
        match query {
            CatalogQuery::Search { term } => self.source.search_movies(term, page).await,
            CatalogQuery::Discover { genre, sort } => {
                self.source.discover_movies(page, *sort, *genre).await
            }
        }
    }

    /// Re-issue the applied query for another page
    pub async fn go_to_page(&self, request: &SearchRequest, page: u32) -> Result<LoadOutcome, CatalogError> {
        let request = SearchRequest {
            page,
            ..request.clone()
        };
        self.search(&request).await
    }
}

/// Clears `loading` if a search future is dropped before it resolves
struct LoadingGuard<'a> {
    state: &'a Mutex<BrowseState>,
    sequencer: &'a RequestSequencer,
    token: RequestToken,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.sequencer.is_current(self.token) {
            debug!("Catalog request #{} dropped before resolving", self.token.value());
            state.loading = false;
        }
    }
}

/// The last page, when the page answered lies beyond it
fn last_page_if_past_end(provider_page: &ProviderPage, requested_page: u32) -> Option<u32> {
    let last = clamp_total_pages(provider_page.total_pages);
    let answered = if provider_page.page == 0 {
        requested_page
    } else {
        provider_page.page
    };
    (answered > last).then_some(last)
}

/// Clamp provider numbers and drop repeated ids, keeping the first occurrence
fn normalize_page(provider_page: ProviderPage, requested_page: u32) -> Page<CatalogItem> {
    let mut seen = HashSet::new();
    let before = provider_page.items.len();
    let items: Vec<CatalogItem> = provider_page
        .items
        .into_iter()
        .filter(|item| seen.insert(item.id))
        .collect();
    if items.len() != before {
        debug!("Dropped {} duplicate items from provider page", before - items.len());
    }

    let page_number = if provider_page.page == 0 {
        requested_page
    } else {
        provider_page.page
    };
    Page::new(items, page_number, provider_page.total_pages)
}
