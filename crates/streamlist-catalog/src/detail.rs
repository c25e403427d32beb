use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamlist_models::{DetailRecord, Review};
use tracing::{debug, warn};
use crate::sequencer::RequestSequencer;
use crate::traits::CatalogSource;

/// How many reviews a detail view shows up front
pub const REVIEW_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub movie_id: u64,
    pub detail: Option<DetailRecord>,
    /// All reviews the provider returned, in provider order
    pub reviews: Vec<Review>,
}

impl DetailView {
    pub fn preview_reviews(&self) -> &[Review] {
        let end = self.reviews.len().min(REVIEW_PREVIEW_LIMIT);
        &self.reviews[..end]
    }

    /// True when neither sub-request produced anything
    pub fn is_empty(&self) -> bool {
        self.detail.is_none() && self.reviews.is_empty()
    }
}

/// Loads one movie's detail and reviews side by side.
///
/// Has its own request sequence, separate from the list client, so opening a
/// detail view never invalidates a list load or the other way round.
pub struct DetailFetcher<S> {
    source: Arc<S>,
    sequencer: RequestSequencer,
    current: Mutex<Option<DetailView>>,
}

impl<S: CatalogSource> DetailFetcher<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            sequencer: RequestSequencer::new(),
            current: Mutex::new(None),
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<DetailView>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The view of the newest completed request, if any
    pub fn current(&self) -> Option<DetailView> {
        self.lock_current().clone()
    }

    /// Drop the current view and ignore anything still in flight
    pub fn reset(&self) {
        self.sequencer.invalidate();
        *self.lock_current() = None;
    }

    /// Fetch detail and reviews concurrently and wait for both to settle.
    ///
    /// A failing half is logged and left empty; the other half is still
    /// returned. The view becomes [`DetailFetcher::current`] only if no newer
    /// fetch or reset happened meanwhile.
    pub async fn fetch_detail(&self, movie_id: u64) -> DetailView {
        let token = self.sequencer.issue();
        *self.lock_current() = None;

        let (detail, reviews) = tokio::join!(
            self.source.movie_detail(movie_id),
            self.source.movie_reviews(movie_id)
        );

        let detail = match detail {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!("Failed to load detail for movie {}: {}", movie_id, e);
                None
            }
        };
        let reviews = match reviews {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!("Failed to load reviews for movie {}: {}", movie_id, e);
                Vec::new()
            }
        };

        let view = DetailView {
            movie_id,
            detail,
            reviews,
        };

        let mut current = self.lock_current();
        if self.sequencer.is_current(token) {
            *current = Some(view.clone());
        } else {
            debug!("Detail for movie {} resolved after a newer request; not kept", movie_id);
        }
        view
    }
}
