pub mod client;
pub mod detail;
pub mod error;
pub mod request;
pub mod sequencer;
pub mod tmdb;
pub mod traits;

pub use client::{BrowseState, CatalogClient, LoadOutcome};
pub use detail::{DetailFetcher, DetailView, REVIEW_PREVIEW_LIMIT};
pub use error::CatalogError;
pub use request::{CatalogQuery, DiscoverSort, SearchRequest};
pub use sequencer::{RequestSequencer, RequestToken};
pub use tmdb::TmdbClient;
pub use traits::{CatalogSource, ProviderPage};
