pub mod catalog_item;
pub mod detail;
pub mod event;
pub mod page;
pub mod review;
pub mod watchlist;

pub use catalog_item::{CatalogItem, Genre};
pub use detail::DetailRecord;
pub use event::{Event, EventKind, EventPayload};
pub use page::{Page, PROVIDER_PAGE_CAP};
pub use review::Review;
pub use watchlist::{EntryDraft, EntryPatch, Priority, WatchListEntry, RATING_MAX};
