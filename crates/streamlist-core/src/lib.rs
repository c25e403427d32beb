pub mod discovery;
pub mod events;
pub mod export;
pub mod favorites;
pub mod history;
pub mod ids;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod watchlist;

pub use discovery::DiscoverySession;
pub use events::{EventLog, EVENT_LOG_CAPACITY};
pub use export::{build_export, ExportDocument};
pub use favorites::{FavoritesRegistry, ToggleOutcome};
pub use history::{RecentlyViewed, SearchHistory};
pub use ids::IdGenerator;
pub use logging::init_logging;
pub use pipeline::{derive, page_window, paginate, SortKey, ViewFilters};
pub use store::{keys, FileMedium, MemoryMedium, StorageMedium, Store, StoreError};
pub use watchlist::{reduce, WatchList, WatchListAction};
