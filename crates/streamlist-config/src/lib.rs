pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, StorageConfig, API_KEY_ENV};
pub use paths::{PathManager, HOME_ENV};
