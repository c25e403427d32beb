use thiserror::Error;

/// Failures talking to the catalog provider.
///
/// Carries no user-facing text; callers decide how to present each kind.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
