use thiserror::Error;

/// Failures of a catalog request.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Identifier is empty or not a numeric TMDB id. No request was made.
    #[error("invalid movie id '{0}'")]
    InvalidId(String),

    #[error("catalog request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("movie {id} not found")]
    NotFound { id: String },

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// Failures of the local key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is corrupt: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("value could not be serialized: {0}")]
    Serialization(#[source] serde_json::Error),
}
