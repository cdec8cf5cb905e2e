//! Error types for the Prismic client.

use spacetraveling_core::SourceError;
use thiserror::Error;

/// Result type alias using `PrismicError`.
pub type Result<T> = std::result::Result<T, PrismicError>;

/// Prismic client errors.
#[derive(Debug, Error)]
pub enum PrismicError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Malformed JSON payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// The API entry point listed no master ref.
    #[error("no master ref advertised by {0}")]
    NoMasterRef(String),

    /// A cursor pointing somewhere other than the configured repository.
    #[error("cursor does not belong to {endpoint}: {cursor}")]
    ForeignCursor { endpoint: String, cursor: String },

    /// A document missing fields required for display.
    #[error("document {id}: {message}")]
    InvalidDocument { id: String, message: String },

    /// Unparseable publication date.
    #[error("invalid publication date {value:?}: {message}")]
    Date { value: String, message: String },
}

impl PrismicError {
    /// Create an invalid document error.
    pub fn invalid_document(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            id: id.into(),
            message: message.into(),
        }
    }
}

impl From<PrismicError> for SourceError {
    fn from(err: PrismicError) -> Self {
        match err {
            PrismicError::Http(e) => SourceError::network_with_source("request failed", e),
            PrismicError::Status { .. } | PrismicError::NoMasterRef(_) => {
                SourceError::network(err.to_string())
            }
            PrismicError::ForeignCursor { .. } | PrismicError::Url(_) => {
                SourceError::invalid_cursor(err.to_string())
            }
            PrismicError::Json(_)
            | PrismicError::InvalidDocument { .. }
            | PrismicError::Date { .. } => SourceError::decode(err.to_string()),
        }
    }
}
