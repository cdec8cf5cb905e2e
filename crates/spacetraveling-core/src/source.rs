//! The content source seam.
//!
//! Renderers and the HTTP server only talk to a [`ContentSource`]; the
//! Prismic client is one implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    content::{Article, ArticleSummary},
    pagination::{Cursor, Page},
};

/// Errors raised by a content source.
///
/// A missing article is not an error: [`ContentSource::article`] returns
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure or unexpected HTTP status.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The cursor does not belong to this source.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}

impl SourceError {
    /// Create a network error with a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an invalid cursor error.
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor(message.into())
    }
}

/// A paginated store of blog posts.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First listing page, newest posts first.
    async fn first_page(&self, page_size: u32) -> Result<Page<ArticleSummary>, SourceError>;

    /// Listing page identified by `cursor`.
    async fn page_at(&self, cursor: &Cursor) -> Result<Page<ArticleSummary>, SourceError>;

    /// Full post by slug, `None` when no such post exists.
    async fn article(&self, id: &str) -> Result<Option<Article>, SourceError>;

    /// Slugs of every published post.
    async fn slugs(&self) -> Result<Vec<String>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = SourceError::network("HTTP 503 from https://repo/api/v2");
        assert_eq!(
            err.to_string(),
            "network error: HTTP 503 from https://repo/api/v2"
        );
    }

    #[test]
    fn test_network_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = SourceError::network_with_source("request failed", io);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_cursor_display() {
        let err = SourceError::invalid_cursor("https://evil.example.com");
        assert!(err.to_string().starts_with("invalid cursor"));
    }
}
