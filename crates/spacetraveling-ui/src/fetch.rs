//! Browser-side fetching of listing pages.

use gloo_net::http::Request;
use spacetraveling_core::{ArticleSummary, Cursor, Page};
use thiserror::Error;

/// Errors while fetching a listing page.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body was not a listing page.
    #[error("invalid response: {0}")]
    Parse(String),
}

/// Fetch the listing page at `cursor` from `endpoint`.
///
/// The endpoint answers `GET {endpoint}?page={cursor}` with a JSON
/// `Page<ArticleSummary>`.
pub async fn fetch_page(endpoint: &str, cursor: &Cursor) -> Result<Page<ArticleSummary>, FetchError> {
    let response = Request::get(endpoint)
        .query([("page", cursor.as_str())])
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    parse_page(&body)
}

/// Decode a listing page body.
pub fn parse_page(body: &str) -> Result<Page<ArticleSummary>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}
