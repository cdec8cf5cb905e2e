//! Listing page state.
//!
//! [`Listing`] owns the accumulated posts and guards the "load more" action:
//! a fetch is only issued when a cursor exists and no other fetch is in
//! flight, and a result is only merged when it answers the request that is
//! currently in flight.

use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, Labels},
    content::{ArticleSummary, PostPreview},
    date::DateFormatter,
    error::Result,
    pagination::{Cursor, Page, PaginationState},
};

/// Identifies one "load more" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// A fetch the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Token to hand back to [`Listing::apply`].
    pub token: RequestToken,

    /// Cursor of the page to fetch.
    pub cursor: Cursor,
}

/// Result of fetching a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The page arrived.
    Loaded(Page<T>),
    /// The fetch failed with the given message.
    Failed(String),
}

impl<T, E: std::fmt::Display> From<std::result::Result<Page<T>, E>> for FetchOutcome<T> {
    fn from(result: std::result::Result<Page<T>, E>) -> Self {
        match result {
            Ok(page) => Self::Loaded(page),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Status of the "load more" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing in flight.
    Idle,
    /// A fetch is in flight.
    Loading(RequestToken),
    /// The last fetch failed; items and cursor are unchanged.
    Failed(String),
}

/// Listing state: accumulated items, cursor and load status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pages: PaginationState<T>,
    status: LoadStatus,
    issued: u64,
}

impl<T> Listing<T> {
    /// Start from the first page.
    pub fn new(first: Page<T>) -> Self {
        Self {
            pages: PaginationState::seed(first),
            status: LoadStatus::Idle,
            issued: 0,
        }
    }

    /// Items fetched so far.
    pub fn items(&self) -> &[T] {
        self.pages.items()
    }

    /// Cursor of the next page.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.pages.next_cursor()
    }

    /// Current load status.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Whether more pages exist. The "load more" control is only shown
    /// while this holds.
    pub fn has_more(&self) -> bool {
        self.pages.has_more()
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading(_))
    }

    /// Message of the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether [`Listing::begin_load`] would issue a request.
    pub fn can_load_more(&self) -> bool {
        self.has_more() && !self.is_loading()
    }

    /// Mark a fetch as in flight and return what to fetch.
    ///
    /// Returns `None` on the last page or while another fetch is in flight.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.is_loading() {
            return None;
        }
        let cursor = self.pages.next_cursor()?.clone();

        self.issued += 1;
        let token = RequestToken(self.issued);
        self.status = LoadStatus::Loading(token);
        tracing::debug!(cursor = %cursor, "loading next page");

        Some(LoadRequest { token, cursor })
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Outcomes of requests that are not in flight are dropped. Returns
    /// whether the outcome was applied.
    pub fn apply(&mut self, token: RequestToken, outcome: FetchOutcome<T>) -> bool {
        if self.status != LoadStatus::Loading(token) {
            tracing::debug!(?token, "dropping outcome of a request that is not in flight");
            return false;
        }

        match outcome {
            FetchOutcome::Loaded(page) => {
                let pages = std::mem::take(&mut self.pages);
                self.pages = pages.merge(page);
                self.status = LoadStatus::Idle;
            }
            FetchOutcome::Failed(message) => {
                tracing::warn!(%message, "loading next page failed");
                self.status = LoadStatus::Failed(message);
            }
        }
        true
    }
}

/// Data the server embeds into the listing page for the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSeed {
    /// First page as fetched at generation time.
    pub page: Page<ArticleSummary>,

    /// Endpoint answering `GET {endpoint}?page={cursor}` with a
    /// `Page<ArticleSummary>`.
    pub endpoint: String,

    /// Locale for publication dates.
    pub date_locale: String,

    /// strftime pattern for publication dates.
    pub date_format: String,

    /// User-facing strings.
    pub labels: Labels,
}

impl ListingSeed {
    /// Endpoint path served for "load more" requests.
    pub const ENDPOINT: &'static str = "/api/posts";

    /// Id of the `<script type="application/json">` element carrying the seed.
    pub const ELEMENT_ID: &'static str = "posts-pagination";

    /// Id of the element holding the listing markup.
    pub const MOUNT_ID: &'static str = "posts";

    /// Build the seed for `page` from the site configuration.
    pub fn new(config: &Config, page: Page<ArticleSummary>) -> Self {
        Self {
            page,
            endpoint: Self::ENDPOINT.to_string(),
            date_locale: config.site.date_locale.clone(),
            date_format: config.site.date_format.clone(),
            labels: config.labels.clone(),
        }
    }

    /// Formatter for the seed's locale and pattern.
    pub fn date_formatter(&self) -> Result<DateFormatter> {
        DateFormatter::new(&self.date_locale, &self.date_format)
    }

    /// Listing state with display-formatted dates.
    pub fn into_listing(self) -> Result<(Listing<PostPreview>, DateFormatter)> {
        let dates = self.date_formatter()?;
        let first = self
            .page
            .map(|summary| PostPreview::from_summary(&summary, &dates));
        Ok((Listing::new(first), dates))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn cursor(raw: &str) -> Option<Cursor> {
        Cursor::new(raw)
    }

    #[test]
    fn test_seed_then_merge_until_terminal() {
        let mut listing = Listing::new(Page::new(vec!["A"], cursor("p2")));

        let request = listing.begin_load().expect("request");
        assert_eq!(request.cursor.as_str(), "p2");
        assert!(listing.is_loading());

        assert!(listing.apply(request.token, FetchOutcome::Loaded(Page::last(vec!["B"]))));

        assert_eq!(listing.items(), ["A", "B"]);
        assert!(listing.next_cursor().is_none());
        assert!(!listing.has_more());
        assert!(!listing.can_load_more());
        assert!(listing.begin_load().is_none());
    }

    #[test]
    fn test_no_request_on_last_page() {
        let mut listing = Listing::new(Page::last(vec![1]));
        assert!(!listing.has_more());
        assert!(listing.begin_load().is_none());
        assert_eq!(listing.status(), &LoadStatus::Idle);
    }

    #[test]
    fn test_second_click_while_loading_is_ignored() {
        let mut listing = Listing::new(Page::new(vec![1], cursor("p2")));

        let first = listing.begin_load().expect("first request");
        assert!(!listing.can_load_more());
        assert!(listing.begin_load().is_none());

        listing.apply(first.token, FetchOutcome::Loaded(Page::new(vec![2], cursor("p3"))));
        assert_eq!(listing.items(), [1, 2]);
        assert!(listing.can_load_more());
    }

    #[test]
    fn test_stale_token_is_dropped() {
        let mut listing = Listing::new(Page::new(vec![1], cursor("p2")));

        let first = listing.begin_load().unwrap();
        listing.apply(first.token, FetchOutcome::Failed("offline".to_string()));

        let second = listing.begin_load().unwrap();
        assert_ne!(first.token, second.token);

        assert!(!listing.apply(first.token, FetchOutcome::Loaded(Page::last(vec![9]))));
        assert_eq!(listing.items(), [1]);
        assert!(listing.is_loading());

        assert!(listing.apply(second.token, FetchOutcome::Loaded(Page::last(vec![2]))));
        assert_eq!(listing.items(), [1, 2]);
    }

    #[test]
    fn test_failure_keeps_items_and_allows_retry() {
        let mut listing = Listing::new(Page::new(vec![1], cursor("p2")));

        let request = listing.begin_load().unwrap();
        listing.apply(request.token, FetchOutcome::Failed("HTTP 502".to_string()));

        assert_eq!(listing.error(), Some("HTTP 502"));
        assert_eq!(listing.items(), [1]);
        assert_eq!(listing.next_cursor().map(Cursor::as_str), Some("p2"));

        let retry = listing.begin_load().expect("retry");
        assert_eq!(retry.cursor.as_str(), "p2");
        assert!(listing.error().is_none());
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: std::result::Result<Page<u8>, String> = Ok(Page::last(vec![1]));
        assert_eq!(FetchOutcome::from(ok), FetchOutcome::Loaded(Page::last(vec![1])));

        let err: std::result::Result<Page<u8>, String> = Err("timeout".to_string());
        assert_eq!(
            FetchOutcome::from(err),
            FetchOutcome::Failed("timeout".to_string())
        );
    }

    #[test]
    fn test_seed_into_listing_formats_dates() {
        let summary = ArticleSummary {
            id: "criando-um-app-cra-do-zero".to_string(),
            published_at: Utc.with_ymd_and_hms(2021, 3, 19, 12, 0, 0).unwrap(),
            title: "Criando um app CRA do zero".to_string(),
            subtitle: "Tudo sobre como criar a sua primeira aplicação".to_string(),
            author: "Danilo Vieira".to_string(),
        };
        let seed = ListingSeed {
            page: Page::new(vec![summary.clone()], cursor("https://repo/api?page=2")),
            endpoint: ListingSeed::ENDPOINT.to_string(),
            date_locale: "pt_BR".to_string(),
            date_format: "%-d de %b de %Y".to_string(),
            labels: Labels::default(),
        };

        let (listing, _dates) = seed.clone().into_listing().unwrap();
        assert_eq!(listing.items()[0].published, "19 de mar de 2021");
        assert!(listing.has_more());
        assert_eq!(seed.page.items[0], summary);
    }

    #[test]
    fn test_seed_json_shape() {
        let seed = ListingSeed {
            page: Page::last(vec![]),
            endpoint: ListingSeed::ENDPOINT.to_string(),
            date_locale: "pt_BR".to_string(),
            date_format: "%Y".to_string(),
            labels: Labels::default(),
        };
        let json = serde_json::to_value(&seed).unwrap();
        assert_eq!(json["endpoint"], "/api/posts");
        assert!(json["page"]["next_cursor"].is_null());
        assert_eq!(json["labels"]["load_more"], "Carregar mais posts");
    }
}
