//! HTTP client for the Prismic REST API v2.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use spacetraveling_core::{
    Article, ArticleSummary, ContentSource, Cursor, Page, SourceError, config::PrismicConfig,
};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    api::{ApiInfo, PostData, SearchResponse},
    error::{PrismicError, Result},
};

/// Page size used when walking every post.
const WALK_PAGE_SIZE: u32 = 100;

/// Newest posts first.
const ORDERINGS: &str = "[document.first_publication_date desc]";

/// Query parameter carrying the repository access token.
const ACCESS_TOKEN: &str = "access_token";

/// Prismic repository client.
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    document_type: String,
}

impl PrismicClient {
    /// Create a client for the repository at `endpoint`
    /// (e.g. `https://my-repo.cdn.prismic.io/api/v2`).
    pub fn new(endpoint: &str, document_type: impl Into<String>) -> Result<Self> {
        Self::build(endpoint, document_type.into(), None)
    }

    /// Create a client from the `[prismic]` configuration section.
    pub fn from_config(config: &PrismicConfig) -> Result<Self> {
        let mut client = Self::build(
            &config.endpoint,
            config.document_type.clone(),
            Some(Duration::from_secs(config.timeout_secs)),
        )?;
        client.access_token = config.access_token.clone();
        Ok(client)
    }

    fn build(endpoint: &str, document_type: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: Url::parse(endpoint.trim_end_matches('/'))?,
            access_token: None,
            document_type,
        })
    }

    /// Use an access token for a private repository.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The API entry point.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the ref of the published content.
    #[instrument(skip(self))]
    pub async fn master_ref(&self) -> Result<String> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair(ACCESS_TOKEN, token);
        }

        let info: ApiInfo = self.get_json(url).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or_else(|| PrismicError::NoMasterRef(self.endpoint.to_string()))
    }

    /// Run a search against the master ref.
    pub async fn search(
        &self,
        predicate: &str,
        page_size: u32,
        page: u32,
    ) -> Result<SearchResponse<PostData>> {
        let master_ref = self.master_ref().await?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("documents")
            .push("search");
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("ref", &master_ref)
                .append_pair("q", predicate)
                .append_pair("orderings", ORDERINGS)
                .append_pair("pageSize", &page_size.to_string())
                .append_pair("page", &page.to_string());
            if let Some(token) = &self.access_token {
                query.append_pair(ACCESS_TOKEN, token);
            }
        }

        self.get_json(url).await
    }

    /// Follow a `next_page` cursor.
    ///
    /// Cursors are URLs handed out by the API; anything not below the
    /// configured endpoint is refused.
    pub async fn follow(&self, cursor: &Cursor) -> Result<SearchResponse<PostData>> {
        let url = self.cursor_url(cursor)?;
        self.get_json(url).await
    }

    /// Resolve a cursor into a URL below the configured endpoint.
    pub fn cursor_url(&self, cursor: &Cursor) -> Result<Url> {
        let foreign = || PrismicError::ForeignCursor {
            endpoint: self.endpoint.to_string(),
            cursor: cursor.to_string(),
        };

        let url = Url::parse(cursor.as_str()).map_err(|_| foreign())?;
        let same_origin = url.scheme() == self.endpoint.scheme()
            && url.host_str() == self.endpoint.host_str()
            && url.port_or_known_default() == self.endpoint.port_or_known_default();
        let base_path = self.endpoint.path().trim_end_matches('/');
        let below_endpoint = url.path() == base_path
            || url
                .path()
                .strip_prefix(base_path)
                .is_some_and(|rest| rest.starts_with('/'));

        if same_origin && below_endpoint {
            Ok(url)
        } else {
            Err(foreign())
        }
    }

    fn type_predicate(&self) -> String {
        format!(r#"[[at(document.type,"{}")]]"#, self.document_type)
    }

    fn uid_predicate(&self, uid: &str) -> String {
        format!(
            r#"[[at(my.{}.uid,"{}")]]"#,
            self.document_type,
            uid.replace('"', "")
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let shown = redacted(&url);
        debug!(url = %shown, "GET");

        // reqwest errors print their URL, token included.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PrismicError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrismicError::Status {
                status: status.as_u16(),
                url: shown.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PrismicError::Http(e.without_url()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `url` with its access token masked, for logs and error messages.
fn redacted(url: &Url) -> Url {
    if !url.query_pairs().any(|(key, _)| key == ACCESS_TOKEN) {
        return url.clone();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == ACCESS_TOKEN {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn first_page(
        &self,
        page_size: u32,
    ) -> std::result::Result<Page<ArticleSummary>, SourceError> {
        let response = self.search(&self.type_predicate(), page_size, 1).await?;
        Ok(response.into_page()?)
    }

    async fn page_at(
        &self,
        cursor: &Cursor,
    ) -> std::result::Result<Page<ArticleSummary>, SourceError> {
        let response = self.follow(cursor).await?;
        Ok(response.into_page()?)
    }

    async fn article(&self, id: &str) -> std::result::Result<Option<Article>, SourceError> {
        let response = self.search(&self.uid_predicate(id), 1, 1).await?;
        match response.results.into_iter().next() {
            Some(doc) => Ok(Some(doc.into_article()?)),
            None => Ok(None),
        }
    }

    async fn slugs(&self) -> std::result::Result<Vec<String>, SourceError> {
        let mut page = self.first_page(WALK_PAGE_SIZE).await?;
        let mut slugs: Vec<String> = Vec::new();

        loop {
            slugs.extend(page.items.into_iter().map(|summary| summary.id));
            match page.next_cursor {
                Some(cursor) => page = self.page_at(&cursor).await?,
                None => break,
            }
        }

        debug!(count = slugs.len(), "collected post slugs");
        Ok(slugs)
    }
}
