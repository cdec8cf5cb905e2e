//! Prismic REST API v2 wire types.
//!
//! Only the fields the blog reads are modelled; everything else in the
//! payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use spacetraveling_core::{Article, ArticleSummary, Cursor, Page, Section};

use crate::error::{PrismicError, Result};

/// Timestamp layout used by Prismic (`2021-03-25T19:25:28+0000`).
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Response of the API entry point.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    /// Content releases; exactly one is the master ref.
    pub refs: Vec<ApiRef>,
}

impl ApiInfo {
    /// The ref of the published content.
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// A content release.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    /// Release id.
    pub id: String,

    /// Ref value to pass as `ref` query parameter.
    #[serde(rename = "ref")]
    pub reference: String,

    /// Human-readable label.
    #[serde(default)]
    pub label: Option<String>,

    /// Whether this is the published content.
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// Paginated search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<D> {
    /// Current page number (1-based).
    #[serde(default)]
    pub page: u32,

    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,

    /// URL of the next page.
    #[serde(default)]
    pub next_page: Option<String>,

    /// Documents on this page.
    pub results: Vec<Document<D>>,
}

/// A Prismic document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<D> {
    /// Internal document id.
    pub id: String,

    /// User-facing slug.
    #[serde(default)]
    pub uid: Option<String>,

    /// Custom type name.
    #[serde(rename = "type", default)]
    pub doc_type: String,

    /// First publication timestamp.
    #[serde(default)]
    pub first_publication_date: Option<String>,

    /// Custom type fields.
    pub data: D,
}

/// Fields of the `posts` custom type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Image,
    pub content: Vec<ContentGroup>,
}

/// Image field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// Repeatable group holding one section of a post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentGroup {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

/// One rich-text block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Parse a Prismic timestamp into UTC.
pub fn parse_publication_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| PrismicError::Date {
            value: value.to_string(),
            message: e.to_string(),
        })
}

impl<D> Document<D> {
    fn slug(&self) -> Result<String> {
        self.uid
            .clone()
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| PrismicError::invalid_document(&self.id, "missing uid"))
    }

    fn publication_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.first_publication_date
            .as_deref()
            .map(parse_publication_date)
            .transpose()
    }
}

impl Document<PostData> {
    /// Listing entry for this document.
    pub fn into_summary(self) -> Result<ArticleSummary> {
        let id = self.slug()?;
        let published_at = self
            .publication_date()?
            .ok_or_else(|| PrismicError::invalid_document(&self.id, "never published"))?;

        Ok(ArticleSummary {
            id,
            published_at,
            title: self.data.title,
            subtitle: self.data.subtitle,
            author: self.data.author,
        })
    }

    /// Full post for this document.
    pub fn into_article(self) -> Result<Article> {
        let id = self.slug()?;
        let published_at = self.publication_date()?;

        let sections = self
            .data
            .content
            .into_iter()
            .map(|group| Section {
                heading: group.heading,
                paragraphs: group
                    .body
                    .into_iter()
                    .map(|block| block.text)
                    .filter(|text| !text.is_empty())
                    .collect(),
            })
            .collect();

        Ok(Article {
            id,
            published_at,
            title: self.data.title,
            banner_url: self.data.banner.url.unwrap_or_default(),
            author: self.data.author,
            sections,
        })
    }
}

impl SearchResponse<PostData> {
    /// Listing page for this response.
    pub fn into_page(self) -> Result<Page<ArticleSummary>> {
        let items = self
            .results
            .into_iter()
            .map(Document::into_summary)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, Cursor::from_optional(self.next_page)))
    }
}
