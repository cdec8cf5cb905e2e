//! Content types and structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{date::DateFormatter, reading_time};

/// A post as it appears in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Unique slug, used in `/post/{id}` links.
    pub id: String,

    /// First publication timestamp.
    pub published_at: DateTime<Utc>,

    /// Post title.
    pub title: String,

    /// Post subtitle.
    pub subtitle: String,

    /// Author name.
    pub author: String,
}

/// A full post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Unique slug.
    pub id: String,

    /// First publication timestamp, absent for never-published documents.
    pub published_at: Option<DateTime<Utc>>,

    /// Post title.
    pub title: String,

    /// Banner image URL.
    pub banner_url: String,

    /// Author name.
    pub author: String,

    /// Body sections in display order.
    pub sections: Vec<Section>,
}

/// One headed section of a post body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading.
    pub heading: String,

    /// Plain-text paragraphs.
    pub paragraphs: Vec<String>,
}

impl Article {
    /// Estimated reading time in minutes.
    #[must_use]
    pub fn reading_time(&self) -> u32 {
        reading_time::estimate(&self.sections)
    }

    /// Site-relative link to this post.
    #[must_use]
    pub fn href(&self) -> String {
        post_href(&self.id)
    }
}

/// Display copy of an [`ArticleSummary`] with the date already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPreview {
    /// Unique slug.
    pub id: String,

    /// Site-relative link to the post.
    pub href: String,

    /// Post title.
    pub title: String,

    /// Post subtitle.
    pub subtitle: String,

    /// Author name.
    pub author: String,

    /// Formatted publication date.
    pub published: String,
}

impl PostPreview {
    /// Build the display copy; the summary itself is left untouched.
    #[must_use]
    pub fn from_summary(summary: &ArticleSummary, dates: &DateFormatter) -> Self {
        Self {
            id: summary.id.clone(),
            href: post_href(&summary.id),
            title: summary.title.clone(),
            subtitle: summary.subtitle.clone(),
            author: summary.author.clone(),
            published: dates.format(&summary.published_at),
        }
    }
}

/// Site-relative link for a post slug.
#[must_use]
pub fn post_href(id: &str) -> String {
    format!("/post/{id}")
}
