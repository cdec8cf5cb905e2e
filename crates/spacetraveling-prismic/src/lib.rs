//! Spacetraveling Prismic Client
//!
//! Talks to a Prismic repository over the REST API v2 and exposes it as a
//! [`spacetraveling_core::ContentSource`].
//!
//! # Example
//!
//! ```no_run
//! use spacetraveling_core::ContentSource;
//! use spacetraveling_prismic::PrismicClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PrismicClient::new("https://spacetraveling.cdn.prismic.io/api/v2", "posts")?;
//! let page = client.first_page(1).await?;
//! println!("{} posts, more: {}", page.items.len(), page.next_cursor.is_some());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;

pub use client::PrismicClient;
pub use error::{PrismicError, Result};
