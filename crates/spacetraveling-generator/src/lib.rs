//! Spacetraveling Generator Library
//!
//! Page rendering and incremental regeneration for the blog.
//!
//! # Modules
//!
//! - [`template`] - HTML template system with variable interpolation
//! - [`html`] - Listing, post, fallback and not-found pages
//! - [`cache`] - Rendered page cache with time-based revalidation
//! - [`site`] - Prerendering and cache-backed serving

pub mod cache;
pub mod html;
pub mod site;
pub mod template;

pub use cache::{Lookup, PageCache, PageStatus, Pending, RenderedPage, Route};
pub use html::{HtmlError, HtmlGenerator};
pub use site::{PrerenderStats, Served, Site, SiteError};
pub use template::{Template, TemplateContext, TemplateRegistry};
