//! Spacetraveling Core Library
//!
//! Core types, configuration, and error handling shared by the server, the
//! content API client and the WASM frontend.
//!
//! # Modules
//!
//! - [`config`] - Site configuration loaded from TOML and the environment
//! - [`content`] - Article and article summary types
//! - [`pagination`] - Cursor-driven page accumulator
//! - [`listing`] - Listing page state with the "load more" request guard
//! - [`reading_time`] - Read-time estimation
//! - [`date`] - Locale-aware publication date formatting
//! - [`icons`] - SVG icons for post metadata
//! - [`source`] - The content source seam implemented by API clients

pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod icons;
pub mod listing;
pub mod pagination;
pub mod reading_time;
pub mod source;

pub use config::{Config, Labels};
pub use content::{Article, ArticleSummary, PostPreview, Section};
pub use date::DateFormatter;
pub use error::{CoreError, Result};
pub use listing::{FetchOutcome, Listing, ListingSeed, LoadRequest, LoadStatus, RequestToken};
pub use pagination::{Cursor, Page, PaginationState};
pub use source::{ContentSource, SourceError};
