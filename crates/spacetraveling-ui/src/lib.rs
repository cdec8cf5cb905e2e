//! Spacetraveling UI Components
//!
//! Leptos components for the Spacetraveling frontend. The server renders
//! every page; these components take over the listing page so posts can be
//! appended without a reload.
//!
//! # Components
//!
//! - [`PostListing`] - Accumulated posts plus the "load more" control
//! - [`PostPreviewCard`] - A single post in the listing
//! - [`PostInfo`] - Icon plus text metadata entry
//!
//! # Example
//!
//! ```ignore
//! use leptos::prelude::*;
//! use spacetraveling_ui::{PostListing, listing_from_seed};
//!
//! let (listing, dates) = listing_from_seed(seed).unwrap();
//! let listing = RwSignal::new(listing);
//!
//! view! {
//!     <PostListing listing=listing endpoint=endpoint dates=dates labels=labels />
//! }
//! ```

pub mod fetch;
pub mod listing;
pub mod post;

pub use fetch::{FetchError, fetch_page};
pub use listing::{PostListing, button_label, listing_from_seed};
pub use post::{InfoIcon, PostInfo, PostPreviewCard};
