//! Browser entry point.
//!
//! The server renders the listing page with its first page of posts and a
//! JSON seed. On load, this module replaces the static listing with the
//! reactive [`PostListing`] so further pages are appended in place. Pages
//! without a seed are left alone.

use leptos::{mount::mount_to, prelude::*};
use spacetraveling_core::ListingSeed;
use spacetraveling_ui::{PostListing, listing_from_seed};
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

/// Decode the seed embedded in the listing page.
pub fn parse_seed(text: &str) -> Option<ListingSeed> {
    match serde_json::from_str(text) {
        Ok(seed) => Some(seed),
        Err(e) => {
            log::error!("malformed listing seed: {e}");
            None
        }
    }
}

#[wasm_bindgen(start)]
pub fn mount_listing() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    let Some(text) = document
        .get_element_by_id(ListingSeed::ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        log::debug!("no listing on this page");
        return;
    };

    let Some(seed) = parse_seed(&text) else {
        return;
    };
    let endpoint = seed.endpoint.clone();
    let labels = seed.labels.clone();
    let Some((listing, dates)) = listing_from_seed(seed) else {
        return;
    };

    let Some(root) = document.get_element_by_id(ListingSeed::MOUNT_ID) else {
        log::warn!("listing seed present but #{} is missing", ListingSeed::MOUNT_ID);
        return;
    };
    root.set_inner_html("");

    log::debug!("mounting listing with {} posts", listing.items().len());
    mount_to(root.unchecked_into::<web_sys::HtmlElement>(), move || {
        let listing = RwSignal::new(listing);
        view! { <PostListing listing=listing endpoint=endpoint dates=dates labels=labels /> }
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let seed = parse_seed(
            r#"{
                "page": {"items": [], "next_cursor": "https://repo/api/v2/documents/search?page=2"},
                "endpoint": "/api/posts",
                "date_locale": "pt_BR",
                "date_format": "%-d de %b de %Y",
                "labels": {}
            }"#,
        )
        .unwrap();

        assert_eq!(seed.endpoint, "/api/posts");
        assert!(seed.page.next_cursor.is_some());
        assert_eq!(seed.labels.load_more, "Carregar mais posts");
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        assert!(parse_seed("{").is_none());
    }
}
