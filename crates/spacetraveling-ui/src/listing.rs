//! The post listing with its "load more" control.

use leptos::{prelude::*, task::spawn_local};
use spacetraveling_core::{
    DateFormatter, FetchOutcome, Labels, Listing, ListingSeed, LoadStatus, PostPreview,
};

use crate::{fetch::fetch_page, post::PostPreviewCard};

/// Text of the "load more" control for the current status.
pub fn button_label<'a>(status: &LoadStatus, labels: &'a Labels) -> &'a str {
    match status {
        LoadStatus::Idle => &labels.load_more,
        LoadStatus::Loading(_) => &labels.loading,
        LoadStatus::Failed(_) => &labels.retry,
    }
}

/// Items paired with their position.
///
/// Pages are merged without deduplication, so a post published between two
/// loads can show up twice; keying rows by position keeps every item.
fn indexed_rows<T: Clone>(items: &[T]) -> Vec<(usize, T)> {
    items.iter().cloned().enumerate().collect()
}

/// Listing built from the seed embedded by the server.
///
/// Returns `None` when the seed carries an unusable date locale or
/// pattern; the server-rendered markup stays in place in that case.
pub fn listing_from_seed(seed: ListingSeed) -> Option<(Listing<PostPreview>, DateFormatter)> {
    match seed.into_listing() {
        Ok(parts) => Some(parts),
        Err(e) => {
            log::error!("invalid listing seed: {e}");
            None
        }
    }
}

/// Start fetching the next page unless the listing is on its last page or
/// already loading.
fn load_next(
    listing: RwSignal<Listing<PostPreview>>,
    endpoint: StoredValue<String>,
    dates: StoredValue<DateFormatter>,
) {
    let Some(request) = listing.try_update(Listing::begin_load).flatten() else {
        return;
    };
    let endpoint = endpoint.get_value();
    let dates = dates.get_value();

    spawn_local(async move {
        let result = fetch_page(&endpoint, &request.cursor).await.map(|page| {
            page.map(|summary| PostPreview::from_summary(&summary, &dates))
        });
        if let Err(e) = &result {
            log::warn!("failed to load posts: {e}");
        }

        listing.update(|listing| {
            listing.apply(request.token, FetchOutcome::from(result));
        });
    });
}

/// Post listing.
///
/// Shows every post fetched so far. The "load more" button is only rendered
/// while a next page exists and is disabled while a fetch is in flight; a
/// failed fetch keeps the posts and offers a retry.
#[component]
pub fn PostListing(
    /// Listing state, seeded with the first page.
    listing: RwSignal<Listing<PostPreview>>,
    /// Endpoint answering `?page=<cursor>` requests.
    endpoint: String,
    /// Formatter for publication dates of fetched posts.
    dates: DateFormatter,
    /// User-facing strings.
    labels: Labels,
) -> impl IntoView {
    let endpoint = StoredValue::new(endpoint);
    let dates = StoredValue::new(dates);
    let labels = StoredValue::new(labels);

    let label = move || {
        let status = listing.with(|l| l.status().clone());
        labels.with_value(|labels| button_label(&status, labels).to_string())
    };

    view! {
      <For
        each=move || listing.with(|l| indexed_rows(l.items()))
        key=|(index, post): &(usize, PostPreview)| (*index, post.id.clone())
        children=|(_, post): (usize, PostPreview)| view! { <PostPreviewCard post=post /> }
      />
      <Show when=move || listing.with(|l| l.error().is_some())>
        <p class="load-more-error" role="alert">
          {move || labels.with_value(|labels| labels.fetch_failed.clone())}
        </p>
      </Show>
      <Show when=move || listing.with(Listing::has_more)>
        <button
          type="button"
          class="load-more"
          disabled=move || listing.with(Listing::is_loading)
          on:click=move |_| load_next(listing, endpoint, dates)
        >
          {label}
        </button>
      </Show>
    }
}
