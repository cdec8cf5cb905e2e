//! Rendered page cache with time-based revalidation.
//!
//! A page stays fresh for the revalidation interval. Once stale it is still
//! served while exactly one caller regenerates it; the cache hands out that
//! regeneration claim atomically with the lookup.
//!
//! "Not found" post pages live in a bounded set: past the capacity the
//! oldest one is evicted, so requests for arbitrary slugs cannot grow the
//! cache without limit.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, time::Instant};

/// Default number of cached "not found" pages.
pub const DEFAULT_NOT_FOUND_CAPACITY: usize = 256;

/// A cacheable page of the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// The listing page.
    Home,
    /// A post page by slug.
    Post(String),
}

impl Route {
    /// Site-relative path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Post(slug) => spacetraveling_core::content::post_href(slug),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// HTTP status class of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
}

/// A fully rendered HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: PageStatus,
    pub html: String,
}

impl RenderedPage {
    pub fn ok(html: String) -> Self {
        Self {
            status: PageStatus::Ok,
            html,
        }
    }

    pub fn not_found(html: String) -> Self {
        Self {
            status: PageStatus::NotFound,
            html,
        }
    }
}

/// Handle on a first generation running in another task.
#[derive(Debug, Clone)]
pub struct Pending(watch::Receiver<()>);

impl Pending {
    /// Wait until the generation stores its page or gives up.
    pub async fn settled(mut self) {
        // The sender lives in the slot and is dropped when the slot settles.
        while self.0.changed().await.is_ok() {}
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Within the revalidation interval.
    Fresh(Arc<RenderedPage>),

    /// Past the revalidation interval. When `claimed` is set, the caller
    /// must regenerate the page and then [`PageCache::store`] or
    /// [`PageCache::release`] it.
    Stale {
        page: Arc<RenderedPage>,
        claimed: bool,
    },

    /// Another caller is generating the page for the first time.
    Generating(Pending),

    /// Never generated. The caller now holds the generation claim.
    Missing,
}

#[derive(Debug)]
enum Slot {
    Generating(watch::Sender<()>),
    Ready {
        page: Arc<RenderedPage>,
        generated_at: Instant,
        regenerating: bool,
    },
}

#[derive(Debug, Default)]
struct Slots {
    pages: HashMap<Route, Slot>,
    /// Routes holding a "not found" page, oldest first.
    not_found: VecDeque<Route>,
}

/// Cache of rendered pages keyed by route.
#[derive(Debug)]
pub struct PageCache {
    slots: Mutex<Slots>,
    revalidate: Duration,
    not_found_capacity: usize,
}

impl PageCache {
    /// Create an empty cache.
    pub fn new(revalidate: Duration) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            revalidate,
            not_found_capacity: DEFAULT_NOT_FOUND_CAPACITY,
        }
    }

    /// Keep at most `capacity` "not found" pages.
    #[must_use]
    pub fn with_not_found_capacity(mut self, capacity: usize) -> Self {
        self.not_found_capacity = capacity;
        self
    }

    /// Revalidation interval.
    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `route`, claiming generation when nobody else holds it.
    pub fn lookup(&self, route: &Route) -> Lookup {
        let mut slots = self.slots();
        match slots.pages.get_mut(route) {
            Some(Slot::Ready {
                page,
                generated_at,
                regenerating,
            }) => {
                if generated_at.elapsed() < self.revalidate {
                    Lookup::Fresh(Arc::clone(page))
                } else {
                    let claimed = !*regenerating;
                    *regenerating = true;
                    Lookup::Stale {
                        page: Arc::clone(page),
                        claimed,
                    }
                }
            }
            Some(Slot::Generating(done)) => Lookup::Generating(Pending(done.subscribe())),
            None => {
                let (done, _) = watch::channel(());
                slots.pages.insert(route.clone(), Slot::Generating(done));
                Lookup::Missing
            }
        }
    }

    /// Store a freshly generated page, dropping any claim on `route`.
    ///
    /// Storing a "not found" page past the capacity evicts the oldest one.
    pub fn store(&self, route: Route, page: RenderedPage) -> Arc<RenderedPage> {
        let page = Arc::new(page);
        let mut slots = self.slots();

        slots.not_found.retain(|tracked| tracked != &route);
        if page.status == PageStatus::NotFound {
            slots.not_found.push_back(route.clone());
        }

        slots.pages.insert(
            route,
            Slot::Ready {
                page: Arc::clone(&page),
                generated_at: Instant::now(),
                regenerating: false,
            },
        );

        while slots.not_found.len() > self.not_found_capacity {
            let Some(evicted) = slots.not_found.pop_front() else {
                break;
            };
            slots.pages.remove(&evicted);
        }

        page
    }

    /// Give up a claim after a failed generation.
    ///
    /// A stale page keeps being served and the next request past the
    /// interval retries; a route that never rendered is forgotten.
    pub fn release(&self, route: &Route) {
        let mut slots = self.slots();
        match slots.pages.get_mut(route) {
            Some(Slot::Ready { regenerating, .. }) => *regenerating = false,
            Some(Slot::Generating(_)) => {
                slots.pages.remove(route);
            }
            None => {}
        }
    }

    /// Currently cached page for `route`, regardless of freshness.
    pub fn get(&self, route: &Route) -> Option<Arc<RenderedPage>> {
        match self.slots().pages.get(route) {
            Some(Slot::Ready { page, .. }) => Some(Arc::clone(page)),
            _ => None,
        }
    }

    /// Number of rendered pages.
    pub fn len(&self) -> usize {
        self.slots()
            .pages
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
