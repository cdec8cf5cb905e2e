//! Site orchestration.
//!
//! Ties the content source, the HTML generator and the page cache together:
//! pages are prerendered at startup, served from the cache, and regenerated
//! in the background once they go stale.

use std::{sync::Arc, time::Instant};

use spacetraveling_core::{ArticleSummary, Config, ContentSource, Cursor, Page, SourceError};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::{Lookup, PageCache, RenderedPage, Route},
    html::{HtmlError, HtmlGenerator},
};

/// Site errors.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Content source error.
    #[error("content source error: {0}")]
    Source(#[from] SourceError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// A generation task panicked or was cancelled.
    #[error("generation task failed: {0}")]
    Task(#[from] JoinError),
}

/// Result type for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

/// What to send for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served {
    /// A rendered page, possibly stale.
    Page(Arc<RenderedPage>),
    /// Placeholder while the page is generated in the background.
    Fallback(String),
}

/// Prerender statistics.
#[derive(Debug, Clone, Default)]
pub struct PrerenderStats {
    /// Number of pages rendered.
    pub pages: usize,

    /// Number of posts that failed to render.
    pub failures: usize,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// The blog: content source, renderer and page cache.
pub struct Site {
    config: Config,
    source: Arc<dyn ContentSource>,
    generator: HtmlGenerator,
    cache: PageCache,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("title", &self.config.site.title)
            .field("cached_pages", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Create a site backed by `source`.
    pub fn new(config: Config, source: Arc<dyn ContentSource>) -> Result<Self> {
        let generator = HtmlGenerator::new(config.clone())?;
        let cache = PageCache::new(config.revalidate_interval())
            .with_not_found_capacity(config.render.not_found_capacity);
        Ok(Self {
            config,
            source,
            generator,
            cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn generator(&self) -> &HtmlGenerator {
        &self.generator
    }

    /// Render `route` from current content, bypassing the cache.
    #[instrument(skip(self, route), fields(route = %route))]
    pub async fn generate(&self, route: &Route) -> Result<RenderedPage> {
        match route {
            Route::Home => {
                let page = self.source.first_page(self.config.prismic.page_size).await?;
                Ok(RenderedPage::ok(self.generator.generate_home(&page)?))
            }
            Route::Post(slug) => match self.source.article(slug).await? {
                Some(article) => Ok(RenderedPage::ok(self.generator.generate_post(&article)?)),
                None => {
                    debug!("no such post");
                    Ok(RenderedPage::not_found(self.generator.generate_not_found()?))
                }
            },
        }
    }

    /// Serve `route` from the cache, generating or regenerating as needed.
    pub async fn serve(self: &Arc<Self>, route: Route) -> Result<Served> {
        loop {
            match self.cache.lookup(&route) {
                Lookup::Fresh(page) => return Ok(Served::Page(page)),
                Lookup::Stale { page, claimed } => {
                    if claimed {
                        debug!(route = %route, "page is stale, regenerating");
                        self.spawn_generation(route);
                    }
                    return Ok(Served::Page(page));
                }
                Lookup::Generating(pending) => match self.fallback_slug(&route) {
                    Some(slug) => {
                        return Ok(Served::Fallback(self.generator.generate_fallback(slug)?));
                    }
                    None => {
                        pending.settled().await;
                        if let Some(page) = self.cache.get(&route) {
                            return Ok(Served::Page(page));
                        }
                        // The other generation failed; look again and claim it.
                    }
                },
                Lookup::Missing => {
                    return match self.fallback_slug(&route) {
                        Some(slug) => {
                            let html = self.generator.generate_fallback(slug);
                            self.spawn_generation(route.clone());
                            Ok(Served::Fallback(html?))
                        }
                        // Generation runs in its own task so a dropped request
                        // cannot leave the route claimed.
                        None => Ok(Served::Page(self.spawn_generation(route).await??)),
                    };
                }
            }
        }
    }

    /// Prerender the listing page and every known post.
    ///
    /// Fails only when the listing page or the slug list cannot be fetched;
    /// individual posts that fail are logged and counted.
    pub async fn prerender(&self) -> Result<PrerenderStats> {
        let start = Instant::now();
        let mut stats = PrerenderStats::default();

        info!("prerendering site");

        let home = self.generate(&Route::Home).await?;
        self.cache.store(Route::Home, home);
        stats.pages += 1;

        let slugs = self.source.slugs().await?;
        debug!(count = slugs.len(), "found posts");

        for slug in slugs {
            let route = Route::Post(slug);
            match self.generate(&route).await {
                Ok(page) => {
                    self.cache.store(route, page);
                    stats.pages += 1;
                }
                Err(e) => {
                    warn!(route = %route, error = %e, "failed to prerender page");
                    stats.failures += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            pages = stats.pages,
            failures = stats.failures,
            duration_ms = stats.duration_ms,
            "prerender complete"
        );

        Ok(stats)
    }

    /// Listing page at `cursor`, or the first page when no cursor is given.
    pub async fn listing_page(
        &self,
        cursor: Option<&str>,
    ) -> std::result::Result<Page<ArticleSummary>, SourceError> {
        match cursor.and_then(|raw| Cursor::new(raw)) {
            Some(cursor) => self.source.page_at(&cursor).await,
            None => self.source.first_page(self.config.prismic.page_size).await,
        }
    }

    fn fallback_slug<'a>(&self, route: &'a Route) -> Option<&'a str> {
        match route {
            Route::Post(slug) if self.config.render.fallback => Some(slug.as_str()),
            _ => None,
        }
    }

    fn spawn_generation(self: &Arc<Self>, route: Route) -> JoinHandle<Result<Arc<RenderedPage>>> {
        let site = Arc::clone(self);
        tokio::spawn(async move { site.generate_and_store(route).await })
    }

    async fn generate_and_store(&self, route: Route) -> Result<Arc<RenderedPage>> {
        match self.generate(&route).await {
            Ok(page) => {
                debug!(route = %route, "page generated");
                Ok(self.cache.store(route, page))
            }
            Err(e) => {
                warn!(route = %route, error = %e, "page generation failed");
                self.cache.release(&route);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use spacetraveling_core::{Article, Section};

    use super::*;
    use crate::cache::PageStatus;

    /// In-memory content source that counts calls.
    #[derive(Default)]
    struct StubSource {
        posts: Mutex<HashMap<String, Article>>,
        article_calls: AtomicUsize,
        listing_calls: AtomicUsize,
        failing: AtomicBool,
        latency_ms: AtomicU64,
    }

    impl StubSource {
        fn with_posts(slugs: &[&str]) -> Arc<Self> {
            let source = Self::default();
            for slug in slugs {
                source.publish(slug, &format!("Post {slug}"));
            }
            Arc::new(source)
        }

        fn publish(&self, slug: &str, title: &str) {
            let article = Article {
                id: slug.to_string(),
                published_at: Some(Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap()),
                title: title.to_string(),
                banner_url: "https://images.prismic.io/banner.png".to_string(),
                author: "Danilo Vieira".to_string(),
                sections: vec![Section {
                    heading: "Introdução".to_string(),
                    paragraphs: vec!["Lorem ipsum dolor sit amet".to_string()],
                }],
            };
            self.posts.lock().unwrap().insert(slug.to_string(), article);
        }

        async fn respond(&self) -> std::result::Result<(), SourceError> {
            let latency = self.latency_ms.load(Ordering::SeqCst);
            if latency > 0 {
                tokio::time::sleep(Duration::from_millis(latency)).await;
            }
            self.check()
        }

        fn check(&self) -> std::result::Result<(), SourceError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(SourceError::network("HTTP 503"))
            } else {
                Ok(())
            }
        }

        fn summaries(&self) -> Vec<ArticleSummary> {
            let mut posts: Vec<_> = self
                .posts
                .lock()
                .unwrap()
                .values()
                .map(|a| ArticleSummary {
                    id: a.id.clone(),
                    published_at: a.published_at.unwrap(),
                    title: a.title.clone(),
                    subtitle: String::new(),
                    author: a.author.clone(),
                })
                .collect();
            posts.sort_by(|a, b| a.id.cmp(&b.id));
            posts
        }
    }

    #[async_trait]
    impl ContentSource for StubSource {
        async fn first_page(
            &self,
            _page_size: u32,
        ) -> std::result::Result<Page<ArticleSummary>, SourceError> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            self.respond().await?;
            Ok(Page::new(self.summaries(), Cursor::new("stub:2")))
        }

        async fn page_at(
            &self,
            cursor: &Cursor,
        ) -> std::result::Result<Page<ArticleSummary>, SourceError> {
            self.check()?;
            match cursor.as_str() {
                "stub:2" => Ok(Page::last(self.summaries())),
                other => Err(SourceError::invalid_cursor(other)),
            }
        }

        async fn article(&self, id: &str) -> std::result::Result<Option<Article>, SourceError> {
            self.article_calls.fetch_add(1, Ordering::SeqCst);
            self.respond().await?;
            Ok(self.posts.lock().unwrap().get(id).cloned())
        }

        async fn slugs(&self) -> std::result::Result<Vec<String>, SourceError> {
            self.check()?;
            Ok(self.summaries().into_iter().map(|s| s.id).collect())
        }
    }

    fn test_config(fallback: bool) -> Config {
        let mut config: Config = toml::from_str(
            r#"
[site]
title = "spacetraveling"
base_url = "https://blog.example.com"

[prismic]
endpoint = "https://spacetraveling.cdn.prismic.io/api/v2"
"#,
        )
        .unwrap();
        config.render.fallback = fallback;
        config
    }

    fn site(source: Arc<StubSource>, fallback: bool) -> Arc<Site> {
        Arc::new(Site::new(test_config(fallback), source).unwrap())
    }

    fn post(slug: &str) -> Route {
        Route::Post(slug.to_string())
    }

    fn html(served: Served) -> String {
        match served {
            Served::Page(page) => page.html.clone(),
            Served::Fallback(html) => html,
        }
    }

    /// Let spawned generations run until `done` holds.
    async fn settle(done: impl Fn() -> bool) {
        for _ in 0..100 {
            if done() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background generation did not finish");
    }

    #[tokio::test(start_paused = true)]
    async fn test_prerender_renders_home_and_posts() {
        let source = StubSource::with_posts(&["a", "b"]);
        let site = site(Arc::clone(&source), true);

        let stats = site.prerender().await.unwrap();
        assert_eq!(stats.pages, 3);
        assert_eq!(stats.failures, 0);

        let served = site.serve(post("a")).await.unwrap();
        assert!(matches!(&served, Served::Page(page) if page.status == PageStatus::Ok));
        assert!(html(served).contains("Post a"));
        assert_eq!(source.article_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prerender_fails_when_listing_unavailable() {
        let source = StubSource::with_posts(&["a"]);
        source.failing.store(true, Ordering::SeqCst);
        let site = site(source, true);

        assert!(matches!(
            site.prerender().await,
            Err(SiteError::Source(SourceError::Network { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_home_renders_inline() {
        let source = StubSource::with_posts(&["a"]);
        let site = site(Arc::clone(&source), true);

        let served = site.serve(Route::Home).await.unwrap();
        assert!(html(served).contains(r#"href="/post/a""#));
        assert!(site.cache().get(&Route::Home).is_some());
        assert_eq!(source.listing_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_home_failure_is_not_cached() {
        let source = StubSource::with_posts(&["a"]);
        source.failing.store(true, Ordering::SeqCst);
        let site = site(Arc::clone(&source), true);

        assert!(site.serve(Route::Home).await.is_err());

        source.failing.store(false, Ordering::SeqCst);
        assert!(site.serve(Route::Home).await.is_ok());
        assert_eq!(source.listing_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_slug_serves_fallback_then_article() {
        let source = StubSource::with_posts(&[]);
        let site = site(Arc::clone(&source), true);
        source.publish("novo-post", "Novo post");

        let served = site.serve(post("novo-post")).await.unwrap();
        assert!(matches!(&served, Served::Fallback(html) if html.contains("Carregando...")));

        // A second request during generation gets the placeholder too.
        let again = site.serve(post("novo-post")).await.unwrap();
        assert!(matches!(again, Served::Fallback(_)));

        settle(|| site.cache().get(&post("novo-post")).is_some()).await;

        let served = site.serve(post("novo-post")).await.unwrap();
        assert!(html(served).contains("<h1>Novo post</h1>"));
        assert_eq!(source.article_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_slug_resolves_to_not_found() {
        let source = StubSource::with_posts(&[]);
        let site = site(source, true);

        site.serve(post("nao-existe")).await.unwrap();
        settle(|| site.cache().get(&post("nao-existe")).is_some()).await;

        let served = site.serve(post("nao-existe")).await.unwrap();
        assert!(matches!(&served, Served::Page(page) if page.status == PageStatus::NotFound));
        assert!(html(served).contains("Post não encontrado"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_fallback_posts_render_inline() {
        let source = StubSource::with_posts(&["a"]);
        let site = site(source, false);

        let served = site.serve(post("a")).await.unwrap();
        assert!(matches!(&served, Served::Page(page) if page.status == PageStatus::Ok));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_first_generation() {
        let source = StubSource::with_posts(&["a"]);
        source.latency_ms.store(50, Ordering::SeqCst);
        let site = site(Arc::clone(&source), false);

        let (first, second) = tokio::join!(site.serve(post("a")), site.serve(post("a")));
        assert!(html(first.unwrap()).contains("<h1>Post a</h1>"));
        assert!(html(second.unwrap()).contains("<h1>Post a</h1>"));
        assert_eq!(source.article_calls.load(Ordering::SeqCst), 1);

        let (first, second) = tokio::join!(site.serve(Route::Home), site.serve(Route::Home));
        assert!(first.is_ok() && second.is_ok());
        assert_eq!(source.listing_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_request_retries_after_failed_generation() {
        let source = StubSource::with_posts(&["a"]);
        source.latency_ms.store(50, Ordering::SeqCst);
        source.failing.store(true, Ordering::SeqCst);
        let site = site(Arc::clone(&source), false);

        let (first, second) = tokio::join!(site.serve(post("a")), site.serve(post("a")));
        assert!(first.is_err());
        assert!(second.is_err());
        assert_eq!(source.article_calls.load(Ordering::SeqCst), 2);
        assert!(site.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_slugs_do_not_grow_cache() {
        let source = StubSource::with_posts(&["a"]);
        let mut config = test_config(false);
        config.render.not_found_capacity = 8;
        let site = Arc::new(Site::new(config, source).unwrap());
        site.prerender().await.unwrap();

        for i in 0..100 {
            let served = site.serve(post(&format!("junk-{i}"))).await.unwrap();
            assert!(matches!(served, Served::Page(page) if page.status == PageStatus::NotFound));
        }

        assert_eq!(site.cache().len(), 2 + 8);
        assert!(site.cache().get(&Route::Home).is_some());
        assert!(site.cache().get(&post("a")).is_some());
        assert!(site.cache().get(&post("junk-0")).is_none());
        assert!(site.cache().get(&post("junk-99")).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_page_served_while_one_regeneration_runs() {
        let source = StubSource::with_posts(&["a"]);
        let site = site(Arc::clone(&source), true);
        site.prerender().await.unwrap();
        let calls_after_prerender = source.article_calls.load(Ordering::SeqCst);

        source.publish("a", "Título atualizado");
        tokio::time::advance(site.config().revalidate_interval()).await;

        let first = site.serve(post("a")).await.unwrap();
        let second = site.serve(post("a")).await.unwrap();
        assert!(html(first).contains("Post a"));
        assert!(html(second).contains("Post a"));

        settle(|| {
            site.cache()
                .get(&post("a"))
                .is_some_and(|page| page.html.contains("Título atualizado"))
        })
        .await;

        assert_eq!(
            source.article_calls.load(Ordering::SeqCst),
            calls_after_prerender + 1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_regeneration_keeps_stale_page() {
        let source = StubSource::with_posts(&["a"]);
        let site = site(Arc::clone(&source), true);
        site.prerender().await.unwrap();

        source.failing.store(true, Ordering::SeqCst);
        tokio::time::advance(site.config().revalidate_interval()).await;

        let calls = source.article_calls.load(Ordering::SeqCst);
        let served = site.serve(post("a")).await.unwrap();
        assert!(html(served).contains("Post a"));

        // Once the failed attempt releases its claim the next stale hit retries.
        settle(|| matches!(site.cache().lookup(&post("a")), Lookup::Stale { claimed: true, .. }))
            .await;

        assert_eq!(source.article_calls.load(Ordering::SeqCst), calls + 1);
        assert!(site.cache().get(&post("a")).unwrap().html.contains("Post a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_page() {
        let source = StubSource::with_posts(&["a", "b"]);
        let site = site(source, true);

        let first = site.listing_page(None).await.unwrap();
        assert_eq!(first.next_cursor.as_ref().map(Cursor::as_str), Some("stub:2"));

        let blank = site.listing_page(Some("  ")).await.unwrap();
        assert_eq!(blank, first);

        let next = site.listing_page(Some("stub:2")).await.unwrap();
        assert!(next.next_cursor.is_none());

        assert!(matches!(
            site.listing_page(Some("https://evil.example.com")).await,
            Err(SourceError::InvalidCursor(_))
        ));
    }
}
