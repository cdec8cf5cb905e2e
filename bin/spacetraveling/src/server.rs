//! HTTP server: cached pages, the listing API and static assets.

use std::{path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use spacetraveling_core::{ListingSeed, SourceError};
use spacetraveling_generator::{PageStatus, Route, Served, Site, SiteError};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the router serving `site`.
///
/// The WASM bundle is served from `<site_root>/pkg`; any other unmatched
/// path is looked up in the public assets directory.
pub fn create_router(site: Arc<Site>) -> Router {
    let server = &site.config().server;
    let pkg_dir = Path::new(&server.site_root).join("pkg");
    let public_dir = Path::new(&server.public_dir).to_path_buf();

    Router::new()
        .route("/", get(home_handler))
        .route("/post/{slug}", get(post_handler))
        .route(ListingSeed::ENDPOINT, get(posts_handler))
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(site)
}

async fn home_handler(State(site): State<Arc<Site>>) -> Response {
    page_response(site.serve(Route::Home).await)
}

async fn post_handler(
    State(site): State<Arc<Site>>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    page_response(site.serve(Route::Post(slug)).await)
}

/// Query of the listing API.
#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    /// Cursor of the requested page; the first page when absent.
    pub page: Option<String>,
}

async fn posts_handler(
    State(site): State<Arc<Site>>,
    Query(query): Query<PostsQuery>,
) -> Response {
    match site.listing_page(query.page.as_deref()).await {
        Ok(page) => Json(page).into_response(),
        Err(SourceError::InvalidCursor(message)) => {
            tracing::warn!(%message, "rejected listing cursor");
            (StatusCode::BAD_REQUEST, "invalid cursor").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch listing page");
            (StatusCode::BAD_GATEWAY, "content API unavailable").into_response()
        }
    }
}

fn page_response(result: Result<Served, SiteError>) -> Response {
    match result {
        Ok(Served::Page(page)) => {
            let status = match page.status {
                PageStatus::Ok => StatusCode::OK,
                PageStatus::NotFound => StatusCode::NOT_FOUND,
            };
            (status, Html(page.html.clone())).into_response()
        }
        Ok(Served::Fallback(html)) => {
            ([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to render page");
            let status = match e {
                SiteError::Source(_) => StatusCode::BAD_GATEWAY,
                SiteError::Html(_) | SiteError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, "failed to render page").into_response()
        }
    }
}
