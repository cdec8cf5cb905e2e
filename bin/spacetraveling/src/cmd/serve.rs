//! Serve command - run the blog server

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use spacetraveling_core::Config;
use spacetraveling_generator::{PrerenderStats, Site};
use spacetraveling_prismic::PrismicClient;
use tokio::net::TcpListener;

use crate::server::create_router;

/// Run the serve command.
///
/// Prerenders the site unless disabled, then serves it until Ctrl+C.
pub async fn run(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
    prerender: bool,
) -> Result<()> {
    tracing::info!(?config_path, "Starting server");

    let mut config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let client =
        PrismicClient::from_config(&config.prismic).wrap_err("Failed to create Prismic client")?;
    let site = Arc::new(
        Site::new(config.clone(), Arc::new(client)).wrap_err("Failed to initialize site")?,
    );

    if prerender && config.render.prerender {
        match site.prerender().await {
            Ok(stats) => print_prerender_stats(&stats),
            Err(e) => {
                tracing::warn!(error = %e, "prerender failed, pages will render on demand");
                eprintln!("  ⚠ Prerender failed: {e}");
            }
        }
    }

    let app = create_router(Arc::clone(&site));
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Print prerender statistics in a user-friendly format.
fn print_prerender_stats(stats: &PrerenderStats) {
    println!();
    println!("  Prerender Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Pages:        {:>6}", stats.pages);
    println!("  Failures:     {:>6}", stats.failures);
    println!("  Duration:     {:>6}ms", stats.duration_ms);
    println!();
}
