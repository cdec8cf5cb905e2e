//! Spacetraveling CLI Library
//!
//! Command implementations and the HTTP server of the Spacetraveling blog.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, check)
//! - [`server`] - Page, listing API and static asset routes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use spacetraveling::cmd;
//!
//! # async fn run() -> color_eyre::eyre::Result<()> {
//! cmd::serve::run(Path::new("config.toml"), None, Some(3000), true).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;
pub mod server;

pub use spacetraveling_core::Config;
pub use spacetraveling_generator::{PrerenderStats, Site};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// spacetraveling::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
