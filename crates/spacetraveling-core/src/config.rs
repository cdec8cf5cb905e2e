//! Site configuration management.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    date::DateFormatter,
    error::{CoreError, Result},
};

/// Main configuration structure for Spacetraveling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content API settings.
    pub prismic: PrismicConfig,

    /// Page rendering and regeneration settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// User-facing strings.
    #[serde(default)]
    pub labels: Labels,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Value of the `lang` attribute on rendered pages.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Locale used for publication dates (e.g., "pt_BR").
    #[serde(default = "default_date_locale")]
    pub date_locale: String,

    /// strftime pattern used for publication dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,
}

/// Content API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrismicConfig {
    /// API entry point, e.g. "https://my-repo.prismic.io/api/v2".
    pub endpoint: String,

    /// Access token for private repositories.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Custom type holding the blog posts.
    #[serde(default = "default_document_type")]
    pub document_type: String,

    /// Number of posts per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Seconds a rendered page stays fresh before it is regenerated.
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,

    /// Serve a loading placeholder for posts that were never generated.
    #[serde(default = "default_true")]
    pub fallback: bool,

    /// Render the listing and every known post on startup.
    #[serde(default = "default_true")]
    pub prerender: bool,

    /// Most "post not found" pages kept cached; the oldest is evicted first.
    #[serde(default = "default_not_found_capacity")]
    pub not_found_capacity: usize,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the compiled frontend (`pkg/` lives below it).
    #[serde(default = "default_site_root")]
    pub site_root: String,

    /// Directory with static assets such as the logo.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

/// User-facing strings rendered by the server and the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// "Load more" button text.
    #[serde(default = "default_load_more")]
    pub load_more: String,

    /// Text shown while a page is loading.
    #[serde(default = "default_loading")]
    pub loading: String,

    /// Button text after a failed fetch.
    #[serde(default = "default_retry")]
    pub retry: String,

    /// Message shown when fetching more posts failed.
    #[serde(default = "default_fetch_failed")]
    pub fetch_failed: String,

    /// Heading of the not-found page.
    #[serde(default = "default_not_found")]
    pub not_found: String,

    /// Suffix appended to the reading time.
    #[serde(default = "default_reading_time_suffix")]
    pub reading_time_suffix: String,
}

// Default value functions
fn default_lang() -> String {
    "pt-BR".to_string()
}

fn default_date_locale() -> String {
    "pt_BR".to_string()
}

fn default_date_format() -> String {
    "%-d de %b de %Y".to_string()
}

fn default_document_type() -> String {
    "posts".to_string()
}

fn default_page_size() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_revalidate_secs() -> u64 {
    60 * 30
}

fn default_not_found_capacity() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_site_root() -> String {
    "target/site".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_load_more() -> String {
    "Carregar mais posts".to_string()
}

fn default_loading() -> String {
    "Carregando...".to_string()
}

fn default_retry() -> String {
    "Tentar novamente".to_string()
}

fn default_fetch_failed() -> String {
    "Não foi possível carregar mais posts.".to_string()
}

fn default_not_found() -> String {
    "Post não encontrado".to_string()
}

fn default_reading_time_suffix() -> String {
    "min".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            revalidate_secs: default_revalidate_secs(),
            fallback: true,
            prerender: true,
            not_found_capacity: default_not_found_capacity(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_root: default_site_root(),
            public_dir: default_public_dir(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            load_more: default_load_more(),
            loading: default_loading(),
            retry: default_retry(),
            fetch_failed: default_fetch_failed(),
            not_found: default_not_found(),
            reading_time_suffix: default_reading_time_suffix(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, letting
    /// `SPACETRAVELING__SECTION__KEY` variables override file values.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("SPACETRAVELING")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        let endpoint = self.prismic.endpoint.trim();
        if endpoint.is_empty() {
            return Err(CoreError::config("prismic.endpoint cannot be empty"));
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(CoreError::config(format!(
                "prismic.endpoint must be an http(s) URL: {endpoint}"
            )));
        }

        if self.prismic.page_size == 0 {
            return Err(CoreError::config("prismic.page_size must be at least 1"));
        }

        if self.render.revalidate_secs == 0 {
            return Err(CoreError::config(
                "render.revalidate_secs must be at least 1",
            ));
        }

        self.date_formatter()?;

        Ok(())
    }

    /// Date formatter built from `site.date_locale` and `site.date_format`.
    pub fn date_formatter(&self) -> Result<DateFormatter> {
        DateFormatter::new(&self.site.date_locale, &self.site.date_format)
    }

    /// Time a rendered page stays fresh.
    pub fn revalidate_interval(&self) -> Duration {
        Duration::from_secs(self.render.revalidate_secs)
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
