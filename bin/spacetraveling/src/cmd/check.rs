//! Check command - validate configuration and reach the content API

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use spacetraveling_core::{Config, ContentSource};
use spacetraveling_prismic::PrismicClient;

/// Run the check command.
///
/// Loads and validates the configuration, then fetches the first listing
/// page to confirm the Prismic repository is reachable.
pub async fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking configuration and content API");

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Validation failed: {e}");
        }
    };

    for warning in config_warnings(&config) {
        println!("  ⚠ {warning}");
    }

    println!("\nChecking content API...");
    let client = PrismicClient::from_config(&config.prismic)?;
    match client.first_page(config.prismic.page_size).await {
        Ok(page) => {
            println!(
                "  ✓ {} reachable ({} post(s) on the first page, more: {})",
                client.endpoint(),
                page.items.len(),
                if page.next_cursor.is_some() { "yes" } else { "no" }
            );
        }
        Err(e) => {
            println!("  ✗ {} unreachable: {e}", client.endpoint());
            bail!("Content API check failed: {e}");
        }
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Non-fatal configuration issues.
fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.site.base_url.starts_with("http") {
        warnings.push("site.base_url should start with http:// or https://".to_string());
    }

    if config.prismic.endpoint.starts_with("http://") {
        warnings.push("prismic.endpoint is not using HTTPS".to_string());
    }

    if !config.render.prerender {
        warnings.push("render.prerender is off; every page renders on first request".to_string());
    }

    let public_dir = Path::new(&config.server.public_dir);
    if !public_dir.is_dir() {
        warnings.push(format!(
            "Public assets directory missing: {}",
            public_dir.display()
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str, base_url: &str) -> Config {
        toml::from_str(&format!(
            r#"
[site]
title = "spacetraveling"
base_url = "{base_url}"

[prismic]
endpoint = "{endpoint}"

[server]
public_dir = "."
"#
        ))
        .unwrap()
    }

    #[test]
    fn test_config_warnings_clean() {
        let config = config(
            "https://spacetraveling.cdn.prismic.io/api/v2",
            "https://blog.example.com",
        );
        assert!(config_warnings(&config).is_empty());
    }

    #[test]
    fn test_config_warnings_plain_http_endpoint() {
        let config = config("http://localhost:8080/api/v2", "blog.example.com");
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("HTTPS")));
        assert!(warnings.iter().any(|w| w.contains("base_url")));
    }

    #[tokio::test]
    async fn test_check_fails_for_missing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run(&dir.path().join("missing.toml")).await;
        assert!(result.is_err());
    }
}
