//! Spacetraveling CLI
//!
//! Blog server backed by a Prismic repository.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Spacetraveling.
#[derive(Parser)]
#[command(
    name = "spacetraveling",
    version,
    about = "Blog server with incremental page regeneration"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Start the blog server
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Skip prerendering at startup
        #[arg(long)]
        no_prerender: bool,
    },
    /// Validate configuration and reach the content API
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    spacetraveling::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_prerender,
        } => {
            spacetraveling::cmd::serve::run(&cli.config, host, port, !no_prerender).await?;
        }
        Commands::Check => {
            spacetraveling::cmd::check::run(&cli.config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_serve_command_parsing() {
        let args = ["spacetraveling", "serve", "--host", "0.0.0.0", "--port", "8080"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Serve {
                host,
                port,
                no_prerender,
            } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert!(!no_prerender);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_defaults_to_config() {
        let cli = Cli::parse_from(["spacetraveling", "serve", "--no-prerender"]);

        match cli.command {
            Commands::Serve {
                host,
                port,
                no_prerender,
            } => {
                assert!(host.is_none());
                assert!(port.is_none());
                assert!(no_prerender);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["spacetraveling", "check"]);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["spacetraveling", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["spacetraveling", "--config", "blog.toml", "serve"]);
        assert_eq!(cli.config, std::path::PathBuf::from("blog.toml"));
    }
}
