//! Bondbook server entry point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bondbook_server::bootstrap::{load_currencies, open_storage};
use bondbook_server::{Server, ServerConfig};

const DEFAULT_CONFIG_PATH: &str = "config/bondbook.toml";

/// Bondbook: a per-user bond register with LEI enrichment
#[derive(Parser, Debug)]
#[command(name = "bondbook-server")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Configuration file
        #[arg(short, long, env = "BONDBOOK_CONFIG")]
        config: Option<PathBuf>,

        /// Host address to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load the currency list into the registry and exit
    PopulateCurrencies {
        /// Configuration file
        #[arg(short, long, env = "BONDBOOK_CONFIG")]
        config: Option<PathBuf>,

        /// Currency list to load instead of the configured one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the registered currency codes and exit
    ListCurrencies {
        /// Configuration file
        #[arg(short, long, env = "BONDBOOK_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "debug,tower_http=debug"
    } else {
        "info,bondbook=debug"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            Ok(ServerConfig::from_file(DEFAULT_CONFIG_PATH)?)
        }
        None => {
            info!("Using default configuration");
            Ok(ServerConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            verbose,
        } => {
            init_logging(verbose);
            info!("Bondbook Server v{}", env!("CARGO_PKG_VERSION"));

            let mut config = load_config(config.as_deref())?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let server = Server::from_config(config).await?;
            server.start().await?;
        }
        Command::PopulateCurrencies { config, file } => {
            init_logging(false);

            let config = load_config(config.as_deref())?;
            if config.storage_path.is_none() {
                warn!("No storage_path configured; currencies will not outlive this process");
            }

            let path = file.or(config.currencies_file.clone());
            let codes = load_currencies(path.as_deref()).context("reading currency list")?;
            let storage = open_storage(&config).context("opening storage")?;
            let total = storage.currencies.populate(&codes).await?;

            println!("{total} currencies registered");
        }
        Command::ListCurrencies { config } => {
            init_logging(false);

            let config = load_config(config.as_deref())?;
            if config.storage_path.is_none() {
                warn!("No storage_path configured; listing an empty in-memory registry");
            }

            let storage = open_storage(&config).context("opening storage")?;
            for code in storage.currencies.list().await? {
                println!("{code}");
            }
        }
    }

    Ok(())
}
