//! Settings of the `cashflow` binary.
//!
//! Sources, lowest priority first: built-in defaults, the TOML file
//! (`config/settings.toml` unless `--config` says otherwise), environment
//! variables such as `CASHFLOW__SERVER__PORT`, command line flags.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Tracing level of the workspace crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database_url: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            database_url: "sqlite:cashflow.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_page_size: engine::DEFAULT_PAGE_SIZE,
            max_page_size: engine::MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub pagination: Pagination,
}

#[derive(Debug, Parser)]
#[command(name = "cashflow", about = "Cash flow ledger REST API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the listening address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the database URL (e.g. sqlite:cashflow.db?mode=rwc).
    #[arg(long)]
    database_url: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("CASHFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(database_url) = args.database_url {
            settings.server.database_url = database_url;
        }

        Ok(settings)
    }
}
