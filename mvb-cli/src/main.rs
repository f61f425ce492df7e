//! Movibucks CLI - main entry point
//!
//! Resolves the root folder, opens the catalog database, wires up the OMDb
//! provider when an API key is available and runs one command.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mvb_cli::config::resolve_omdb_api_key;
use mvb_cli::services::{MetadataProvider, OmdbClient};
use mvb_cli::{execute, AppContext, Cli};
use mvb_common::config::{LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig};
use mvb_common::db::init_database;
use mvb_common::StateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let toml_config = TomlConfig::load_or_default();

    init_tracing(&toml_config.logging)?;

    info!(
        "Starting Movibucks (mvb) v{}",
        env!("CARGO_PKG_VERSION")
    );
    warn_if_config_readable();

    let root_folder = RootFolderResolver::new("mvb")
        .with_cli_arg(cli.root_folder.clone())
        .with_toml_config(toml_config.clone())
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to open catalog database")?;
    let store = StateStore::new(pool);

    let provider: Option<Arc<dyn MetadataProvider>> =
        match resolve_omdb_api_key(&store, &toml_config).await? {
            Some(key) => Some(Arc::new(
                OmdbClient::new(key).context("Failed to create OMDb client")?,
            )),
            None => None,
        };

    let mut ctx = AppContext::open(store, provider).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &mut ctx, &mut out).await?;
    out.flush()?;

    Ok(())
}

/// Log to stderr (or the configured file) so command output stays on stdout
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match &logging.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// The config file may hold an API key
#[cfg(unix)]
fn warn_if_config_readable() {
    use mvb_common::config::{check_toml_permissions_loose, default_config_path};

    let Some(path) = default_config_path() else {
        return;
    };
    if let Ok(true) = check_toml_permissions_loose(&path) {
        warn!(
            "Config file {} is readable by other users; consider chmod 600",
            path.display()
        );
    }
}

#[cfg(not(unix))]
fn warn_if_config_readable() {}
