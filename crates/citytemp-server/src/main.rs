//! Service binary for the city temperature API.
//!
//! Wires configuration, logging, storage and the HTTP server together and
//! serves until the process receives `Ctrl-C` or `SIGTERM`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `citytemp-config.yaml` (or `CITYTEMP_CONFIG`)
//! 2. Apply environment overrides
//! 3. Initialize structured logging (tracing)
//! 4. Open the configured storage backend, running migrations if enabled
//! 5. Serve the API until shutdown
//! 6. Release storage

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use citytemp_api::{AppState, ServerConfig, start_server};
use citytemp_db::{MemoryStore, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSection, ServiceConfig, StorageBackend, StorageSection};
use crate::error::StartupError;

/// Config file looked up in the working directory when `CITYTEMP_CONFIG`
/// is unset.
const DEFAULT_CONFIG_PATH: &str = "citytemp-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let mut config = load_config()?;

    // 2. Environment overrides win over the file.
    config.apply_env_overrides()?;

    // 3. Initialize structured logging.
    init_tracing(&config.logging)?;

    info!(
        host = config.server.host,
        port = config.server.port,
        backend = ?config.storage.backend,
        "citytemp-server starting"
    );

    let server_config = ServerConfig::from(&config.server);

    // 4-6. Open storage, serve, release.
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = connect_postgres(&config.storage).await?;
            let state = Arc::new(AppState::new(pool));
            let served = start_server(&server_config, Arc::clone(&state)).await;
            state.repo.close().await;
            served?;
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data will not survive a restart");
            let state = Arc::new(AppState::new(MemoryStore::new()));
            start_server(&server_config, state).await?;
        }
    }

    info!("citytemp-server shutdown complete");
    Ok(())
}

/// Load the service configuration.
///
/// Reads the file named by `CITYTEMP_CONFIG`, falling back to
/// `citytemp-config.yaml`. A missing file yields defaults.
fn load_config() -> Result<ServiceConfig, StartupError> {
    let config_path = std::env::var_os("CITYTEMP_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        Ok(ServiceConfig::from_file(&config_path)?)
    } else {
        Ok(ServiceConfig::default())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingSection) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| StartupError::Logging {
            message: format!("invalid log filter {:?}: {e}", logging.level),
        })?;

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }

    Ok(())
}

/// Connect the `PostgreSQL` pool and apply migrations when enabled.
async fn connect_postgres(storage: &StorageSection) -> Result<PostgresPool, StartupError> {
    let pool = PostgresPool::connect(&storage.postgres_config()).await?;

    if storage.run_migrations {
        pool.run_migrations().await?;
    } else {
        info!("Skipping migrations (storage.run_migrations = false)");
    }

    Ok(pool)
}
