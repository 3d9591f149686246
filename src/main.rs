//! Sales Explorer HTTP server
//!
//! Reads an optional YAML file named by `SALES_CONFIG`, applies environment
//! overrides, opens the configured store and serves until SIGTERM or Ctrl+C.

use anyhow::Result;
use sales_explorer::config::{AppConfig, StorageBackend};
use sales_explorer::core::store::SalesStore;
use sales_explorer::server::ServerBuilder;
use sales_explorer::storage::InMemorySalesStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("SALES_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    }
    .apply_env_overrides()?;

    tracing::info!(
        environment = %config.environment,
        backend = ?config.storage.backend,
        timeout_ms = config.query.timeout_ms,
        "Starting sales-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = open_store(&config).await?;
    let addr = config.server.bind.clone();

    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(&config)
        .serve(&addr)
        .await
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn SalesStore>> {
    match config.storage.backend {
        StorageBackend::InMemory => {
            let store = match &config.storage.seed_file {
                Some(path) => InMemorySalesStore::from_json_file(path)?,
                None => {
                    tracing::warn!("No seed file configured, serving an empty in-memory store");
                    InMemorySalesStore::new()
                }
            };
            Ok(Arc::new(store))
        }
        StorageBackend::Mongodb => open_mongo_store(config).await,
    }
}

#[cfg(feature = "mongodb_backend")]
async fn open_mongo_store(config: &AppConfig) -> Result<Arc<dyn SalesStore>> {
    use sales_explorer::core::error::ConfigError;
    use sales_explorer::storage::MongoSalesStore;

    let uri = config
        .storage
        .mongo_uri
        .as_deref()
        .ok_or_else(|| ConfigError::MissingField {
            field: "storage.mongo_uri".to_string(),
        })?;

    let store =
        MongoSalesStore::connect(uri, &config.storage.database, &config.storage.collection).await?;
    store.ensure_indexes().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn open_mongo_store(_config: &AppConfig) -> Result<Arc<dyn SalesStore>> {
    Err(sales_explorer::core::error::ConfigError::BackendUnavailable {
        backend: "mongodb".to_string(),
    }
    .into())
}
