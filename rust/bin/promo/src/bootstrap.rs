//! Startup checks and store wiring.

use std::sync::Arc;

use promo::{EngineConfig, KvRepository, PromoService};
use promo_core::SystemClock;
use promo_kv::{KVStore, RedbStore};
use tracing::info;

use crate::config::ServerConfig;

/// Validate the configuration once, before anything is opened.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<EngineConfig> {
    if config.storage.data_dir.as_os_str().is_empty() {
        anyhow::bail!("storage.data_dir is empty in configuration.");
    }
    config
        .settings()
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))
}

/// Open the redb store and build the service around it.
pub fn open_service(config: &ServerConfig, engine: EngineConfig) -> anyhow::Result<Arc<PromoService>> {
    std::fs::create_dir_all(&config.storage.data_dir)?;
    let db_path = config.storage.resolve_db_path();

    let kv: Arc<dyn KVStore> = Arc::new(
        RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    info!("Opened store at {}", db_path.display());

    Ok(PromoService::new(
        Arc::new(KvRepository::new(kv)),
        engine,
        Arc::new(SystemClock::new()),
    ))
}
