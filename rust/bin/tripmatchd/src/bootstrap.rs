//! Startup: config checks, store setup and module wiring.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use tripmatch_core::{Module, ServiceConfig};
use tripmatch_kv::{FileLoader, KVStore, OverlayKV, RedbStore};
use tripmatch_sql::{SQLStore, SqliteStore};

use crate::config::ServerConfig;
use crate::routes;

/// Refuse to start on a config that would run with unusable settings.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("jwt.expire_secs must be positive, got {}.", config.jwt.expire_secs);
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.catalog.popular_limit == 0 {
        anyhow::bail!("catalog.popular_limit must be at least 1.");
    }
    Ok(())
}

/// Embedded stores shared by every module.
pub struct Stores {
    pub kv: Arc<dyn KVStore>,
    pub sql: Arc<dyn SQLStore>,
}

/// Open the redb overlay (seeded from `seed_dir`) and the SQLite database.
pub fn open_stores(core: &ServiceConfig) -> anyhow::Result<Stores> {
    let db = RedbStore::open(&core.resolve_db_path())
        .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?;
    let overlay = OverlayKV::new(db);

    let seed_dir = core.resolve_seed_dir();
    let seeded = FileLoader::load(&seed_dir, &overlay)
        .map_err(|e| anyhow::anyhow!("failed to load seed files: {}", e))?;
    info!("Loaded {} seed files from {}", seeded, seed_dir.display());

    let sql = SqliteStore::open(&core.resolve_sqlite_path())
        .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?;

    Ok(Stores {
        kv: Arc::new(overlay),
        sql: Arc::new(sql),
    })
}

/// Build every module on top of `stores` and assemble the full router.
pub fn build_app(config: &ServerConfig, stores: &Stores) -> anyhow::Result<Router> {
    let auth_config = auth::service::AuthConfig {
        jwt_secret: config.jwt.secret.clone(),
        access_token_ttl: config.jwt.expire_secs,
    };
    let auth_module = auth::AuthModule::new(Arc::clone(&stores.sql), Arc::clone(&stores.kv), auth_config)?;
    info!("Auth module initialized");

    let travel_config = travel::service::TravelConfig {
        popular_limit: config.catalog.popular_limit,
    };
    let travel_module = travel::TravelModule::new(
        Arc::clone(&stores.sql),
        stores.kv.as_ref(),
        travel_config,
        auth_module.authenticator(),
    )?;
    info!("Travel module initialized");

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (travel_module.name(), travel_module.routes()),
    ];
    Ok(routes::build_router(
        Arc::clone(travel_module.service()),
        module_routes,
    ))
}
