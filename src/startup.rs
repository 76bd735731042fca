use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    error::Error,
    mfl::{gateway::MflGateway, locks::HostLocks},
    model::app::AppState,
    service::cache::CacheService,
};

/// Connect to the database and run migrations.
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run database migrations.");

    Ok(db)
}

/// Assemble the shared application state: gateway, host locks, and the
/// process-owned caches.
pub fn build_state(config: Config, db: DatabaseConnection) -> Result<AppState, Error> {
    let gateway = MflGateway::new(&config)?;

    let live_cache = Arc::new(CacheService::new(
        Duration::from_secs(config.live_cache_ttl_secs),
        config.cache_max_users,
    ));
    let injury_cache = Arc::new(CacheService::new(
        Duration::from_secs(config.live_cache_ttl_secs),
        config.cache_max_users,
    ));
    let trades_cache = Arc::new(CacheService::new(
        Duration::from_secs(config.trades_cache_ttl_secs),
        config.cache_max_users,
    ));

    Ok(AppState {
        db,
        config: Arc::new(config),
        gateway,
        host_locks: Arc::new(HostLocks::new()),
        live_cache,
        injury_cache,
        trades_cache,
    })
}
