use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    mfl::{gateway::MflGateway, locks::HostLocks},
    model::{
        live::{InjuryDigest, LiveDashboard},
        trades::TradesFeed,
    },
    service::cache::CacheService,
};

/// Shared application state handed to every request handler.
///
/// The caches are explicit, process-owned services (no ambient globals);
/// workers get the gateway and locks by reference and never the database.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub gateway: MflGateway,
    pub host_locks: Arc<HostLocks>,
    pub live_cache: Arc<CacheService<i32, LiveDashboard>>,
    pub injury_cache: Arc<CacheService<i32, InjuryDigest>>,
    pub trades_cache: Arc<CacheService<i32, TradesFeed>>,
}
