use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    auth::bootstrap::build_providers,
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    services::{ServiceContext, todo_service::OwnershipPolicy},
    state::AppState,
};

pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// Config that ignores the process environment.
pub fn test_config(ownership: OwnershipPolicy) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.identity.ownership_policy = ownership;
    cfg
}

pub fn test_state(db: DatabaseConnection, cfg: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let services = ServiceContext::new(&db).with_ownership(cfg.identity.ownership_policy);
    let providers = build_providers(&cfg.identity, &services)?;
    Ok(AppState::new(cfg, db, providers))
}

/// Full layer stack over any connection, typically a `MockDatabase`.
pub fn test_app(db: DatabaseConnection, ownership: OwnershipPolicy) -> anyhow::Result<Router> {
    let state = test_state(db, test_config(ownership))?;
    Ok(app(state))
}

/// Fresh in-memory SQLite database with the schema synced and `users`
/// provisioned.
pub async fn sqlite_state(
    ownership: OwnershipPolicy,
    users: &[&str],
) -> anyhow::Result<Arc<AppState>> {
    let mut cfg = test_config(ownership);
    let db_cfg = DatabaseConfig::new(SQLITE_MEMORY_URL);
    let db = connection::connect(&db_cfg).await?;
    cfg.database = Some(db_cfg);

    let user_service = ServiceContext::new(&db).user();
    for id in users {
        user_service
            .ensure_user(id, None, None)
            .await
            .map_err(|err| anyhow::anyhow!("seed user {id} failed: {}", err.message()))?;
    }

    test_state(db, cfg)
}
