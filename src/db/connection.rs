use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use super::backend::Backend;
use crate::config::DatabaseConfig;

const ENTITY_REGISTRY: &str = "tasklist_server::db::entities::*";

/// Opens the pool and brings the schema in line with the entity definitions.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let backend = Backend::detect(&cfg.url)?;
    let db = Database::connect(backend.connect_options(cfg)).await?;
    backend.prepare(&db).await?;

    info!(backend = backend.as_str(), "syncing database schema from entities");
    db.get_schema_registry(ENTITY_REGISTRY).sync(&db).await?;
    Ok(db)
}

pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("database pool closed"),
        Err(err) => tracing::warn!(error = %err, "database pool did not close cleanly"),
    }
}
