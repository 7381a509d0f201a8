use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::providers::IdentityProviders, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub identity: IdentityProviders,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, identity: IdentityProviders) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            identity,
        })
    }
}
