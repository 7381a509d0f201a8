use std::sync::Arc;

use crate::{config::IdentityConfig, services::ServiceContext};

use super::providers::{IdentityProviders, OpaqueTokenProvider};

pub fn build_providers(
    cfg: &IdentityConfig,
    services: &ServiceContext,
) -> anyhow::Result<IdentityProviders> {
    let opaque = OpaqueTokenProvider::new(services.user());
    let mut providers = IdentityProviders::new(cfg.provider).with_provider(Arc::new(opaque))?;
    providers.set_active(cfg.provider)?;
    Ok(providers)
}

pub async fn init_providers(
    cfg: &IdentityConfig,
    services: &ServiceContext,
) -> anyhow::Result<IdentityProviders> {
    let providers = build_providers(cfg, services)?;
    seed_user(cfg, services).await?;
    Ok(providers)
}

async fn seed_user(cfg: &IdentityConfig, services: &ServiceContext) -> anyhow::Result<()> {
    let Some(id) = cfg.seed_user_id.as_deref() else {
        return Ok(());
    };

    let user = services
        .user()
        .ensure_user(id, cfg.seed_user_email.as_deref(), cfg.seed_user_name.as_deref())
        .await
        .map_err(|err| anyhow::anyhow!("seed user failed: {}", err.message()))?;
    tracing::info!(user_id = %user.id, "seed user available");
    Ok(())
}
