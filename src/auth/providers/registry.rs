use std::{collections::HashMap, sync::Arc};

use anyhow::bail;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    auth::identity::{AuthenticatedUser, IdentityToken},
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderId {
    /// The bearer token is the user id, trusted without verification.
    #[default]
    Opaque,
}

impl IdentityProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityProviderId::Opaque => "opaque",
        }
    }
}

impl std::str::FromStr for IdentityProviderId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "opaque" => Ok(IdentityProviderId::Opaque),
            other => Err(format!("unsupported identity provider: {other}")),
        }
    }
}

/// Resolves a syntactically valid token to a known user.
///
/// Implementations return `Unauthenticated` when the token names nobody and
/// `Internal` when the lookup itself fails.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn id(&self) -> IdentityProviderId;

    async fn resolve(&self, token: &IdentityToken) -> Result<AuthenticatedUser, AppError>;
}

#[derive(Clone)]
pub struct IdentityProviders {
    active_id: IdentityProviderId,
    providers: HashMap<IdentityProviderId, Arc<dyn IdentityProvider>>,
}

impl IdentityProviders {
    pub fn new(active_id: IdentityProviderId) -> Self {
        Self {
            active_id,
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> anyhow::Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn IdentityProvider>) -> anyhow::Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("identity provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn set_active(&mut self, id: IdentityProviderId) -> anyhow::Result<()> {
        if !self.providers.contains_key(&id) {
            bail!("identity provider not configured: {}", id.as_str());
        }
        self.active_id = id;
        Ok(())
    }

    pub fn active_id(&self) -> IdentityProviderId {
        self.active_id
    }

    pub fn active(&self) -> Result<&dyn IdentityProvider, AppError> {
        self.providers
            .get(&self.active_id)
            .map(|provider| provider.as_ref())
            .ok_or_else(|| {
                AppError::internal(format!(
                    "identity provider not configured: {}",
                    self.active_id.as_str()
                ))
            })
    }
}
