use async_trait::async_trait;

use crate::{
    auth::identity::{AuthenticatedUser, INVALID_CREDENTIALS, IdentityToken},
    error::AppError,
    services::user_service::UserService,
};

use super::{IdentityProvider, IdentityProviderId};

/// Treats the bearer token as the user's id and looks it up in the user
/// directory. Nothing about the token is verified.
#[derive(Clone)]
pub struct OpaqueTokenProvider {
    user_service: UserService,
}

impl OpaqueTokenProvider {
    pub fn new(user_service: UserService) -> Self {
        Self { user_service }
    }
}

#[async_trait]
impl IdentityProvider for OpaqueTokenProvider {
    fn id(&self) -> IdentityProviderId {
        IdentityProviderId::Opaque
    }

    async fn resolve(&self, token: &IdentityToken) -> Result<AuthenticatedUser, AppError> {
        match self.user_service.find_by_id(token.as_str()).await? {
            Some(user) => Ok(user.into()),
            None => {
                tracing::debug!("identity token does not match any user");
                Err(AppError::unauthenticated(INVALID_CREDENTIALS))
            }
        }
    }
}
