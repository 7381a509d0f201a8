use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    auth::{
        AuthenticatedUser, INVALID_CREDENTIALS, IdentityToken, MISSING_CREDENTIALS,
        TokenFormatError,
    },
    error::AppError,
    state::AppState,
};

// Identity gate: every handler that takes an `AuthenticatedUser` runs only
// after the bearer token has been resolved to a known user.
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(user);
        }

        let token = bearer_token(parts)?;
        let user = state.identity.active()?.resolve(&token).await?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

fn bearer_token(parts: &Parts) -> Result<IdentityToken, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Err(AppError::unauthenticated(MISSING_CREDENTIALS));
    };
    if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::unauthenticated(MISSING_CREDENTIALS));
    }

    value
        .to_str()
        .map_err(|_| TokenFormatError::NotAscii)
        .and_then(IdentityToken::from_authorization)
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected authorization header");
            AppError::unauthenticated(INVALID_CREDENTIALS)
        })
}
