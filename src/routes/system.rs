use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    state
        .db
        .ping()
        .await
        .map_err(|err| AppError::internal(format!("database ping failed: {err}")))?;
    JsonApiResponse::ok(HealthResponse { ok: true })
}

async fn me(user: AuthenticatedUser) -> ApiResult<AuthenticatedUser> {
    JsonApiResponse::ok(user)
}
