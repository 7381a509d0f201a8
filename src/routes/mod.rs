use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub mod system;
pub mod todos;

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(system::router(state.clone()))
        .merge(todos::router(state));

    Router::new().nest(API_PREFIX, api)
}

/// The API router with the full layer stack the binary serves.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
