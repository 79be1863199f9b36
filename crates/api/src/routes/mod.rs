pub mod health;
pub mod websites;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::middleware::rate_limit::rate_limit;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().body_limit_bytes;
    Router::new()
        .merge(health::routes())
        .merge(websites::routes())
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
