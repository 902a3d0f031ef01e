//! REST API layer: route handlers, DTOs, auth gate, router composition.
//!
//! All admin endpoints are mounted under `/api/v1` behind the bearer-token
//! gate; the health endpoint stays open at the root.

pub mod auth;
#[cfg(feature = "swagger-ui")]
pub mod docs;
pub mod dto;
pub mod handlers;

use axum::Router;
use axum::middleware;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
///
/// The state is needed up front because the admin gate compares against
/// the configured token.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .nest(
            "/api/v1",
            handlers::routes().layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(docs::routes());

    router
}
