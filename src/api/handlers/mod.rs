//! REST endpoint handlers organized by resource.

pub mod broadcasts;
pub mod devices;
pub mod items;
pub mod moderation;
pub mod operations;
pub mod reviews;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all admin resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(moderation::routes())
        .merge(reviews::routes())
        .merge(items::routes())
        .merge(broadcasts::routes())
        .merge(devices::routes())
        .merge(operations::routes())
}
