//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::service::{BroadcastService, ModerationService};
use crate::store::{EntityStore, Record};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool every store runs on.
    pub pool: PgPool,
    /// Moderation workflows (sanctions, review decisions, takedowns).
    pub moderation: Arc<ModerationService>,
    /// Broadcast lifecycle (creation, fan-out, delivery tracking).
    pub broadcasts: Arc<BroadcastService>,
    /// Admin bearer token the auth gate compares against.
    pub admin_token: Arc<str>,
}

impl AppState {
    /// Builds the application state from a connected pool and the
    /// configured admin token.
    #[must_use]
    pub fn new(pool: PgPool, admin_token: &str) -> Self {
        Self {
            moderation: Arc::new(ModerationService::new(pool.clone())),
            broadcasts: Arc::new(BroadcastService::new(pool.clone())),
            admin_token: Arc::from(admin_token),
            pool,
        }
    }

    /// A typed store over the shared pool. Construction is cheap
    /// (`PgPool` is reference-counted), so handlers build stores on demand.
    #[must_use]
    pub fn store<T: Record>(&self) -> EntityStore<T> {
        EntityStore::new(self.pool.clone())
    }
}
