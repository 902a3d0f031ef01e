//! The generic record contract every persisted entity satisfies.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;

/// Minimal shape of a persisted entity: identity, timestamps, and the
/// metadata descriptor driving its query capabilities.
///
/// Implementors are plain row structs deriving `sqlx::FromRow` and serde.
/// The three base columns (`id`, `created_at`, `updated_at`) are owned by
/// the backend: `id` is assigned exactly once at creation, `created_at` is
/// immutable, and `updated_at` is refreshed on every mutation.
pub trait Record:
    for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
    + Serialize
    + DeserializeOwned
    + std::fmt::Debug
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Singular entity name used in error messages and tracing
    /// (e.g. `"user_ban"`).
    const ENTITY: &'static str;

    /// Backend table name.
    const TABLE: &'static str;

    /// Creation payload: the client-writable fields, with optional ones as
    /// `Option`. Serialized and validated against the descriptor before
    /// the insert is dispatched.
    type Draft: Serialize + std::fmt::Debug + Send + Sync;

    /// The entity's read-only metadata descriptor.
    fn descriptor() -> &'static EntityDescriptor;

    /// The record's identifier.
    fn id(&self) -> RecordId;
}

/// An ordered page of results plus a forward-pagination indicator.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    /// The rows in request order.
    pub items: Vec<T>,
    /// Whether more rows exist past this page.
    pub has_more: bool,
}
