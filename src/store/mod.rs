//! Generic data-access layer.
//!
//! [`EntityStore`] is a typed CRUD + query façade over one backend table,
//! parametrized by any entity satisfying the [`Record`] contract. One store
//! instantiation per entity type replaces the one-subclass-per-table
//! pattern: a concrete "service" is just `EntityStore::<UserBan>::new(pool)`.

mod entity_store;
mod payload;
mod record;

pub use entity_store::EntityStore;
pub use payload::Patch;
pub use record::{PageResult, Record};
