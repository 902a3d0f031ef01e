//! Caller-level conventions layered on the generic stores.
//!
//! The stores expose uniform CRUD + query; the services encode the Curby
//! policies that do not belong in the generic layer — soft delete for
//! items, review decisions, broadcast fan-out, active-sanction lookups.

mod broadcast_service;
mod moderation_service;

pub use broadcast_service::BroadcastService;
pub use moderation_service::ModerationService;
