//! Request/response DTOs for the REST surface.
//!
//! Entity rows serialize directly as response bodies; the DTOs here cover
//! the surrounding envelope (list parameters, pagination metadata) and the
//! workflow requests that do not map one-to-one onto an entity.

mod broadcast_dto;
mod common_dto;
mod moderation_dto;

pub use broadcast_dto::{DeliveryFailureRequest, FanOutResponse};
pub use common_dto::{ListParams, ListResponse, PageMeta};
pub use moderation_dto::{DecisionRequest, StandingResponse};
