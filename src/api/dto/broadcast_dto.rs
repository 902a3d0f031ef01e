//! Broadcast workflow DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RecordId;

/// Result of a broadcast fan-out.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FanOutResponse {
    /// The broadcast that was fanned out.
    pub broadcast_id: RecordId,
    /// Pending deliveries created, one per push-capable device.
    pub deliveries_created: u64,
}

/// Failure report for a delivery the push provider rejected.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeliveryFailureRequest {
    /// Provider error message to record on the delivery.
    pub error: String,
}
