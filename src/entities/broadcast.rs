//! Admin broadcasts and per-device delivery tracking.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static BROADCAST_FIELDS: EntityDescriptor = crate::descriptor! {
    title: String [searchable, sortable],
    body: String [searchable],
    template_id: Uuid [filterable, nullable],
    scheduled_at: Date [filterable, sortable, nullable],
    sent_at: Date [filterable, sortable, nullable],
};

/// A broadcast row from the `broadcasts` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Broadcast {
    /// Record identifier.
    pub id: RecordId,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Template the broadcast was rendered from, when one was used.
    pub template_id: Option<RecordId>,
    /// When the broadcast is scheduled to go out; null means immediate.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Set once the fan-out has been dispatched.
    pub sent_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BroadcastDraft {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Template reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<RecordId>,
    /// Scheduled send time; omit for immediate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Record for Broadcast {
    const ENTITY: &'static str = "broadcast";
    const TABLE: &'static str = "broadcasts";
    type Draft = BroadcastDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &BROADCAST_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Delivery state of one broadcast on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastDeliveryStatus {
    /// Queued, not yet handed to the push provider.
    Pending,
    /// Accepted by the push provider.
    Sent,
    /// The push provider rejected the delivery.
    Failed,
    /// Fallback for values this build does not recognize.
    Unknown,
}

impl BroadcastDeliveryStatus {
    /// Lenient, case-insensitive parse with an `Unknown` fallback.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "sent" => Self::Sent,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Canonical storage form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BroadcastDeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static BROADCAST_DELIVERY_FIELDS: EntityDescriptor = crate::descriptor! {
    broadcast_id: Uuid [filterable, sortable],
    device_id: Uuid [filterable],
    status: String [filterable, sortable],
    error: String [nullable],
    delivered_at: Date [filterable, sortable, nullable],
};

/// A delivery row from the `broadcast_deliveries` table: one broadcast
/// fanned out to one device.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct BroadcastDelivery {
    /// Record identifier.
    pub id: RecordId,
    /// The broadcast being delivered.
    pub broadcast_id: RecordId,
    /// Target device.
    pub device_id: RecordId,
    /// Delivery state, stored as text.
    pub status: String,
    /// Provider error message for failed deliveries.
    pub error: Option<String>,
    /// When the provider accepted the delivery.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl BroadcastDelivery {
    /// Parsed delivery status.
    #[must_use]
    pub fn status(&self) -> BroadcastDeliveryStatus {
        BroadcastDeliveryStatus::parse(&self.status)
    }
}

/// Creation payload for a broadcast delivery.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BroadcastDeliveryDraft {
    /// The broadcast being delivered.
    pub broadcast_id: RecordId,
    /// Target device.
    pub device_id: RecordId,
    /// Initial delivery state.
    pub status: String,
}

impl Record for BroadcastDelivery {
    const ENTITY: &'static str = "broadcast_delivery";
    const TABLE: &'static str = "broadcast_deliveries";
    type Draft = BroadcastDeliveryDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &BROADCAST_DELIVERY_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_parse_is_lenient() {
        assert_eq!(
            BroadcastDeliveryStatus::parse("SENT"),
            BroadcastDeliveryStatus::Sent
        );
        assert_eq!(
            BroadcastDeliveryStatus::parse("retrying"),
            BroadcastDeliveryStatus::Unknown
        );
    }

    #[test]
    fn delivery_status_round_trips_canonical_values() {
        for status in [
            BroadcastDeliveryStatus::Pending,
            BroadcastDeliveryStatus::Sent,
            BroadcastDeliveryStatus::Failed,
        ] {
            assert_eq!(BroadcastDeliveryStatus::parse(status.as_str()), status);
        }
    }
}
