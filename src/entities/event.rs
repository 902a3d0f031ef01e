//! Application event log and event type catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static EVENT_FIELDS: EntityDescriptor = crate::descriptor! {
    event_type_id: Uuid [filterable, sortable],
    user_id: String [filterable, nullable],
    device_id: Uuid [filterable, nullable],
    payload: Object [nullable],
};

/// An event row from the `events` table.
///
/// Events are append-mostly: the admin surface lists and counts them but
/// never edits payloads.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Event {
    /// Record identifier.
    pub id: RecordId,
    /// References the event type catalog.
    pub event_type_id: RecordId,
    /// Acting user, when authenticated.
    pub user_id: Option<String>,
    /// Originating device, when known.
    pub device_id: Option<RecordId>,
    /// Event-specific JSON payload.
    #[schema(value_type = Object)]
    pub payload: Option<serde_json::Value>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for an event.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EventDraft {
    /// Event type reference.
    pub event_type_id: RecordId,
    /// Acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Originating device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<RecordId>,
    /// Event-specific JSON payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub payload: Option<serde_json::Value>,
}

impl Record for Event {
    const ENTITY: &'static str = "event";
    const TABLE: &'static str = "events";
    type Draft = EventDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &EVENT_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

static EVENT_TYPE_FIELDS: EntityDescriptor = crate::descriptor! {
    name: String [filterable, sortable, searchable],
    description: String [searchable, nullable],
};

/// An event type row from the `event_types` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct EventType {
    /// Record identifier.
    pub id: RecordId,
    /// Unique machine name (e.g. `"item_posted"`).
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for an event type.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EventTypeDraft {
    /// Unique machine name.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for EventType {
    const ENTITY: &'static str = "event_type";
    const TABLE: &'static str = "event_types";
    type Draft = EventTypeDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &EVENT_TYPE_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
