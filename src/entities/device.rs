//! Registered end-user devices (push targets, app telemetry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static DEVICE_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable, nullable],
    platform: String [filterable, sortable],
    push_token: String [filterable, nullable],
    app_version: String [filterable, sortable, nullable],
    model: String [searchable, nullable],
    last_seen_at: Date [filterable, sortable, nullable],
};

/// A device row from the `devices` table.
///
/// A device may exist before its user signs in, so `user_id` is nullable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Device {
    /// Record identifier.
    pub id: RecordId,
    /// Owning user, once known. Auth-provider identifier, not a local FK.
    pub user_id: Option<String>,
    /// Platform discriminator (`"ios"`, `"android"`, `"web"`).
    pub platform: String,
    /// Push notification token, when registered.
    pub push_token: Option<String>,
    /// App version string reported at registration.
    pub app_version: Option<String>,
    /// Hardware model string.
    pub model: Option<String>,
    /// Last time the device checked in.
    pub last_seen_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a device.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeviceDraft {
    /// Owning user, when already signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Platform discriminator.
    pub platform: String,
    /// Push notification token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    /// App version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Hardware model string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Record for Device {
    const ENTITY: &'static str = "device";
    const TABLE: &'static str = "devices";
    type Draft = DeviceDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &DEVICE_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
