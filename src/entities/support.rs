//! Media attachments on support request messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static SUPPORT_MEDIA_FIELDS: EntityDescriptor = crate::descriptor! {
    support_request_message_id: Uuid [filterable, sortable],
    url: String [],
    content_type: String [filterable],
    size_bytes: Number [filterable, sortable, nullable],
};

/// A media row from the `support_request_message_media` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct SupportRequestMessageMedia {
    /// Record identifier.
    pub id: RecordId,
    /// Owning support request message.
    pub support_request_message_id: RecordId,
    /// Storage URL of the uploaded media.
    pub url: String,
    /// MIME type.
    pub content_type: String,
    /// Upload size in bytes, when known.
    pub size_bytes: Option<i64>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a media attachment.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SupportRequestMessageMediaDraft {
    /// Owning support request message.
    pub support_request_message_id: RecordId,
    /// Storage URL.
    pub url: String,
    /// MIME type.
    pub content_type: String,
    /// Upload size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
}

impl Record for SupportRequestMessageMedia {
    const ENTITY: &'static str = "support_request_message_media";
    const TABLE: &'static str = "support_request_message_media";
    type Draft = SupportRequestMessageMediaDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &SUPPORT_MEDIA_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
