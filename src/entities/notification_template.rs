//! Reusable notification templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static NOTIFICATION_TEMPLATE_FIELDS: EntityDescriptor = crate::descriptor! {
    name: String [filterable, sortable, searchable],
    subject: String [searchable],
    body: String [searchable],
    locale: String [filterable, sortable],
};

/// A template row from the `notification_templates` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct NotificationTemplate {
    /// Record identifier.
    pub id: RecordId,
    /// Unique template name (e.g. `"ban_issued"`).
    pub name: String,
    /// Rendered notification subject.
    pub subject: String,
    /// Rendered notification body; supports `{{placeholder}}` substitution.
    pub body: String,
    /// BCP 47 locale tag (e.g. `"en-US"`).
    pub locale: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a notification template.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotificationTemplateDraft {
    /// Unique template name.
    pub name: String,
    /// Rendered notification subject.
    pub subject: String,
    /// Rendered notification body.
    pub body: String,
    /// BCP 47 locale tag.
    pub locale: String,
}

impl Record for NotificationTemplate {
    const ENTITY: &'static str = "notification_template";
    const TABLE: &'static str = "notification_templates";
    type Draft = NotificationTemplateDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &NOTIFICATION_TEMPLATE_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
