//! Moderation sanctions: bans, suspensions, warnings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

// reason is searchable only: moderators find bans through free-text search
// or by user, never by exact reason equality.
static USER_BAN_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable],
    reason: String [searchable],
    issued_by: String [filterable],
    expires_at: Date [filterable, sortable, nullable],
};

/// A ban row from the `user_bans` table.
///
/// A null `expires_at` is a permanent ban.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserBan {
    /// Record identifier.
    pub id: RecordId,
    /// Banned user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Expiry; null means permanent.
    pub expires_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a ban.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserBanDraft {
    /// Banned user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Expiry; omit for permanent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Record for UserBan {
    const ENTITY: &'static str = "user_ban";
    const TABLE: &'static str = "user_bans";
    type Draft = UserBanDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &USER_BAN_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

static USER_SUSPENSION_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable],
    reason: String [searchable],
    issued_by: String [filterable],
    starts_at: Date [filterable, sortable],
    ends_at: Date [filterable, sortable, nullable],
};

/// A suspension row from the `user_suspensions` table. Time-boxed, unlike
/// a ban.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserSuspension {
    /// Record identifier.
    pub id: RecordId,
    /// Suspended user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Suspension start.
    pub starts_at: DateTime<Utc>,
    /// Suspension end; null while open-ended pending review.
    pub ends_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a suspension.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserSuspensionDraft {
    /// Suspended user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Suspension start.
    pub starts_at: DateTime<Utc>,
    /// Suspension end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl Record for UserSuspension {
    const ENTITY: &'static str = "user_suspension";
    const TABLE: &'static str = "user_suspensions";
    type Draft = UserSuspensionDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &USER_SUSPENSION_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

static USER_WARNING_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable],
    reason: String [searchable],
    issued_by: String [filterable],
    acknowledged: Boolean [filterable],
};

/// A warning row from the `user_warnings` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserWarning {
    /// Record identifier.
    pub id: RecordId,
    /// Warned user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Whether the user has acknowledged the warning in-app.
    pub acknowledged: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a warning.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserWarningDraft {
    /// Warned user.
    pub user_id: String,
    /// Moderator-facing justification.
    pub reason: String,
    /// Issuing moderator.
    pub issued_by: String,
    /// Initial acknowledgement state; freshly issued warnings start false.
    pub acknowledged: bool,
}

impl Record for UserWarning {
    const ENTITY: &'static str = "user_warning";
    const TABLE: &'static str = "user_warnings";
    type Draft = UserWarningDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &USER_WARNING_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
