//! End-user feedback submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static FEEDBACK_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable, nullable],
    message: String [searchable],
    rating: Number [filterable, sortable, nullable],
    app_version: String [filterable, nullable],
};

/// A feedback row from the `feedback` table. Submissions may be anonymous.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Feedback {
    /// Record identifier.
    pub id: RecordId,
    /// Submitting user, when signed in.
    pub user_id: Option<String>,
    /// Free-form feedback text.
    pub message: String,
    /// Optional 1–5 rating.
    pub rating: Option<i32>,
    /// App version the feedback was filed from.
    pub app_version: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for feedback.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackDraft {
    /// Submitting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Free-form feedback text.
    pub message: String,
    /// Optional 1–5 rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    /// App version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

impl Record for Feedback {
    const ENTITY: &'static str = "feedback";
    const TABLE: &'static str = "feedback";
    type Draft = FeedbackDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &FEEDBACK_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
