//! Moderation reviews of items and users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

/// Outcome state of a moderation review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Open, awaiting a moderator decision.
    Pending,
    /// The reviewed content was cleared.
    Approved,
    /// The reviewed content was rejected.
    Rejected,
    /// Fallback for values this build does not recognize.
    Unknown,
}

impl ReviewStatus {
    /// Lenient, case-insensitive parse with an `Unknown` fallback.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    /// Canonical storage form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static ITEM_REVIEW_FIELDS: EntityDescriptor = crate::descriptor! {
    item_id: Uuid [filterable, sortable],
    reviewer_id: String [filterable],
    status: String [filterable, sortable],
    notes: String [searchable, nullable],
};

/// An item review row from the `item_reviews` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct ItemReview {
    /// Record identifier.
    pub id: RecordId,
    /// The item under review.
    pub item_id: RecordId,
    /// Moderator who opened or decided the review.
    pub reviewer_id: String,
    /// Review state, stored as text.
    pub status: String,
    /// Moderator notes.
    pub notes: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl ItemReview {
    /// Parsed review state.
    #[must_use]
    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::parse(&self.status)
    }
}

/// Creation payload for an item review.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemReviewDraft {
    /// The item under review.
    pub item_id: RecordId,
    /// Opening moderator.
    pub reviewer_id: String,
    /// Initial review state.
    pub status: String,
    /// Moderator notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for ItemReview {
    const ENTITY: &'static str = "item_review";
    const TABLE: &'static str = "item_reviews";
    type Draft = ItemReviewDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &ITEM_REVIEW_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

static USER_REVIEW_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable],
    reviewer_id: String [filterable],
    status: String [filterable, sortable],
    notes: String [searchable, nullable],
};

/// A user review row from the `user_reviews` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserReview {
    /// Record identifier.
    pub id: RecordId,
    /// The user under review.
    pub user_id: String,
    /// Moderator who opened or decided the review.
    pub reviewer_id: String,
    /// Review state, stored as text.
    pub status: String,
    /// Moderator notes.
    pub notes: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl UserReview {
    /// Parsed review state.
    #[must_use]
    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::parse(&self.status)
    }
}

/// Creation payload for a user review.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserReviewDraft {
    /// The user under review.
    pub user_id: String,
    /// Opening moderator.
    pub reviewer_id: String,
    /// Initial review state.
    pub status: String,
    /// Moderator notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for UserReview {
    const ENTITY: &'static str = "user_review";
    const TABLE: &'static str = "user_reviews";
    type Draft = UserReviewDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &USER_REVIEW_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_status_fallback_is_unknown() {
        assert_eq!(ReviewStatus::parse("escalated"), ReviewStatus::Unknown);
        assert_eq!(ReviewStatus::parse("APPROVED"), ReviewStatus::Approved);
    }
}
