//! Marketplace items and per-user saved items.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

/// Lifecycle state of a marketplace item.
///
/// Items are never hard-deleted by moderation: takedown is a transition to
/// `Removed`, and a granted appeal transitions to `Restored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Visible in the marketplace.
    Active,
    /// Awaiting first review.
    Pending,
    /// Claimed by another user.
    Claimed,
    /// Taken down by moderation.
    Removed,
    /// Reinstated after a granted appeal.
    Restored,
    /// Fallback for values this build does not recognize.
    Unknown,
}

impl ItemStatus {
    /// Lenient, case-insensitive parse with an `Unknown` fallback.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "pending" => Self::Pending,
            "claimed" => Self::Claimed,
            "removed" => Self::Removed,
            "restored" => Self::Restored,
            _ => Self::Unknown,
        }
    }

    /// Canonical storage form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Removed => "removed",
            Self::Restored => "restored",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static ITEM_FIELDS: EntityDescriptor = crate::descriptor! {
    owner_id: String [filterable, sortable],
    title: String [searchable, sortable],
    description: String [searchable, nullable],
    status: String [filterable, sortable],
    latitude: Number [filterable, nullable],
    longitude: Number [filterable, nullable],
};

/// An item row from the `items` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Item {
    /// Record identifier.
    pub id: RecordId,
    /// Posting user. Auth-provider identifier.
    pub owner_id: String,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: Option<String>,
    /// Lifecycle state, stored as text.
    pub status: String,
    /// Pickup latitude.
    pub latitude: Option<f64>,
    /// Pickup longitude.
    pub longitude: Option<f64>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Parsed lifecycle state.
    #[must_use]
    pub fn status(&self) -> ItemStatus {
        ItemStatus::parse(&self.status)
    }
}

/// Creation payload for an item.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemDraft {
    /// Posting user.
    pub owner_id: String,
    /// Listing title.
    pub title: String,
    /// Listing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial lifecycle state.
    pub status: String,
    /// Pickup latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Pickup longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Record for Item {
    const ENTITY: &'static str = "item";
    const TABLE: &'static str = "items";
    type Draft = ItemDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &ITEM_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

static SAVED_ITEM_FIELDS: EntityDescriptor = crate::descriptor! {
    user_id: String [filterable, sortable],
    item_id: Uuid [filterable, sortable],
};

/// A saved-item row from the `saved_items` table (a user's watchlist entry).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct SavedItem {
    /// Record identifier.
    pub id: RecordId,
    /// Saving user.
    pub user_id: String,
    /// Saved item.
    pub item_id: RecordId,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a saved item.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SavedItemDraft {
    /// Saving user.
    pub user_id: String,
    /// Saved item.
    pub item_id: RecordId,
}

impl Record for SavedItem {
    const ENTITY: &'static str = "saved_item";
    const TABLE: &'static str = "saved_items";
    type Draft = SavedItemDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &SAVED_ITEM_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_covers_moderation_states() {
        assert_eq!(ItemStatus::parse("removed"), ItemStatus::Removed);
        assert_eq!(ItemStatus::parse("Restored"), ItemStatus::Restored);
        assert_eq!(ItemStatus::parse("archived"), ItemStatus::Unknown);
    }
}
