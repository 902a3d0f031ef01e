//! CurbyCoin transaction type catalog.
//!
//! CurbyCoins are the in-app reward currency; each transaction references a
//! type from this catalog that fixes its amount and semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static COIN_TX_TYPE_FIELDS: EntityDescriptor = crate::descriptor! {
    name: String [filterable, sortable, searchable],
    amount: Number [filterable, sortable],
    description: String [searchable, nullable],
};

/// A transaction type row from the `curby_coin_transaction_types` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CurbyCoinTransactionType {
    /// Record identifier.
    pub id: RecordId,
    /// Unique machine name (e.g. `"item_given_away"`).
    pub name: String,
    /// Coin delta applied by transactions of this type; negative for
    /// spends.
    pub amount: i64,
    /// Human-readable description.
    pub description: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a transaction type.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurbyCoinTransactionTypeDraft {
    /// Unique machine name.
    pub name: String,
    /// Coin delta.
    pub amount: i64,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for CurbyCoinTransactionType {
    const ENTITY: &'static str = "curby_coin_transaction_type";
    const TABLE: &'static str = "curby_coin_transaction_types";
    type Draft = CurbyCoinTransactionTypeDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &COIN_TX_TYPE_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
