//! Moderation workflows: sanctions, review decisions, item takedown.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::RecordId;
use crate::entities::{Item, ItemReview, ItemStatus, ReviewStatus, UserBan, UserReview, UserSuspension, UserWarning};
use crate::error::CurbyError;
use crate::query::{Filter, FilterOp, FilterValue};
use crate::store::{EntityStore, Patch};

/// Orchestration layer for moderation operations.
///
/// Stateless coordinator over the per-entity stores. Items are never
/// hard-deleted here: takedown and restore are status transitions through
/// the generic `update`, which is the soft-delete convention for the item
/// entity.
#[derive(Debug, Clone)]
pub struct ModerationService {
    bans: EntityStore<UserBan>,
    suspensions: EntityStore<UserSuspension>,
    warnings: EntityStore<UserWarning>,
    item_reviews: EntityStore<ItemReview>,
    user_reviews: EntityStore<UserReview>,
    items: EntityStore<Item>,
}

impl ModerationService {
    /// Creates a new `ModerationService` over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            bans: EntityStore::new(pool.clone()),
            suspensions: EntityStore::new(pool.clone()),
            warnings: EntityStore::new(pool.clone()),
            item_reviews: EntityStore::new(pool.clone()),
            user_reviews: EntityStore::new(pool.clone()),
            items: EntityStore::new(pool),
        }
    }

    /// Whether the user currently has an active ban.
    ///
    /// The query layer is conjunctive-only, so "permanent OR unexpired" is
    /// two counts rather than one disjunctive query.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn is_user_banned(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, CurbyError> {
        let permanent = self.bans.count(&permanent_ban_filters(user_id)).await?;
        if permanent > 0 {
            return Ok(true);
        }
        let unexpired = self.bans.count(&unexpired_ban_filters(user_id, now)).await?;
        Ok(unexpired > 0)
    }

    /// Whether the user is inside an active suspension window.
    ///
    /// A null `ends_at` is an open-ended suspension, so like the ban
    /// check this is two counts: started-and-open-ended, then
    /// started-and-not-yet-ended.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn is_user_suspended(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, CurbyError> {
        let open_ended = self
            .suspensions
            .count(&open_ended_suspension_filters(user_id, now))
            .await?;
        if open_ended > 0 {
            return Ok(true);
        }
        let active = self
            .suspensions
            .count(&active_suspension_filters(user_id, now))
            .await?;
        Ok(active > 0)
    }

    /// Count of warnings the user has not yet acknowledged.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn unacknowledged_warnings(&self, user_id: &str) -> Result<i64, CurbyError> {
        self.warnings
            .count(&[
                Filter::new("user_id", FilterOp::Eq, FilterValue::Str(user_id.to_string())),
                Filter::new("acknowledged", FilterOp::Eq, FilterValue::Bool(false)),
            ])
            .await
    }

    /// Decides an item review. A rejection also takes the item down.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the review (or, on rejection, the
    /// item) does not resolve; store errors otherwise.
    pub async fn decide_item_review(
        &self,
        review_id: RecordId,
        approve: bool,
        notes: Option<String>,
    ) -> Result<ItemReview, CurbyError> {
        let review = self.item_reviews.get(review_id).await?;
        let status = if approve {
            ReviewStatus::Approved
        } else {
            ReviewStatus::Rejected
        };
        let mut patch = Patch::new().set("status", status.as_str());
        if let Some(notes) = notes {
            patch = patch.set("notes", notes);
        }
        let review = self.item_reviews.update(review.id, &patch).await?;

        if !approve {
            self.take_down_item(review.item_id).await?;
        }
        tracing::info!(review_id = %review.id, %status, "item review decided");
        Ok(review)
    }

    /// Decides a user review.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the review does not resolve; store
    /// errors otherwise.
    pub async fn decide_user_review(
        &self,
        review_id: RecordId,
        approve: bool,
        notes: Option<String>,
    ) -> Result<UserReview, CurbyError> {
        let status = if approve {
            ReviewStatus::Approved
        } else {
            ReviewStatus::Rejected
        };
        let mut patch = Patch::new().set("status", status.as_str());
        if let Some(notes) = notes {
            patch = patch.set("notes", notes);
        }
        let review = self.user_reviews.update(review_id, &patch).await?;
        tracing::info!(review_id = %review.id, %status, "user review decided");
        Ok(review)
    }

    /// Takes an item down (soft delete: status transition to `removed`).
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the item does not resolve; store
    /// errors otherwise.
    pub async fn take_down_item(&self, item_id: RecordId) -> Result<Item, CurbyError> {
        let patch = Patch::new().set("status", ItemStatus::Removed.as_str());
        let item = self.items.update(item_id, &patch).await?;
        tracing::info!(%item_id, "item taken down");
        Ok(item)
    }

    /// Restores a previously removed item after a granted appeal.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the item does not resolve;
    /// [`CurbyError::InvalidRequest`] when the item is not currently
    /// removed; store errors otherwise.
    pub async fn restore_item(&self, item_id: RecordId) -> Result<Item, CurbyError> {
        let item = self.items.get(item_id).await?;
        if item.status() != ItemStatus::Removed {
            return Err(CurbyError::InvalidRequest(format!(
                "item {item_id} is not removed (status: {})",
                item.status()
            )));
        }
        let patch = Patch::new().set("status", ItemStatus::Restored.as_str());
        let item = self.items.update(item_id, &patch).await?;
        tracing::info!(%item_id, "item restored");
        Ok(item)
    }
}

/// Filters selecting a user's permanent bans (no expiry).
fn permanent_ban_filters(user_id: &str) -> [Filter; 2] {
    [
        Filter::new("user_id", FilterOp::Eq, FilterValue::Str(user_id.to_string())),
        Filter::new("expires_at", FilterOp::IsNull, FilterValue::Null),
    ]
}

/// Filters selecting a user's bans that have not yet expired.
fn unexpired_ban_filters(user_id: &str, now: DateTime<Utc>) -> [Filter; 2] {
    [
        Filter::new("user_id", FilterOp::Eq, FilterValue::Str(user_id.to_string())),
        Filter::new("expires_at", FilterOp::Gt, FilterValue::Str(now.to_rfc3339())),
    ]
}

/// Filters selecting suspensions whose window contains `now`.
fn active_suspension_filters(user_id: &str, now: DateTime<Utc>) -> [Filter; 3] {
    [
        Filter::new("user_id", FilterOp::Eq, FilterValue::Str(user_id.to_string())),
        Filter::new("starts_at", FilterOp::Lte, FilterValue::Str(now.to_rfc3339())),
        Filter::new("ends_at", FilterOp::Gt, FilterValue::Str(now.to_rfc3339())),
    ]
}

/// Filters selecting started suspensions with no end set (open-ended
/// pending review).
fn open_ended_suspension_filters(user_id: &str, now: DateTime<Utc>) -> [Filter; 3] {
    [
        Filter::new("user_id", FilterOp::Eq, FilterValue::Str(user_id.to_string())),
        Filter::new("starts_at", FilterOp::Lte, FilterValue::Str(now.to_rfc3339())),
        Filter::new("ends_at", FilterOp::IsNull, FilterValue::Null),
    ]
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::query;
    use crate::store::Record;
    use sqlx::{Postgres, QueryBuilder};

    // The sanction filters must pass UserBan/UserSuspension metadata
    // validation; building the WHERE clause without a pool proves the
    // round trip the service relies on.

    #[test]
    fn ban_filters_validate_against_metadata() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM user_bans");
        let filters = permanent_ban_filters("u1");
        let result = query::push_where(&mut qb, UserBan::descriptor(), &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM user_bans WHERE user_id = $1 AND expires_at IS NULL"
        );

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM user_bans");
        let filters = unexpired_ban_filters("u1", Utc::now());
        let result = query::push_where(&mut qb, UserBan::descriptor(), &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM user_bans WHERE user_id = $1 AND expires_at > $2"
        );
    }

    #[test]
    fn suspension_window_filters_validate_against_metadata() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM user_suspensions");
        let filters = active_suspension_filters("u1", Utc::now());
        let result = query::push_where(&mut qb, UserSuspension::descriptor(), &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM user_suspensions \
             WHERE user_id = $1 AND starts_at <= $2 AND ends_at > $3"
        );
    }

    // An open-ended suspension has a null ends_at, which a > comparison
    // would exclude. The companion count must match on IS NULL instead.
    #[test]
    fn open_ended_suspension_filters_match_null_ends_at() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM user_suspensions");
        let filters = open_ended_suspension_filters("u1", Utc::now());
        let result = query::push_where(&mut qb, UserSuspension::descriptor(), &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM user_suspensions \
             WHERE user_id = $1 AND starts_at <= $2 AND ends_at IS NULL"
        );
    }
}
