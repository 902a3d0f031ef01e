//! Generic CRUD + query façade over one PostgreSQL table.

use std::marker::PhantomData;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::RecordId;
use crate::error::CurbyError;
use crate::query::{self, Filter, ListQuery};
use crate::store::payload::{Patch, validate_draft};
use crate::store::record::{PageResult, Record};

/// Typed data service for one entity table.
///
/// Holds only the connection pool — no local cache, no optimistic state.
/// Every operation is a single remote round trip; callers observe either
/// the server's authoritative response or an error. Cloning is cheap
/// (`PgPool` is reference-counted), so handlers construct stores on the
/// fly: `EntityStore::<UserBan>::new(pool)`.
#[derive(Debug)]
pub struct EntityStore<T: Record> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Record> EntityStore<T> {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Fetches one entity by identifier.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the id does not resolve;
    /// [`CurbyError::Connectivity`] on transport failure.
    pub async fn get(&self, id: RecordId) -> Result<T, CurbyError> {
        let mut qb = Self::select();
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        let row = qb
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, id, e))?;
        row.ok_or(CurbyError::NotFound {
            entity: T::ENTITY,
            id,
        })
    }

    /// Fetches entities matching all filters (conjunctive), with optional
    /// free-text search and sort, bounded by the page.
    ///
    /// One row beyond the page limit is fetched to report `has_more`
    /// without a second query. When the caller omits pagination the
    /// default page size applies.
    ///
    /// # Errors
    ///
    /// Validation variants for any filter/sort/search the metadata rejects
    /// (no backend call is made); [`CurbyError::Connectivity`] on
    /// transport failure.
    pub async fn list(&self, request: &ListQuery) -> Result<PageResult<T>, CurbyError> {
        let page = request.page.unwrap_or_default().clamped();
        let mut qb = Self::select();
        query::push_where(&mut qb, T::descriptor(), &request.filters, request.search.as_deref())?;
        query::push_order(&mut qb, T::descriptor(), request.sort.as_ref())?;
        query::push_page(&mut qb, page.limit.saturating_add(1), page.offset);

        let mut items = qb
            .build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, RecordId::nil(), e))?;

        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        let has_more = items.len() > limit;
        items.truncate(limit);
        Ok(PageResult { items, has_more })
    }

    /// Counts entities matching all filters without materializing rows.
    ///
    /// Shares the WHERE-building path with [`EntityStore::list`], so for
    /// the same filters the two cannot diverge.
    ///
    /// # Errors
    ///
    /// Same validation and connectivity behavior as [`EntityStore::list`].
    pub async fn count(&self, filters: &[Filter]) -> Result<i64, CurbyError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
        query::push_where(&mut qb, T::descriptor(), filters, None)?;
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, RecordId::nil(), e))
    }

    /// Inserts a new entity. The backend assigns `id`, `created_at`, and
    /// `updated_at`; the full persisted row is returned.
    ///
    /// The draft is validated against the descriptor first: required
    /// (non-nullable) fields must be present, and no server-assigned field
    /// may be set.
    ///
    /// # Errors
    ///
    /// Validation variants for a malformed draft;
    /// [`CurbyError::Connectivity`] / [`CurbyError::InvalidRequest`] for
    /// backend-reported failures.
    pub async fn create(&self, draft: &T::Draft) -> Result<T, CurbyError> {
        let serde_json::Value::Object(fields) = serde_json::to_value(draft)
            .map_err(|e| CurbyError::Internal(format!("draft serialization failed: {e}")))?
        else {
            return Err(CurbyError::Internal(
                "draft did not serialize to an object".to_string(),
            ));
        };
        validate_draft(T::descriptor(), &fields)?;

        // Only bind the columns the draft actually sets; omitted nullable
        // columns fall through to their backend defaults. The payload rides
        // in one jsonb parameter and the backend casts each field to the
        // row type via jsonb_populate_record.
        let columns: Vec<&'static str> = T::descriptor()
            .writable()
            .map(|(name, _)| name)
            .filter(|name| fields.contains_key(*name))
            .collect();

        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} ", T::TABLE));
        if columns.is_empty() {
            qb.push("DEFAULT VALUES RETURNING *");
        } else {
            qb.push("(");
            let mut list = qb.separated(", ");
            for column in &columns {
                list.push(*column);
            }
            qb.push(") SELECT ");
            let mut list = qb.separated(", ");
            for column in &columns {
                list.push(format!("r.{column}"));
            }
            qb.push(" FROM jsonb_populate_record(NULL::");
            qb.push(T::TABLE);
            qb.push(", ");
            qb.push_bind(serde_json::Value::Object(fields));
            qb.push(") AS r RETURNING *");
        }

        let row = qb
            .build_query_as::<T>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, RecordId::nil(), e))?;
        tracing::info!(entity = T::ENTITY, id = %row.id(), "record created");
        Ok(row)
    }

    /// Applies a partial update and returns the full updated row. The
    /// backend refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the id does not resolve; validation
    /// variants for a malformed patch; [`CurbyError::Connectivity`] on
    /// transport failure.
    pub async fn update(&self, id: RecordId, patch: &Patch) -> Result<T, CurbyError> {
        if patch.is_empty() {
            return Err(CurbyError::InvalidRequest(
                "patch assigns no fields".to_string(),
            ));
        }
        patch.validate(T::descriptor())?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} AS t SET ", T::TABLE));
        let mut assignments = qb.separated(", ");
        for (field, _) in patch.fields() {
            // Validated above: every key is a canonical writable field.
            assignments.push(format!("{field} = r.{field}"));
        }
        assignments.push("updated_at = now()");
        qb.push(" FROM jsonb_populate_record(NULL::");
        qb.push(T::TABLE);
        qb.push(", ");
        qb.push_bind(serde_json::Value::Object(patch.fields().clone()));
        qb.push(") AS r WHERE t.id = ");
        qb.push_bind(id);
        qb.push(" RETURNING t.*");

        let row = qb
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, id, e))?;
        let row = row.ok_or(CurbyError::NotFound {
            entity: T::ENTITY,
            id,
        })?;
        tracing::info!(entity = T::ENTITY, %id, "record updated");
        Ok(row)
    }

    /// Hard-deletes an entity. Entities with a soft-delete policy route
    /// through [`EntityStore::update`] with a status transition instead;
    /// that convention lives in the service layer.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the id does not resolve;
    /// [`CurbyError::Connectivity`] on transport failure.
    pub async fn remove(&self, id: RecordId) -> Result<(), CurbyError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("DELETE FROM {} WHERE id = ", T::TABLE));
        qb.push_bind(id);
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| CurbyError::from_sqlx(T::ENTITY, id, e))?;
        if result.rows_affected() == 0 {
            return Err(CurbyError::NotFound {
                entity: T::ENTITY,
                id,
            });
        }
        tracing::info!(entity = T::ENTITY, %id, "record deleted");
        Ok(())
    }

    fn select() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!("SELECT * FROM {}", T::TABLE))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    // The store's SQL generation and validation are exercised through the
    // query and payload modules; the pieces unique to this file (statement
    // shapes for insert/update) are covered here by building the same
    // statements the store builds, without a live pool.
    use super::*;
    use crate::schema::EntityDescriptor;

    const DESC: EntityDescriptor = crate::descriptor! {
        user_id: String [filterable, sortable],
        reason: String [searchable],
        expires_at: Date [filterable, sortable, nullable],
    };

    #[test]
    fn insert_statement_shape() {
        let fields = ["user_id", "reason"];
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO user_bans ");
        qb.push("(");
        let mut list = qb.separated(", ");
        for column in fields {
            list.push(column);
        }
        qb.push(") SELECT ");
        let mut list = qb.separated(", ");
        for column in fields {
            list.push(format!("r.{column}"));
        }
        qb.push(" FROM jsonb_populate_record(NULL::user_bans, ");
        qb.push_bind(serde_json::json!({ "user_id": "u1", "reason": "spam" }));
        qb.push(") AS r RETURNING *");
        assert_eq!(
            qb.sql(),
            "INSERT INTO user_bans (user_id, reason) SELECT r.user_id, r.reason \
             FROM jsonb_populate_record(NULL::user_bans, $1) AS r RETURNING *"
        );
    }

    #[test]
    fn update_statement_refreshes_updated_at() {
        let patch = Patch::new().set("reason", "appealed");
        assert!(patch.validate(&DESC).is_ok());

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE user_bans AS t SET ");
        let mut assignments = qb.separated(", ");
        for (field, _) in patch.fields() {
            assignments.push(format!("{field} = r.{field}"));
        }
        assignments.push("updated_at = now()");
        qb.push(" FROM jsonb_populate_record(NULL::user_bans, ");
        qb.push_bind(serde_json::Value::Object(patch.fields().clone()));
        qb.push(") AS r WHERE t.id = ");
        qb.push_bind(RecordId::nil());
        qb.push(" RETURNING t.*");
        assert_eq!(
            qb.sql(),
            "UPDATE user_bans AS t SET reason = r.reason, updated_at = now() \
             FROM jsonb_populate_record(NULL::user_bans, $1) AS r WHERE t.id = $2 RETURNING t.*"
        );
    }
}
