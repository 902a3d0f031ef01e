//! Broadcast lifecycle: creation, fan-out to push-capable devices, and
//! per-delivery status updates.

use chrono::Utc;
use sqlx::PgPool;

use crate::domain::RecordId;
use crate::entities::{
    Broadcast, BroadcastDelivery, BroadcastDeliveryDraft, BroadcastDeliveryStatus, BroadcastDraft,
    Device, NotificationTemplate,
};
use crate::error::CurbyError;
use crate::query::{Filter, FilterOp, FilterValue, ListQuery, Page, Sort, SortDirection};
use crate::store::{EntityStore, Patch};

/// Orchestrates broadcasts over the generic stores.
///
/// Fan-out enumerates devices in pages rather than loading the whole
/// table; each page yields one pending delivery row per push-capable
/// device. Actual push-provider dispatch happens elsewhere and reports
/// back through [`BroadcastService::mark_sent`] /
/// [`BroadcastService::mark_failed`].
#[derive(Debug, Clone)]
pub struct BroadcastService {
    broadcasts: EntityStore<Broadcast>,
    deliveries: EntityStore<BroadcastDelivery>,
    devices: EntityStore<Device>,
    templates: EntityStore<NotificationTemplate>,
}

impl BroadcastService {
    /// Creates a new `BroadcastService` over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            broadcasts: EntityStore::new(pool.clone()),
            deliveries: EntityStore::new(pool.clone()),
            devices: EntityStore::new(pool.clone()),
            templates: EntityStore::new(pool),
        }
    }

    /// Creates a broadcast, resolving the template reference first so a
    /// dangling `template_id` fails before anything is persisted.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] for a dangling template reference;
    /// validation and store errors otherwise.
    pub async fn create_broadcast(&self, draft: &BroadcastDraft) -> Result<Broadcast, CurbyError> {
        if let Some(template_id) = draft.template_id {
            self.templates.get(template_id).await?;
        }
        self.broadcasts.create(draft).await
    }

    /// Fans a broadcast out to every device with a registered push token,
    /// creating one pending delivery per device, then stamps `sent_at`.
    ///
    /// Returns the number of deliveries created. Re-running fan-out for an
    /// already-sent broadcast is rejected.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the broadcast does not resolve;
    /// [`CurbyError::InvalidRequest`] when it was already sent; store
    /// errors otherwise.
    pub async fn fan_out(&self, broadcast_id: RecordId) -> Result<u64, CurbyError> {
        let broadcast = self.broadcasts.get(broadcast_id).await?;
        if broadcast.sent_at.is_some() {
            return Err(CurbyError::InvalidRequest(format!(
                "broadcast {broadcast_id} was already sent"
            )));
        }

        let mut created: u64 = 0;
        let mut offset: i64 = 0;
        loop {
            let page = self
                .devices
                .list(&push_targets_query(offset))
                .await?;
            for device in &page.items {
                let draft = BroadcastDeliveryDraft {
                    broadcast_id,
                    device_id: device.id,
                    status: BroadcastDeliveryStatus::Pending.as_str().to_string(),
                };
                self.deliveries.create(&draft).await?;
                created = created.saturating_add(1);
            }
            if !page.has_more {
                break;
            }
            offset = offset.saturating_add(Page::MAX_LIMIT);
        }

        let patch = Patch::new().set("sent_at", Utc::now().to_rfc3339());
        self.broadcasts.update(broadcast_id, &patch).await?;
        tracing::info!(%broadcast_id, deliveries = created, "broadcast fanned out");
        Ok(created)
    }

    /// Records a provider-accepted delivery.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the delivery does not resolve; store
    /// errors otherwise.
    pub async fn mark_sent(&self, delivery_id: RecordId) -> Result<BroadcastDelivery, CurbyError> {
        let patch = Patch::new()
            .set("status", BroadcastDeliveryStatus::Sent.as_str())
            .set("delivered_at", Utc::now().to_rfc3339());
        self.deliveries.update(delivery_id, &patch).await
    }

    /// Records a provider-rejected delivery with the provider's error.
    ///
    /// # Errors
    ///
    /// [`CurbyError::NotFound`] when the delivery does not resolve; store
    /// errors otherwise.
    pub async fn mark_failed(
        &self,
        delivery_id: RecordId,
        error: &str,
    ) -> Result<BroadcastDelivery, CurbyError> {
        let patch = Patch::new()
            .set("status", BroadcastDeliveryStatus::Failed.as_str())
            .set("error", error);
        self.deliveries.update(delivery_id, &patch).await
    }

    /// Deliveries recorded for one broadcast, filtered to one status.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn count_deliveries(
        &self,
        broadcast_id: RecordId,
        status: BroadcastDeliveryStatus,
    ) -> Result<i64, CurbyError> {
        self.deliveries
            .count(&[
                Filter::new(
                    "broadcast_id",
                    FilterOp::Eq,
                    FilterValue::Str(broadcast_id.to_string()),
                ),
                Filter::new("status", FilterOp::Eq, FilterValue::Str(status.as_str().to_string())),
            ])
            .await
    }
}

/// One fan-out page of devices with a push token, in stable id order so
/// paging never skips or repeats a device.
fn push_targets_query(offset: i64) -> ListQuery {
    ListQuery {
        filters: vec![Filter::new("push_token", FilterOp::Neq, FilterValue::Null)],
        search: None,
        sort: Some(Sort {
            field: "created_at".to_string(),
            direction: SortDirection::Asc,
        }),
        page: Some(Page {
            limit: Page::MAX_LIMIT,
            offset,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::query;
    use crate::store::Record;
    use sqlx::{Postgres, QueryBuilder};

    #[test]
    fn push_target_query_validates_against_device_metadata() {
        let request = push_targets_query(0);
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM devices");
        let result = query::push_where(&mut qb, Device::descriptor(), &request.filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM devices WHERE push_token IS NOT NULL"
        );
    }

    #[test]
    fn fan_out_pages_advance_by_max_limit() {
        let first = push_targets_query(0);
        let second = push_targets_query(Page::MAX_LIMIT);
        let Some(first_page) = first.page else {
            panic!("fan-out query must be paged");
        };
        let Some(second_page) = second.page else {
            panic!("fan-out query must be paged");
        };
        assert_eq!(first_page.limit, Page::MAX_LIMIT);
        assert_eq!(second_page.offset, first_page.offset + Page::MAX_LIMIT);
    }

    #[test]
    fn delivery_count_filters_validate_against_metadata() {
        let filters = [
            Filter::new(
                "broadcast_id",
                FilterOp::Eq,
                FilterValue::Str(RecordId::nil().to_string()),
            ),
            Filter::new(
                "status",
                FilterOp::Eq,
                FilterValue::Str(BroadcastDeliveryStatus::Failed.as_str().to_string()),
            ),
        ];
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM broadcast_deliveries");
        let result = query::push_where(&mut qb, BroadcastDelivery::descriptor(), &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM broadcast_deliveries WHERE broadcast_id = $1 AND status = $2"
        );
    }
}
