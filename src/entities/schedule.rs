//! Recurring job schedules (broadcast dispatch, cleanup, digests).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;
use crate::schema::EntityDescriptor;
use crate::store::Record;

static SCHEDULE_FIELDS: EntityDescriptor = crate::descriptor! {
    name: String [filterable, sortable, searchable],
    cron: String [],
    enabled: Boolean [filterable, sortable],
    last_run_at: Date [filterable, sortable, nullable],
};

/// A schedule row from the `schedules` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Schedule {
    /// Record identifier.
    pub id: RecordId,
    /// Unique schedule name.
    pub name: String,
    /// Cron expression, evaluated by the worker that owns the schedule.
    pub cron: String,
    /// Whether the schedule fires.
    pub enabled: bool,
    /// Last successful run.
    pub last_run_at: Option<DateTime<Utc>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScheduleDraft {
    /// Unique schedule name.
    pub name: String,
    /// Cron expression.
    pub cron: String,
    /// Whether the schedule fires.
    pub enabled: bool,
}

impl Record for Schedule {
    const ENTITY: &'static str = "schedule";
    const TABLE: &'static str = "schedules";
    type Draft = ScheduleDraft;

    fn descriptor() -> &'static EntityDescriptor {
        &SCHEDULE_FIELDS
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
