//! Domain primitives shared across the data-access layer.

mod record_id;

pub use record_id::RecordId;
