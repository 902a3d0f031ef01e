//! Entity metadata descriptors.
//!
//! Every persisted entity declares, per field, whether it is searchable,
//! sortable, filterable, its value type, array-ness, and nullability. The
//! descriptor is declared once per entity type as a `'static` constant and
//! consulted by the query builder and the store to validate every filter,
//! sort, search, draft, and patch *before* anything is sent to the backend.
//! Rejecting malformed requests locally avoids a round trip and gives a
//! uniform error surface.

mod descriptor;
mod field;

pub use descriptor::EntityDescriptor;
pub use field::{FieldMetadata, FieldType};
