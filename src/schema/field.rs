//! Per-field metadata: value type and query capability flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive value type tag for an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text and status discriminators.
    String,
    /// UUID identity columns (primary keys and foreign-key references to
    /// other entities). Travels as a string in JSON, binds as a native
    /// uuid.
    Uuid,
    /// Integers and floats (compared numerically).
    Number,
    /// True/false flags.
    Boolean,
    /// UTC timestamps.
    Date,
    /// Opaque JSON payloads. Never searchable, sortable, or comparable.
    Object,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// Metadata for a single entity field.
///
/// Declared once per field at service-construction time and read-only
/// thereafter. The query layer enforces the flags: a field with
/// `filterable == false` rejects filter requests, `sortable == false`
/// rejects sort requests, and `searchable == false` is excluded from
/// free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Primitive value type of the field.
    pub field_type: FieldType,
    /// Whether the field holds an array of `field_type` values.
    pub is_array: bool,
    /// Whether the field may be null.
    pub is_nullable: bool,
    /// Whether free-text search includes this field.
    pub searchable: bool,
    /// Whether the field may appear in a sort request.
    pub sortable: bool,
    /// Whether the field may appear in a filter.
    pub filterable: bool,
    /// Whether the backend owns this field (`id`, `created_at`,
    /// `updated_at`). Server-assigned fields are rejected in drafts and
    /// patches but remain usable in queries.
    pub server_assigned: bool,
}

impl FieldMetadata {
    /// A field of the given type with every capability flag off.
    #[must_use]
    pub const fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            is_array: false,
            is_nullable: false,
            searchable: false,
            sortable: false,
            filterable: false,
            server_assigned: false,
        }
    }

    /// Marks the field as an array of its value type.
    #[must_use]
    pub const fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Marks the field as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Includes the field in free-text search.
    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Allows sorting on the field.
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Allows filtering on the field.
    #[must_use]
    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Marks the field as backend-owned.
    #[must_use]
    pub const fn server_assigned(mut self) -> Self {
        self.server_assigned = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_off() {
        let meta = FieldMetadata::new(FieldType::String);
        assert!(!meta.filterable);
        assert!(!meta.sortable);
        assert!(!meta.searchable);
        assert!(!meta.is_nullable);
        assert!(!meta.is_array);
        assert!(!meta.server_assigned);
    }

    #[test]
    fn builder_flags_compose() {
        let meta = FieldMetadata::new(FieldType::Number)
            .filterable()
            .sortable()
            .nullable();
        assert!(meta.filterable);
        assert!(meta.sortable);
        assert!(meta.is_nullable);
        assert!(!meta.searchable);
        assert_eq!(meta.field_type, FieldType::Number);
    }

    #[test]
    fn field_type_display_is_lowercase() {
        assert_eq!(FieldType::Date.to_string(), "date");
        assert_eq!(FieldType::Object.to_string(), "object");
    }
}
