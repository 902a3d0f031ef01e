//! Read-only field-name → metadata mapping per entity type.

use crate::error::CurbyError;
use crate::schema::{FieldMetadata, FieldType};

/// Base fields every persisted entity carries (the generic record contract).
///
/// `id` is assigned exactly once by the persistence layer at creation;
/// `created_at` is set at creation and immutable; `updated_at` is refreshed
/// on every mutation. All three are queryable but never client-writable.
pub const BASE_FIELDS: [(&str, FieldMetadata); 3] = [
    (
        "id",
        FieldMetadata::new(FieldType::Uuid)
            .filterable()
            .sortable()
            .server_assigned(),
    ),
    (
        "created_at",
        FieldMetadata::new(FieldType::Date)
            .filterable()
            .sortable()
            .server_assigned(),
    ),
    (
        "updated_at",
        FieldMetadata::new(FieldType::Date)
            .filterable()
            .sortable()
            .server_assigned(),
    ),
];

/// Read-only mapping from field name to [`FieldMetadata`] for one entity
/// type.
///
/// Constructed once per entity (via the [`crate::descriptor!`] macro) and
/// supplied to the generic store at construction; never mutated afterwards,
/// so it is safely read by arbitrarily many concurrent operations. Entity
/// field counts are small (a dozen or two), so lookup is a linear scan over
/// a `'static` slice.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    base: &'static [(&'static str, FieldMetadata)],
    declared: &'static [(&'static str, FieldMetadata)],
}

impl EntityDescriptor {
    /// Builds a descriptor from the entity's declared fields. The base
    /// record fields (`id`, `created_at`, `updated_at`) are always present.
    #[must_use]
    pub const fn new(declared: &'static [(&'static str, FieldMetadata)]) -> Self {
        Self {
            base: &BASE_FIELDS,
            declared,
        }
    }

    /// Looks up the metadata for a field, or `None` if the field is not
    /// part of this entity.
    #[must_use]
    pub fn describe(&self, field: &str) -> Option<&FieldMetadata> {
        self.entry(field).map(|(_, meta)| meta)
    }

    /// Looks up a field returning its canonical `'static` name alongside
    /// the metadata. The query builder only ever interpolates these
    /// canonical names into SQL, so caller-supplied strings never reach a
    /// statement as identifiers.
    #[must_use]
    pub fn entry(&self, field: &str) -> Option<(&'static str, &FieldMetadata)> {
        self.iter().find(|(name, _)| *name == field)
    }

    /// Iterates over all fields, base fields first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldMetadata)> {
        self.base
            .iter()
            .chain(self.declared.iter())
            .map(|(name, meta)| (*name, meta))
    }

    /// Iterates over the client-writable fields (everything the backend
    /// does not own). These are the columns an insert may set.
    pub fn writable(&self) -> impl Iterator<Item = (&'static str, &FieldMetadata)> {
        self.iter().filter(|(_, meta)| !meta.server_assigned)
    }

    /// Iterates over the non-array string fields included in free-text
    /// search.
    pub fn searchable_text(&self) -> impl Iterator<Item = &'static str> {
        self.iter()
            .filter(|(_, meta)| {
                meta.searchable && meta.field_type == FieldType::String && !meta.is_array
            })
            .map(|(name, _)| name)
    }

    /// Resolves a field for use in a filter, returning its canonical name
    /// and metadata.
    ///
    /// # Errors
    ///
    /// [`CurbyError::UnknownField`] if the field is not part of this entity;
    /// [`CurbyError::NotFilterable`] if its metadata forbids filtering.
    pub fn require_filterable(
        &self,
        field: &str,
    ) -> Result<(&'static str, &FieldMetadata), CurbyError> {
        let (name, meta) = self.entry(field).ok_or_else(|| CurbyError::UnknownField {
            field: field.to_string(),
        })?;
        if !meta.filterable {
            return Err(CurbyError::NotFilterable {
                field: field.to_string(),
            });
        }
        Ok((name, meta))
    }

    /// Resolves a field for use in a sort, returning its canonical name
    /// and metadata.
    ///
    /// # Errors
    ///
    /// [`CurbyError::UnknownField`] if the field is not part of this entity;
    /// [`CurbyError::NotSortable`] if its metadata forbids sorting.
    pub fn require_sortable(
        &self,
        field: &str,
    ) -> Result<(&'static str, &FieldMetadata), CurbyError> {
        let (name, meta) = self.entry(field).ok_or_else(|| CurbyError::UnknownField {
            field: field.to_string(),
        })?;
        if !meta.sortable {
            return Err(CurbyError::NotSortable {
                field: field.to_string(),
            });
        }
        Ok((name, meta))
    }
}

/// Declares an entity's field metadata as a const [`EntityDescriptor`].
///
/// The base record fields (`id`, `created_at`, `updated_at`) are included
/// automatically; list only the entity-specific fields. Flags are the
/// builder methods on [`FieldMetadata`]:
///
/// ```
/// use curby_gateway::descriptor;
/// use curby_gateway::schema::EntityDescriptor;
///
/// const USER_BAN: EntityDescriptor = descriptor! {
///     user_id: String [filterable, sortable],
///     reason: String [searchable],
///     expires_at: Date [filterable, sortable, nullable],
/// };
///
/// assert!(USER_BAN.describe("user_id").is_some_and(|m| m.filterable));
/// assert!(USER_BAN.describe("reason").is_some_and(|m| !m.filterable));
/// ```
#[macro_export]
macro_rules! descriptor {
    ( $( $field:ident : $ty:ident [ $( $flag:ident ),* $(,)? ] ),* $(,)? ) => {
        $crate::schema::EntityDescriptor::new(&[
            $(
                (
                    stringify!($field),
                    $crate::schema::FieldMetadata::new($crate::schema::FieldType::$ty)
                        $( . $flag () )*
                ),
            )*
        ])
    };
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const TEST_DESC: EntityDescriptor = crate::descriptor! {
        user_id: String [filterable, sortable],
        reason: String [searchable],
        strikes: Number [filterable, sortable, nullable],
        payload: Object [nullable],
    };

    #[test]
    fn base_fields_always_present() {
        for name in ["id", "created_at", "updated_at"] {
            let Some(meta) = TEST_DESC.describe(name) else {
                panic!("missing base field {name}");
            };
            assert!(meta.server_assigned);
            assert!(meta.filterable);
            assert!(meta.sortable);
        }
    }

    #[test]
    fn describe_unknown_field_is_none() {
        assert!(TEST_DESC.describe("ghost").is_none());
    }

    #[test]
    fn filterable_flag_enforced() {
        assert!(TEST_DESC.require_filterable("user_id").is_ok());
        let err = TEST_DESC.require_filterable("reason");
        assert!(matches!(err, Err(CurbyError::NotFilterable { .. })));
        let err = TEST_DESC.require_filterable("ghost");
        assert!(matches!(err, Err(CurbyError::UnknownField { .. })));
    }

    #[test]
    fn sortable_flag_enforced() {
        assert!(TEST_DESC.require_sortable("strikes").is_ok());
        let err = TEST_DESC.require_sortable("payload");
        assert!(matches!(err, Err(CurbyError::NotSortable { .. })));
    }

    #[test]
    fn searchable_text_excludes_non_searchable() {
        let fields: Vec<&str> = TEST_DESC.searchable_text().collect();
        assert_eq!(fields, vec!["reason"]);
    }

    #[test]
    fn writable_excludes_server_assigned() {
        let names: Vec<&str> = TEST_DESC.writable().map(|(name, _)| name).collect();
        assert!(!names.contains(&"id"));
        assert!(!names.contains(&"created_at"));
        assert!(names.contains(&"user_id"));
    }
}
