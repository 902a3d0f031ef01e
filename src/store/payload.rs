//! Validation of client-supplied write payloads (drafts and patches).
//!
//! Both creation drafts and update patches are checked against the entity
//! descriptor locally, before any backend call: unknown fields,
//! server-assigned fields, nulls in non-nullable fields, and JSON values
//! whose shape contradicts the declared field type all fail fast with a
//! validation error naming the offending field.

use serde_json::{Map, Value};

use crate::error::CurbyError;
use crate::schema::{EntityDescriptor, FieldMetadata, FieldType};

/// A partial update: a validated set of field → value assignments.
///
/// Built either programmatically via [`Patch::set`] or from a request body
/// via [`Patch::from_value`]. Server-assigned fields (`id`, `created_at`,
/// `updated_at`) can never appear in a patch; `updated_at` is refreshed by
/// the store on every update.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    fields: Map<String, Value>,
}

impl Patch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field assignment.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Builds a patch from a JSON request body.
    ///
    /// # Errors
    ///
    /// [`CurbyError::InvalidRequest`] if the body is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, CurbyError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CurbyError::InvalidRequest(format!(
                "patch body must be a JSON object, got {other}"
            ))),
        }
    }

    /// Whether the patch assigns no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The underlying assignments.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Validates every assignment against the descriptor.
    ///
    /// # Errors
    ///
    /// [`CurbyError::UnknownField`], [`CurbyError::ReadOnlyField`], or
    /// [`CurbyError::InvalidValue`] / [`CurbyError::TypeMismatch`] per the
    /// payload rules.
    pub fn validate(&self, descriptor: &EntityDescriptor) -> Result<(), CurbyError> {
        for (field, value) in &self.fields {
            let meta = check_known_writable(descriptor, field)?;
            check_value(meta, field, value)?;
        }
        Ok(())
    }
}

/// Validates a serialized creation draft against the descriptor.
///
/// In addition to the per-field checks shared with patches, every
/// non-nullable client-writable field must be present with a non-null
/// value — the backend would reject the row anyway, and failing locally
/// names the field without a round trip.
///
/// # Errors
///
/// [`CurbyError::MissingField`] for absent required fields, plus the
/// per-field validation variants.
pub fn validate_draft(
    descriptor: &EntityDescriptor,
    draft: &Map<String, Value>,
) -> Result<(), CurbyError> {
    for (field, value) in draft {
        let meta = check_known_writable(descriptor, field)?;
        check_value(meta, field, value)?;
    }
    for (name, meta) in descriptor.writable() {
        if meta.is_nullable {
            continue;
        }
        match draft.get(name) {
            Some(value) if !value.is_null() => {}
            Some(_) => {
                return Err(CurbyError::InvalidValue {
                    field: name.to_string(),
                    reason: "field is not nullable".to_string(),
                });
            }
            None => {
                return Err(CurbyError::MissingField {
                    field: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_known_writable<'d>(
    descriptor: &'d EntityDescriptor,
    field: &str,
) -> Result<&'d FieldMetadata, CurbyError> {
    let meta = descriptor
        .describe(field)
        .ok_or_else(|| CurbyError::UnknownField {
            field: field.to_string(),
        })?;
    if meta.server_assigned {
        return Err(CurbyError::ReadOnlyField {
            field: field.to_string(),
        });
    }
    Ok(meta)
}

/// Checks one JSON value against the field's declared type, array-ness,
/// and nullability.
fn check_value(meta: &FieldMetadata, field: &str, value: &Value) -> Result<(), CurbyError> {
    if value.is_null() {
        if meta.is_nullable {
            return Ok(());
        }
        return Err(CurbyError::InvalidValue {
            field: field.to_string(),
            reason: "field is not nullable".to_string(),
        });
    }

    if meta.is_array {
        let Value::Array(items) = value else {
            return Err(CurbyError::InvalidValue {
                field: field.to_string(),
                reason: "expected an array".to_string(),
            });
        };
        for item in items {
            check_scalar(meta, field, item)?;
        }
        return Ok(());
    }

    check_scalar(meta, field, value)
}

fn check_scalar(meta: &FieldMetadata, field: &str, value: &Value) -> Result<(), CurbyError> {
    if meta.field_type == FieldType::Uuid {
        let parses = value
            .as_str()
            .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok());
        if parses {
            return Ok(());
        }
        return Err(CurbyError::InvalidValue {
            field: field.to_string(),
            reason: "expected a UUID".to_string(),
        });
    }
    let ok = match meta.field_type {
        FieldType::String => value.is_string(),
        FieldType::Uuid => true,
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        // Timestamps travel as RFC 3339 strings in JSON payloads; exact
        // parsing is left to the backend's timestamptz decoding.
        FieldType::Date => value.is_string(),
        FieldType::Object => value.is_object(),
    };
    if ok {
        Ok(())
    } else {
        Err(CurbyError::TypeMismatch {
            field: field.to_string(),
            expected: meta.field_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::schema::EntityDescriptor;
    use serde_json::json;

    const DESC: EntityDescriptor = crate::descriptor! {
        user_id: String [filterable, sortable],
        reason: String [searchable],
        strikes: Number [filterable, nullable],
        tags: String [array, nullable],
        context: Object [nullable],
    };

    fn as_map(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        map
    }

    #[test]
    fn complete_draft_passes() {
        let draft = as_map(json!({
            "user_id": "u1",
            "reason": "spam",
            "strikes": 3,
        }));
        assert!(validate_draft(&DESC, &draft).is_ok());
    }

    #[test]
    fn draft_missing_required_field_fails() {
        let draft = as_map(json!({ "user_id": "u1" }));
        let err = validate_draft(&DESC, &draft);
        let Err(CurbyError::MissingField { field }) = err else {
            panic!("expected MissingField");
        };
        assert_eq!(field, "reason");
    }

    #[test]
    fn draft_null_for_required_field_fails() {
        let draft = as_map(json!({ "user_id": "u1", "reason": null }));
        let err = validate_draft(&DESC, &draft);
        assert!(matches!(err, Err(CurbyError::InvalidValue { .. })));
    }

    #[test]
    fn draft_with_server_assigned_field_fails() {
        let draft = as_map(json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "user_id": "u1",
            "reason": "spam",
        }));
        let err = validate_draft(&DESC, &draft);
        assert!(matches!(err, Err(CurbyError::ReadOnlyField { .. })));
    }

    #[test]
    fn draft_with_unknown_field_fails() {
        let draft = as_map(json!({ "user_id": "u1", "reason": "x", "ghost": 1 }));
        let err = validate_draft(&DESC, &draft);
        assert!(matches!(err, Err(CurbyError::UnknownField { .. })));
    }

    #[test]
    fn draft_type_mismatch_fails() {
        let draft = as_map(json!({ "user_id": 42, "reason": "x" }));
        let err = validate_draft(&DESC, &draft);
        assert!(matches!(err, Err(CurbyError::TypeMismatch { .. })));
    }

    #[test]
    fn array_field_checks_element_types() {
        let draft = as_map(json!({
            "user_id": "u1",
            "reason": "x",
            "tags": ["a", "b"],
        }));
        assert!(validate_draft(&DESC, &draft).is_ok());

        let draft = as_map(json!({
            "user_id": "u1",
            "reason": "x",
            "tags": ["a", 2],
        }));
        assert!(matches!(
            validate_draft(&DESC, &draft),
            Err(CurbyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn patch_allows_partial_assignment() {
        let Ok(patch) = Patch::from_value(json!({ "strikes": 5 })) else {
            panic!("patch should parse");
        };
        assert!(patch.validate(&DESC).is_ok());
    }

    #[test]
    fn patch_rejects_updated_at() {
        let Ok(patch) = Patch::from_value(json!({ "updated_at": "2026-01-01T00:00:00Z" })) else {
            panic!("patch should parse");
        };
        assert!(matches!(
            patch.validate(&DESC),
            Err(CurbyError::ReadOnlyField { .. })
        ));
    }

    #[test]
    fn patch_null_respects_nullability() {
        let Ok(patch) = Patch::from_value(json!({ "strikes": null })) else {
            panic!("patch should parse");
        };
        assert!(patch.validate(&DESC).is_ok());

        let Ok(patch) = Patch::from_value(json!({ "reason": null })) else {
            panic!("patch should parse");
        };
        assert!(matches!(
            patch.validate(&DESC),
            Err(CurbyError::InvalidValue { .. })
        ));
    }

    #[test]
    fn patch_from_non_object_rejected() {
        let err = Patch::from_value(json!([1, 2, 3]));
        assert!(matches!(err, Err(CurbyError::InvalidRequest(_))));
    }

    #[test]
    fn set_builder_accumulates_fields() {
        let patch = Patch::new().set("strikes", 2).set("reason", "updated");
        assert!(!patch.is_empty());
        assert_eq!(patch.fields().len(), 2);
        assert!(patch.validate(&DESC).is_ok());
    }
}
