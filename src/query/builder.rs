//! Translation of declarative filters into SQL.
//!
//! The whole request is validated against the entity descriptor first;
//! only after every predicate has been accepted does anything get pushed
//! into the statement. Column identifiers are always the canonical
//! `'static` names returned by the descriptor, never caller-supplied
//! strings, and every value travels as a bind parameter.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::error::CurbyError;
use crate::query::{Filter, FilterOp, FilterValue, Sort};
use crate::schema::{EntityDescriptor, FieldMetadata, FieldType};

/// A validated, typed bind value ready to be pushed into a statement.
#[derive(Debug, Clone)]
enum Bind {
    Str(String),
    Uuid(uuid::Uuid),
    Num(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    StrList(Vec<String>),
    UuidList(Vec<uuid::Uuid>),
    NumList(Vec<f64>),
    DateList(Vec<DateTime<Utc>>),
}

/// One validated predicate, decoupled from SQL rendering so that
/// validation failures never leave a half-built statement behind.
#[derive(Debug)]
enum Predicate {
    Binary {
        column: &'static str,
        token: &'static str,
        bind: Bind,
    },
    AnyOf {
        column: &'static str,
        bind: Bind,
    },
    Like {
        column: &'static str,
        pattern: String,
    },
    IsNull {
        column: &'static str,
    },
    IsNotNull {
        column: &'static str,
    },
}

/// Appends `WHERE ...` for the given filters and optional free-text search
/// term, conjoining everything with AND.
///
/// With no filters and no search term the statement is left untouched.
///
/// # Errors
///
/// Any filter referencing an unknown or non-filterable field, carrying a
/// type-incompatible value, or using an operator unsupported by the field's
/// type fails the whole request (no partial application) with the
/// corresponding validation variant. A search term against an entity with
/// no searchable fields is rejected the same way.
pub fn push_where(
    builder: &mut QueryBuilder<'_, Postgres>,
    descriptor: &EntityDescriptor,
    filters: &[Filter],
    search: Option<&str>,
) -> Result<(), CurbyError> {
    let predicates = filters
        .iter()
        .map(|filter| prepare(descriptor, filter))
        .collect::<Result<Vec<_>, _>>()?;

    let search_columns: Vec<&'static str> = descriptor.searchable_text().collect();
    let search_pattern = match search {
        Some(term) if !term.trim().is_empty() => {
            if search_columns.is_empty() {
                return Err(CurbyError::InvalidRequest(
                    "entity has no searchable fields".to_string(),
                ));
            }
            Some(format!("%{}%", escape_like(term.trim())))
        }
        _ => None,
    };

    if predicates.is_empty() && search_pattern.is_none() {
        return Ok(());
    }

    builder.push(" WHERE ");
    let mut clause = builder.separated(" AND ");

    for predicate in predicates {
        match predicate {
            Predicate::Binary {
                column,
                token,
                bind,
            } => {
                clause.push(column);
                clause.push_unseparated(" ");
                clause.push_unseparated(token);
                clause.push_unseparated(" ");
                push_bind(&mut clause, bind);
            }
            Predicate::AnyOf { column, bind } => {
                clause.push(column);
                clause.push_unseparated(" = ANY(");
                push_bind(&mut clause, bind);
                clause.push_unseparated(")");
            }
            Predicate::Like { column, pattern } => {
                clause.push(column);
                clause.push_unseparated(" LIKE ");
                clause.push_bind_unseparated(pattern);
            }
            Predicate::IsNull { column } => {
                clause.push(column);
                clause.push_unseparated(" IS NULL");
            }
            Predicate::IsNotNull { column } => {
                clause.push(column);
                clause.push_unseparated(" IS NOT NULL");
            }
        }
    }

    if let Some(pattern) = search_pattern {
        clause.push("(");
        let mut first = true;
        for column in search_columns {
            if !first {
                clause.push_unseparated(" OR ");
            }
            first = false;
            clause.push_unseparated(column);
            clause.push_unseparated(" ILIKE ");
            clause.push_bind_unseparated(pattern.clone());
        }
        clause.push_unseparated(")");
    }

    Ok(())
}

/// Appends `ORDER BY ...`.
///
/// An explicit sort must reference a sortable field; `id` is appended as a
/// tie-breaker so pagination is stable. Without a sort the default order
/// is newest-first by creation time.
///
/// # Errors
///
/// [`CurbyError::UnknownField`] / [`CurbyError::NotSortable`] when the
/// sort references a field the metadata does not allow.
pub fn push_order(
    builder: &mut QueryBuilder<'_, Postgres>,
    descriptor: &EntityDescriptor,
    sort: Option<&Sort>,
) -> Result<(), CurbyError> {
    match sort {
        Some(sort) => {
            let (column, _) = descriptor.require_sortable(&sort.field)?;
            builder.push(" ORDER BY ");
            builder.push(column);
            builder.push(" ");
            builder.push(sort.direction.sql_token());
            if column != "id" {
                builder.push(", id ASC");
            }
        }
        None => {
            builder.push(" ORDER BY created_at DESC, id ASC");
        }
    }
    Ok(())
}

/// Appends `LIMIT $n OFFSET $n` as bind parameters.
pub fn push_page(builder: &mut QueryBuilder<'_, Postgres>, limit: i64, offset: i64) {
    builder.push(" LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);
}

/// Validates one filter against the descriptor and prepares its predicate.
fn prepare(descriptor: &EntityDescriptor, filter: &Filter) -> Result<Predicate, CurbyError> {
    let (column, meta) = descriptor.require_filterable(&filter.column)?;

    if meta.is_array {
        return Err(CurbyError::InvalidValue {
            field: filter.column.clone(),
            reason: "array fields do not support filtering".to_string(),
        });
    }
    if meta.field_type == FieldType::Object {
        return Err(CurbyError::InvalidValue {
            field: filter.column.clone(),
            reason: "object fields do not support comparison".to_string(),
        });
    }

    match filter.op {
        FilterOp::IsNull => {
            require_nullable(meta, &filter.column)?;
            if filter.value != FilterValue::Null {
                return Err(CurbyError::InvalidValue {
                    field: filter.column.clone(),
                    reason: "is_null takes no value".to_string(),
                });
            }
            Ok(Predicate::IsNull { column })
        }
        FilterOp::Eq | FilterOp::Neq if filter.value == FilterValue::Null => {
            require_nullable(meta, &filter.column)?;
            if filter.op == FilterOp::Eq {
                Ok(Predicate::IsNull { column })
            } else {
                Ok(Predicate::IsNotNull { column })
            }
        }
        FilterOp::Eq | FilterOp::Neq => Ok(Predicate::Binary {
            column,
            token: filter.op.sql_token(),
            bind: coerce(meta, &filter.column, &filter.value)?,
        }),
        FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
            if meta.field_type == FieldType::Boolean {
                return Err(CurbyError::InvalidValue {
                    field: filter.column.clone(),
                    reason: "ordering comparison is not supported for boolean fields".to_string(),
                });
            }
            Ok(Predicate::Binary {
                column,
                token: filter.op.sql_token(),
                bind: coerce(meta, &filter.column, &filter.value)?,
            })
        }
        FilterOp::In => {
            let FilterValue::List(items) = &filter.value else {
                return Err(CurbyError::TypeMismatch {
                    field: filter.column.clone(),
                    expected: meta.field_type,
                });
            };
            if items.is_empty() {
                return Err(CurbyError::InvalidValue {
                    field: filter.column.clone(),
                    reason: "membership list must not be empty".to_string(),
                });
            }
            Ok(Predicate::AnyOf {
                column,
                bind: coerce_list(meta, &filter.column, items)?,
            })
        }
        FilterOp::Like => {
            if meta.field_type != FieldType::String {
                return Err(CurbyError::InvalidValue {
                    field: filter.column.clone(),
                    reason: "like is only supported for string fields".to_string(),
                });
            }
            let FilterValue::Str(pattern) = &filter.value else {
                return Err(CurbyError::TypeMismatch {
                    field: filter.column.clone(),
                    expected: FieldType::String,
                });
            };
            Ok(Predicate::Like {
                column,
                pattern: pattern.clone(),
            })
        }
    }
}

fn require_nullable(meta: &FieldMetadata, field: &str) -> Result<(), CurbyError> {
    if meta.is_nullable {
        Ok(())
    } else {
        Err(CurbyError::InvalidValue {
            field: field.to_string(),
            reason: "field is not nullable".to_string(),
        })
    }
}

/// Checks that a scalar value is compatible with the field's declared type
/// and converts it into a typed bind.
fn coerce(meta: &FieldMetadata, field: &str, value: &FilterValue) -> Result<Bind, CurbyError> {
    let mismatch = || CurbyError::TypeMismatch {
        field: field.to_string(),
        expected: meta.field_type,
    };
    match (meta.field_type, value) {
        (FieldType::String, FilterValue::Str(s)) => Ok(Bind::Str(s.clone())),
        (FieldType::Uuid, FilterValue::Str(s)) => parse_uuid(field, s).map(Bind::Uuid),
        (FieldType::Number, FilterValue::Num(n)) => Ok(Bind::Num(*n)),
        (FieldType::Boolean, FilterValue::Bool(b)) => Ok(Bind::Bool(*b)),
        (FieldType::Date, FilterValue::Str(s)) => parse_timestamp(field, s).map(Bind::Date),
        _ => Err(mismatch()),
    }
}

/// Coerces every element of a membership list, requiring homogeneity.
fn coerce_list(
    meta: &FieldMetadata,
    field: &str,
    items: &[FilterValue],
) -> Result<Bind, CurbyError> {
    let mismatch = || CurbyError::TypeMismatch {
        field: field.to_string(),
        expected: meta.field_type,
    };
    match meta.field_type {
        FieldType::Uuid => items
            .iter()
            .map(|item| match item {
                FilterValue::Str(s) => parse_uuid(field, s),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Bind::UuidList),
        FieldType::String => items
            .iter()
            .map(|item| match item {
                FilterValue::Str(s) => Ok(s.clone()),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Bind::StrList),
        FieldType::Number => items
            .iter()
            .map(|item| match item {
                FilterValue::Num(n) => Ok(*n),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Bind::NumList),
        FieldType::Date => items
            .iter()
            .map(|item| match item {
                FilterValue::Str(s) => parse_timestamp(field, s),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Bind::DateList),
        FieldType::Boolean | FieldType::Object => Err(CurbyError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "in is not supported for {} fields",
                meta.field_type
            ),
        }),
    }
}

fn parse_uuid(field: &str, raw: &str) -> Result<uuid::Uuid, CurbyError> {
    uuid::Uuid::parse_str(raw).map_err(|e| CurbyError::InvalidValue {
        field: field.to_string(),
        reason: format!("expected a UUID: {e}"),
    })
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, CurbyError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CurbyError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected RFC 3339 timestamp: {e}"),
        })
}

fn push_bind(
    clause: &mut sqlx::query_builder::Separated<'_, '_, Postgres, &'static str>,
    bind: Bind,
) {
    match bind {
        Bind::Str(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::Uuid(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::Num(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::Bool(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::Date(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::StrList(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::UuidList(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::NumList(v) => {
            clause.push_bind_unseparated(v);
        }
        Bind::DateList(v) => {
            clause.push_bind_unseparated(v);
        }
    }
}

/// Escapes LIKE wildcards in a free-text search term so user input matches
/// literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::query::SortDirection;
    use crate::schema::EntityDescriptor;

    // Mirrors the UserBan metadata: user_id filterable/sortable, reason
    // searchable only.
    const USER_BAN: EntityDescriptor = crate::descriptor! {
        user_id: String [filterable, sortable],
        reason: String [searchable],
        strikes: Number [filterable, sortable],
        active: Boolean [filterable],
        expires_at: Date [filterable, sortable, nullable],
        context: Object [nullable],
    };

    fn base() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT * FROM user_bans")
    }

    #[test]
    fn eq_filter_renders_conjunctive_where() {
        let mut qb = base();
        let filters = vec![
            Filter::new("user_id", FilterOp::Eq, FilterValue::Str("u1".to_string())),
            Filter::new("strikes", FilterOp::Gte, FilterValue::Num(3.0)),
        ];
        let result = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans WHERE user_id = $1 AND strikes >= $2"
        );
    }

    #[test]
    fn non_filterable_field_rejected_before_sql() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "reason",
            FilterOp::Eq,
            FilterValue::Str("spam".to_string()),
        )];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::NotFilterable { .. })));
        // Nothing was appended: the statement is untouched.
        assert_eq!(qb.sql(), "SELECT * FROM user_bans");
    }

    #[test]
    fn unknown_field_rejected_before_sql() {
        let mut qb = base();
        let filters = vec![Filter::new("ghost", FilterOp::Eq, FilterValue::Num(1.0))];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::UnknownField { .. })));
        assert_eq!(qb.sql(), "SELECT * FROM user_bans");
    }

    #[test]
    fn one_bad_filter_fails_the_whole_request() {
        let mut qb = base();
        let filters = vec![
            Filter::new("user_id", FilterOp::Eq, FilterValue::Str("u1".to_string())),
            Filter::new("reason", FilterOp::Eq, FilterValue::Str("spam".to_string())),
        ];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::NotFilterable { .. })));
        assert_eq!(qb.sql(), "SELECT * FROM user_bans");
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut qb = base();
        let filters = vec![Filter::new("user_id", FilterOp::Eq, FilterValue::Num(7.0))];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        let Err(CurbyError::TypeMismatch { field, expected }) = err else {
            panic!("expected TypeMismatch");
        };
        assert_eq!(field, "user_id");
        assert_eq!(expected, FieldType::String);
    }

    #[test]
    fn in_membership_uses_any() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "user_id",
            FilterOp::In,
            FilterValue::List(vec![
                FilterValue::Str("u1".to_string()),
                FilterValue::Str("u2".to_string()),
            ]),
        )];
        let result = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(result.is_ok());
        assert_eq!(qb.sql(), "SELECT * FROM user_bans WHERE user_id = ANY($1)");
    }

    #[test]
    fn empty_in_list_rejected() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "user_id",
            FilterOp::In,
            FilterValue::List(vec![]),
        )];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::InvalidValue { .. })));
    }

    #[test]
    fn null_eq_requires_nullable() {
        let mut qb = base();
        let filters = vec![Filter::new("expires_at", FilterOp::Eq, FilterValue::Null)];
        let result = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(result.is_ok());
        assert_eq!(qb.sql(), "SELECT * FROM user_bans WHERE expires_at IS NULL");

        let mut qb = base();
        let filters = vec![Filter::new("user_id", FilterOp::Eq, FilterValue::Null)];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::InvalidValue { .. })));
    }

    #[test]
    fn neq_null_renders_is_not_null() {
        let mut qb = base();
        let filters = vec![Filter::new("expires_at", FilterOp::Neq, FilterValue::Null)];
        let result = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans WHERE expires_at IS NOT NULL"
        );
    }

    #[test]
    fn date_filters_parse_rfc3339() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "expires_at",
            FilterOp::Gt,
            FilterValue::Str("2026-01-15T00:00:00Z".to_string()),
        )];
        let result = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(result.is_ok());
        assert_eq!(qb.sql(), "SELECT * FROM user_bans WHERE expires_at > $1");

        let mut qb = base();
        let filters = vec![Filter::new(
            "expires_at",
            FilterOp::Gt,
            FilterValue::Str("yesterday".to_string()),
        )];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::InvalidValue { .. })));
    }

    #[test]
    fn object_fields_never_comparable() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "context",
            FilterOp::Eq,
            FilterValue::Str("{}".to_string()),
        )];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        // context is not filterable in the first place
        assert!(matches!(err, Err(CurbyError::NotFilterable { .. })));
    }

    #[test]
    fn boolean_ordering_rejected() {
        let mut qb = base();
        let filters = vec![Filter::new("active", FilterOp::Gt, FilterValue::Bool(true))];
        let err = push_where(&mut qb, &USER_BAN, &filters, None);
        assert!(matches!(err, Err(CurbyError::InvalidValue { .. })));
    }

    #[test]
    fn search_expands_over_searchable_fields() {
        let mut qb = base();
        let result = push_where(&mut qb, &USER_BAN, &[], Some("spam"));
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans WHERE (reason ILIKE $1)"
        );
    }

    #[test]
    fn search_conjoins_with_filters() {
        let mut qb = base();
        let filters = vec![Filter::new(
            "user_id",
            FilterOp::Eq,
            FilterValue::Str("u1".to_string()),
        )];
        let result = push_where(&mut qb, &USER_BAN, &filters, Some("bike"));
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans WHERE user_id = $1 AND (reason ILIKE $2)"
        );
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut qb = base();
        let result = push_where(&mut qb, &USER_BAN, &[], Some("   "));
        assert!(result.is_ok());
        assert_eq!(qb.sql(), "SELECT * FROM user_bans");
    }

    #[test]
    fn like_escape_helper_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn sort_validates_against_metadata() {
        let mut qb = base();
        let sort = Sort {
            field: "strikes".to_string(),
            direction: SortDirection::Desc,
        };
        let result = push_order(&mut qb, &USER_BAN, Some(&sort));
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans ORDER BY strikes DESC, id ASC"
        );

        let mut qb = base();
        let sort = Sort {
            field: "reason".to_string(),
            direction: SortDirection::Asc,
        };
        let err = push_order(&mut qb, &USER_BAN, Some(&sort));
        assert!(matches!(err, Err(CurbyError::NotSortable { .. })));
    }

    #[test]
    fn default_order_is_newest_first() {
        let mut qb = base();
        let result = push_order(&mut qb, &USER_BAN, None);
        assert!(result.is_ok());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM user_bans ORDER BY created_at DESC, id ASC"
        );
    }

    #[test]
    fn page_renders_limit_offset_binds() {
        let mut qb = base();
        push_page(&mut qb, 51, 100);
        assert_eq!(qb.sql(), "SELECT * FROM user_bans LIMIT $1 OFFSET $2");
    }
}
