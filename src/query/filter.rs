//! Filter, sort, and pagination value types.

use serde::{Deserialize, Serialize};

/// Comparison operator for a single filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Equal (`=`). With a null value: `IS NULL`.
    Eq,
    /// Not equal (`<>`). With a null value: `IS NOT NULL`.
    Neq,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Gte,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Lte,
    /// Membership in a non-empty list (`= ANY(...)`).
    In,
    /// SQL `LIKE` pattern match (string fields only).
    Like,
    /// Null check (`IS NULL`); the field must be declared nullable.
    IsNull,
}

impl FilterOp {
    /// The SQL comparison token for the simple binary operators.
    ///
    /// `In`, `Like`, and `IsNull` have dedicated rendering paths in the
    /// builder and return their keyword here for completeness.
    #[must_use]
    pub const fn sql_token(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "= ANY",
            Self::Like => "LIKE",
            Self::IsNull => "IS NULL",
        }
    }
}

/// A typed filter value as supplied by the caller.
///
/// Deserialized untagged from JSON, so `"banned"`, `3`, `true`, `null`, and
/// `["a", "b"]` all map naturally. Timestamps travel as RFC 3339 strings
/// and are parsed when the target field is declared a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum FilterValue {
    /// JSON null (only meaningful for nullable fields with `eq`/`neq`).
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Num(f64),
    /// String value (also carries RFC 3339 timestamps for date fields).
    Str(String),
    /// Homogeneous list for `in` membership tests.
    #[schema(no_recursion)]
    List(Vec<FilterValue>),
}

/// A single predicate narrowing a query: `{column, operator, value}`.
///
/// `column` must exist in the entity's metadata and be declared filterable;
/// `value` must be compatible with the field's declared type. All filters
/// in a request are conjunctive (logical AND).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Filter {
    /// Field name the predicate applies to.
    pub column: String,
    /// Comparison operator.
    #[serde(rename = "operator")]
    pub op: FilterOp,
    /// Comparison value. Defaults to null for `is_null`.
    #[serde(default = "null_value")]
    pub value: FilterValue,
}

fn null_value() -> FilterValue {
    FilterValue::Null
}

impl Filter {
    /// Convenience constructor.
    #[must_use]
    pub fn new(column: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn sql_token(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort request: field plus direction. The field must be declared
/// sortable in the entity's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Sort {
    /// Field to sort by.
    pub field: String,
    /// Direction; ascending when omitted.
    #[serde(default)]
    pub direction: SortDirection,
}

/// Forward pagination bounds.
///
/// When the caller omits pagination a default page size applies — result
/// sets are never unbounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page {
    /// Maximum rows to return. Clamped to [`Page::MAX_LIMIT`].
    #[serde(default = "Page::default_limit")]
    pub limit: i64,
    /// Rows to skip before the first returned row.
    #[serde(default)]
    pub offset: i64,
}

impl Page {
    /// Page size applied when the caller does not specify one.
    pub const DEFAULT_LIMIT: i64 = 50;
    /// Hard upper bound on page size.
    pub const MAX_LIMIT: i64 = 200;

    const fn default_limit() -> i64 {
        Self::DEFAULT_LIMIT
    }

    /// Returns a copy with `limit` clamped to `1..=MAX_LIMIT` and a
    /// non-negative `offset`.
    #[must_use]
    pub const fn clamped(self) -> Self {
        let limit = if self.limit < 1 {
            1
        } else if self.limit > Self::MAX_LIMIT {
            Self::MAX_LIMIT
        } else {
            self.limit
        };
        let offset = if self.offset < 0 { 0 } else { self.offset };
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// A complete list request: conjunctive filters, optional free-text search
/// over the entity's searchable fields, optional sort, and a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListQuery {
    /// Conjunctive filter predicates; empty means no narrowing.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Case-insensitive substring search across searchable string fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Sort request; defaults to newest-first by creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    /// Pagination bounds; a default page size applies when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
}

impl ListQuery {
    /// A query with the given filters and defaults everywhere else.
    #[must_use]
    pub fn filtered(filters: Vec<Filter>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn filter_value_deserializes_untagged() {
        let cases = [
            ("\"banned\"", FilterValue::Str("banned".to_string())),
            ("3.5", FilterValue::Num(3.5)),
            ("true", FilterValue::Bool(true)),
            ("null", FilterValue::Null),
        ];
        for (json, expected) in cases {
            let Ok(value) = serde_json::from_str::<FilterValue>(json) else {
                panic!("failed to parse {json}");
            };
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn filter_deserializes_with_operator_key() {
        let json = r#"{"column": "user_id", "operator": "eq", "value": "u1"}"#;
        let Ok(filter) = serde_json::from_str::<Filter>(json) else {
            panic!("failed to parse filter");
        };
        assert_eq!(filter.column, "user_id");
        assert_eq!(filter.op, FilterOp::Eq);
        assert_eq!(filter.value, FilterValue::Str("u1".to_string()));
    }

    #[test]
    fn is_null_filter_defaults_value() {
        let json = r#"{"column": "expires_at", "operator": "is_null"}"#;
        let Ok(filter) = serde_json::from_str::<Filter>(json) else {
            panic!("failed to parse filter");
        };
        assert_eq!(filter.op, FilterOp::IsNull);
        assert_eq!(filter.value, FilterValue::Null);
    }

    #[test]
    fn page_clamps_to_bounds() {
        let page = Page {
            limit: 0,
            offset: -5,
        }
        .clamped();
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 0);

        let page = Page {
            limit: 10_000,
            offset: 20,
        }
        .clamped();
        assert_eq!(page.limit, Page::MAX_LIMIT);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn default_page_is_bounded() {
        let page = Page::default();
        assert_eq!(page.limit, Page::DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn list_query_defaults_are_empty() {
        let Ok(query) = serde_json::from_str::<ListQuery>("{}") else {
            panic!("failed to parse empty query");
        };
        assert!(query.filters.is_empty());
        assert!(query.search.is_none());
        assert!(query.sort.is_none());
        assert!(query.page.is_none());
    }
}
