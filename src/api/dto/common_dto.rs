//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::query::{ListQuery, Page, Sort, SortDirection};
use crate::store::PageResult;

/// Query-string parameters for plain `GET` list endpoints.
///
/// Complex narrowing (typed filters, free-text search plus sort) goes
/// through the `POST /x/query` endpoints, which accept a full
/// [`ListQuery`] body.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Maximum rows to return; server default and hard max apply.
    pub limit: Option<i64>,
    /// Rows to skip before the first returned row.
    pub offset: Option<i64>,
    /// Case-insensitive substring search over searchable fields.
    pub search: Option<String>,
    /// Field to sort by; must be declared sortable.
    pub sort_by: Option<String>,
    /// Sort direction; ascending when omitted.
    pub order: Option<SortDirection>,
}

impl ListParams {
    /// Lowers the query-string form into the query layer's request type.
    #[must_use]
    pub fn into_query(self) -> ListQuery {
        let mut page = Page::default();
        if let Some(limit) = self.limit {
            page.limit = limit;
        }
        if let Some(offset) = self.offset {
            page.offset = offset;
        }
        ListQuery {
            filters: Vec::new(),
            search: self.search,
            sort: self.sort_by.map(|field| Sort {
                field,
                direction: self.order.unwrap_or_default(),
            }),
            page: Some(page),
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMeta {
    /// Page size that was applied (after clamping).
    pub limit: i64,
    /// Offset that was applied.
    pub offset: i64,
    /// Whether more rows exist past this page.
    pub has_more: bool,
}

/// Envelope for paginated list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListResponse<T: ToSchema> {
    /// The page of rows.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub page: PageMeta,
}

impl<T: ToSchema> ListResponse<T> {
    /// Wraps a store page in the response envelope, echoing the applied
    /// pagination bounds.
    #[must_use]
    pub fn from_page(result: PageResult<T>, request: &ListQuery) -> Self {
        let page = request.page.unwrap_or_default().clamped();
        Self {
            data: result.items,
            page: PageMeta {
                limit: page.limit,
                offset: page.offset,
                has_more: result.has_more,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn list_params_lower_to_query() {
        let params = ListParams {
            limit: Some(25),
            offset: Some(50),
            search: Some("couch".to_string()),
            sort_by: Some("title".to_string()),
            order: Some(SortDirection::Desc),
        };
        let query = params.into_query();
        assert!(query.filters.is_empty());
        assert_eq!(query.search.as_deref(), Some("couch"));
        let Some(sort) = &query.sort else {
            panic!("sort_by was set");
        };
        assert_eq!(sort.field, "title");
        assert_eq!(sort.direction, SortDirection::Desc);
        let Some(page) = query.page else {
            panic!("page is always set");
        };
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
    }

    #[test]
    fn empty_params_use_defaults() {
        let query = ListParams::default().into_query();
        let Some(page) = query.page else {
            panic!("page is always set");
        };
        assert_eq!(page.limit, Page::DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);
        assert!(query.sort.is_none());
    }
}
