//! Declarative query model and SQL translation.
//!
//! Callers describe what they want — a conjunctive list of
//! `{column, operator, value}` filters, an optional free-text search term,
//! an optional sort, and a page — and the builder validates the whole
//! request against the entity's metadata descriptor before a single byte of
//! SQL is produced. An invalid request (unknown field, non-filterable
//! column, type-incompatible value) fails the whole operation with a
//! validation error naming the offending field; nothing is ever silently
//! dropped, and no backend call is issued.

mod builder;
mod filter;

pub use builder::{push_order, push_page, push_where};
pub use filter::{Filter, FilterOp, FilterValue, ListQuery, Page, Sort, SortDirection};
