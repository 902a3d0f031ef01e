//! Gateway error types with HTTP status code mapping.
//!
//! [`CurbyError`] is the central error type for the gateway. The data-access
//! layer validates requests against entity metadata before dispatch and fails
//! fast with a `Validation`-family variant; backend-reported errors are mapped
//! to the nearest taxonomy kind. Each variant maps to a specific HTTP status
//! code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::RecordId;
use crate::schema::FieldType;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "field is not filterable: reason",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`CurbyError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server/Backend  | 500 / 503                  |
/// | 4000–4999 | Authorization   | 401 Unauthorized           |
#[derive(Debug, thiserror::Error)]
pub enum CurbyError {
    /// A filter, sort, draft, or patch referenced a field that does not
    /// exist in the entity's metadata.
    #[error("unknown field: {field}")]
    UnknownField {
        /// The offending field name.
        field: String,
    },

    /// A filter referenced a field whose metadata marks it non-filterable.
    #[error("field is not filterable: {field}")]
    NotFilterable {
        /// The offending field name.
        field: String,
    },

    /// A sort referenced a field whose metadata marks it non-sortable.
    #[error("field is not sortable: {field}")]
    NotSortable {
        /// The offending field name.
        field: String,
    },

    /// A filter value's type is incompatible with the field's declared type.
    #[error("type mismatch on field {field}: expected {expected}")]
    TypeMismatch {
        /// The offending field name.
        field: String,
        /// The declared type of the field.
        expected: FieldType,
    },

    /// A creation draft omitted a required (non-nullable) field.
    #[error("missing required field: {field}")]
    MissingField {
        /// The absent field name.
        field: String,
    },

    /// A draft or patch attempted to write a server-assigned field.
    #[error("field is server-assigned and read-only: {field}")]
    ReadOnlyField {
        /// The offending field name.
        field: String,
    },

    /// A field value violates its declared constraints (nullability,
    /// empty membership list, malformed status, ...).
    #[error("invalid value for field {field}: {reason}")]
    InvalidValue {
        /// The offending field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Request validation failed for a reason not tied to a single field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The identifier did not resolve to a persisted record.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name for the error message (e.g. `"user_ban"`).
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: RecordId,
    },

    /// The backend is unreachable or the transport failed mid-request.
    #[error("backend unavailable: {0}")]
    Connectivity(String),

    /// Missing or invalid admin credentials.
    #[error("missing or invalid admin token")]
    Unauthorized,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CurbyError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::UnknownField { .. } => 1001,
            Self::NotFilterable { .. } => 1002,
            Self::NotSortable { .. } => 1003,
            Self::TypeMismatch { .. } => 1004,
            Self::MissingField { .. } => 1005,
            Self::ReadOnlyField { .. } => 1006,
            Self::InvalidValue { .. } => 1007,
            Self::InvalidRequest(_) => 1000,
            Self::NotFound { .. } => 2001,
            Self::Internal(_) => 3000,
            Self::Connectivity(_) => 3002,
            Self::Unauthorized => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownField { .. }
            | Self::NotFilterable { .. }
            | Self::NotSortable { .. }
            | Self::TypeMismatch { .. }
            | Self::MissingField { .. }
            | Self::ReadOnlyField { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for the Validation family of variants.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. }
                | Self::NotFilterable { .. }
                | Self::NotSortable { .. }
                | Self::TypeMismatch { .. }
                | Self::MissingField { .. }
                | Self::ReadOnlyField { .. }
                | Self::InvalidValue { .. }
                | Self::InvalidRequest(_)
        )
    }

    /// Maps a backend error reported by sqlx to the nearest taxonomy kind.
    ///
    /// Constraint and encoding SQLSTATEs (not-null, foreign-key, unique,
    /// check, bad text representation) become validation errors since they
    /// mean the input was malformed; transport failures become
    /// [`CurbyError::Connectivity`]; everything else is internal.
    #[must_use]
    pub fn from_sqlx(entity: &'static str, id: RecordId, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound { entity, id },
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23502") => Self::InvalidRequest(format!("null in non-nullable column: {db}")),
                Some("23503") => Self::InvalidRequest(format!("foreign key violation: {db}")),
                Some("23505") => Self::InvalidRequest(format!("unique constraint violation: {db}")),
                Some("23514") => Self::InvalidRequest(format!("check constraint violation: {db}")),
                Some("22P02") => Self::InvalidRequest(format!("malformed value: {db}")),
                _ => Self::Internal(db.to_string()),
            },
            sqlx::Error::Io(e) => Self::Connectivity(e.to_string()),
            sqlx::Error::Tls(e) => Self::Connectivity(e.to_string()),
            sqlx::Error::Protocol(e) => Self::Connectivity(e),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Connectivity(err.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for CurbyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_variants_map_to_bad_request() {
        let errors = [
            CurbyError::UnknownField {
                field: "ghost".to_string(),
            },
            CurbyError::NotFilterable {
                field: "reason".to_string(),
            },
            CurbyError::NotSortable {
                field: "payload".to_string(),
            },
            CurbyError::MissingField {
                field: "user_id".to_string(),
            },
        ];
        for err in errors {
            assert!(err.is_validation());
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!((1000..2000).contains(&err.error_code()));
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = CurbyError::NotFound {
            entity: "user_ban",
            id: RecordId::new(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn connectivity_maps_to_503() {
        let err = CurbyError::Connectivity("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn row_not_found_classifies_as_not_found() {
        let id = RecordId::new();
        let err = CurbyError::from_sqlx("device", id, sqlx::Error::RowNotFound);
        let CurbyError::NotFound { entity, id: got } = err else {
            panic!("expected NotFound");
        };
        assert_eq!(entity, "device");
        assert_eq!(got, id);
    }

    #[test]
    fn pool_timeout_classifies_as_connectivity() {
        let err = CurbyError::from_sqlx("device", RecordId::nil(), sqlx::Error::PoolTimedOut);
        assert!(matches!(err, CurbyError::Connectivity(_)));
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            CurbyError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
