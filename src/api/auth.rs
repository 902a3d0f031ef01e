//! Admin bearer-token gate.
//!
//! The capability check happens once, where routes are composed: everything
//! nested under `/api/v1` passes through [`require_admin`]; the health
//! endpoint stays open.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;
use crate::error::CurbyError;

/// Rejects any request whose `Authorization` header is not
/// `Bearer <token>` with the configured admin token.
///
/// # Errors
///
/// [`CurbyError::Unauthorized`] on a missing header, wrong scheme, or
/// token mismatch.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, CurbyError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(CurbyError::Unauthorized)?;

    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().ok_or(CurbyError::Unauthorized)?;
    let token = parts.next().ok_or(CurbyError::Unauthorized)?;

    if scheme != "Bearer" {
        tracing::warn!(scheme, "rejected auth scheme");
        return Err(CurbyError::Unauthorized);
    }
    if token != state.admin_token.as_ref() {
        return Err(CurbyError::Unauthorized);
    }

    Ok(next.run(request).await)
}
