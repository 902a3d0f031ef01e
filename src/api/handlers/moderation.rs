//! Moderation handlers: bans, suspensions, warnings, user standing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{ListParams, ListResponse, StandingResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{
    UserBan, UserBanDraft, UserSuspension, UserSuspensionDraft, UserWarning, UserWarningDraft,
};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::ListQuery;
use crate::store::Patch;

/// `POST /bans` — Issue a ban.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/bans",
    tag = "Moderation",
    summary = "Issue a user ban",
    description = "Creates a ban. A null `expires_at` makes the ban permanent.",
    request_body = UserBanDraft,
    responses(
        (status = 201, description = "Ban created", body = UserBan),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_ban(
    State(state): State<AppState>,
    Json(draft): Json<UserBanDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let ban = state.store::<UserBan>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(ban)))
}

/// `GET /bans` — List bans.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/bans",
    tag = "Moderation",
    summary = "List bans",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated ban list", body = ListResponse<UserBan>),
        (status = 400, description = "Invalid list parameters", body = ErrorResponse),
    )
)]
pub async fn list_bans(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<UserBan>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /bans/query` — Filtered ban query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter references an unknown or
/// non-filterable field, or on backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/bans/query",
    tag = "Moderation",
    summary = "Query bans with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated ban list", body = ListResponse<UserBan>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_bans(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<UserBan>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /bans/:id` — Get one ban.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the ban does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/bans/{id}",
    tag = "Moderation",
    summary = "Get a ban",
    params(("id" = uuid::Uuid, Path, description = "Ban UUID")),
    responses(
        (status = 200, description = "Ban details", body = UserBan),
        (status = 404, description = "Ban not found", body = ErrorResponse),
    )
)]
pub async fn get_ban(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let ban = state.store::<UserBan>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(ban))
}

/// `PATCH /bans/:id` — Amend a ban (e.g. shorten or extend `expires_at`).
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/bans/{id}",
    tag = "Moderation",
    summary = "Amend a ban",
    params(("id" = uuid::Uuid, Path, description = "Ban UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated ban", body = UserBan),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Ban not found", body = ErrorResponse),
    )
)]
pub async fn patch_ban(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let ban = state
        .store::<UserBan>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(ban))
}

/// `DELETE /bans/:id` — Lift a ban.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the ban does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/bans/{id}",
    tag = "Moderation",
    summary = "Lift a ban",
    params(("id" = uuid::Uuid, Path, description = "Ban UUID")),
    responses(
        (status = 204, description = "Ban lifted"),
        (status = 404, description = "Ban not found", body = ErrorResponse),
    )
)]
pub async fn delete_ban(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state.store::<UserBan>().remove(RecordId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /suspensions` — Suspend a user for a time window.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/suspensions",
    tag = "Moderation",
    summary = "Create a suspension",
    request_body = UserSuspensionDraft,
    responses(
        (status = 201, description = "Suspension created", body = UserSuspension),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_suspension(
    State(state): State<AppState>,
    Json(draft): Json<UserSuspensionDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let suspension = state.store::<UserSuspension>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(suspension)))
}

/// `GET /suspensions` — List suspensions.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/suspensions",
    tag = "Moderation",
    summary = "List suspensions",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated suspension list", body = ListResponse<UserSuspension>),
    )
)]
pub async fn list_suspensions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<UserSuspension>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /suspensions/query` — Filtered suspension query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/suspensions/query",
    tag = "Moderation",
    summary = "Query suspensions with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated suspension list", body = ListResponse<UserSuspension>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_suspensions(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<UserSuspension>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /suspensions/:id` — Get one suspension.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the suspension does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/suspensions/{id}",
    tag = "Moderation",
    summary = "Get a suspension",
    params(("id" = uuid::Uuid, Path, description = "Suspension UUID")),
    responses(
        (status = 200, description = "Suspension details", body = UserSuspension),
        (status = 404, description = "Suspension not found", body = ErrorResponse),
    )
)]
pub async fn get_suspension(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let suspension = state
        .store::<UserSuspension>()
        .get(RecordId::from_uuid(id))
        .await?;
    Ok(Json(suspension))
}

/// `PATCH /suspensions/:id` — Amend a suspension (e.g. move `ends_at`).
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/suspensions/{id}",
    tag = "Moderation",
    summary = "Amend a suspension",
    params(("id" = uuid::Uuid, Path, description = "Suspension UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated suspension", body = UserSuspension),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Suspension not found", body = ErrorResponse),
    )
)]
pub async fn patch_suspension(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let suspension = state
        .store::<UserSuspension>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(suspension))
}

/// `DELETE /suspensions/:id` — Cancel a suspension.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the suspension does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/suspensions/{id}",
    tag = "Moderation",
    summary = "Cancel a suspension",
    params(("id" = uuid::Uuid, Path, description = "Suspension UUID")),
    responses(
        (status = 204, description = "Suspension cancelled"),
        (status = 404, description = "Suspension not found", body = ErrorResponse),
    )
)]
pub async fn delete_suspension(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<UserSuspension>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /warnings` — Warn a user.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/warnings",
    tag = "Moderation",
    summary = "Create a warning",
    request_body = UserWarningDraft,
    responses(
        (status = 201, description = "Warning created", body = UserWarning),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_warning(
    State(state): State<AppState>,
    Json(draft): Json<UserWarningDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let warning = state.store::<UserWarning>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(warning)))
}

/// `GET /warnings` — List warnings.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/warnings",
    tag = "Moderation",
    summary = "List warnings",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated warning list", body = ListResponse<UserWarning>),
    )
)]
pub async fn list_warnings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<UserWarning>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `PATCH /warnings/:id` — Amend a warning (e.g. mark acknowledged).
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/warnings/{id}",
    tag = "Moderation",
    summary = "Amend a warning",
    params(("id" = uuid::Uuid, Path, description = "Warning UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated warning", body = UserWarning),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Warning not found", body = ErrorResponse),
    )
)]
pub async fn patch_warning(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let warning = state
        .store::<UserWarning>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(warning))
}

/// `DELETE /warnings/:id` — Retract a warning.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the warning does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/warnings/{id}",
    tag = "Moderation",
    summary = "Retract a warning",
    params(("id" = uuid::Uuid, Path, description = "Warning UUID")),
    responses(
        (status = 204, description = "Warning retracted"),
        (status = 404, description = "Warning not found", body = ErrorResponse),
    )
)]
pub async fn delete_warning(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<UserWarning>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/:user_id/standing` — Aggregate moderation standing.
///
/// # Errors
///
/// Returns [`CurbyError`] on backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/standing",
    tag = "Moderation",
    summary = "Get a user's moderation standing",
    description = "Active ban / suspension status plus unacknowledged warning count, evaluated at request time.",
    params(("user_id" = String, Path, description = "Auth-provider user identifier")),
    responses(
        (status = 200, description = "Moderation standing", body = StandingResponse),
    )
)]
pub async fn user_standing(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, CurbyError> {
    let now = Utc::now();
    let banned = state.moderation.is_user_banned(&user_id, now).await?;
    let suspended = state.moderation.is_user_suspended(&user_id, now).await?;
    let unacknowledged_warnings = state.moderation.unacknowledged_warnings(&user_id).await?;
    Ok(Json(StandingResponse {
        user_id,
        banned,
        suspended,
        unacknowledged_warnings,
    }))
}

/// Moderation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bans", post(create_ban).get(list_bans))
        .route("/bans/query", post(query_bans))
        .route(
            "/bans/{id}",
            get(get_ban).patch(patch_ban).delete(delete_ban),
        )
        .route("/suspensions", post(create_suspension).get(list_suspensions))
        .route("/suspensions/query", post(query_suspensions))
        .route(
            "/suspensions/{id}",
            get(get_suspension)
                .patch(patch_suspension)
                .delete(delete_suspension),
        )
        .route("/warnings", post(create_warning).get(list_warnings))
        .route(
            "/warnings/{id}",
            axum::routing::patch(patch_warning).delete(delete_warning),
        )
        .route("/users/{user_id}/standing", get(user_standing))
}
