//! Operational resource handlers: feedback, schedules, coin transaction
//! types, and support message media.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{ListParams, ListResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{
    CurbyCoinTransactionType, CurbyCoinTransactionTypeDraft, Feedback, FeedbackDraft, Schedule,
    ScheduleDraft, SupportRequestMessageMedia, SupportRequestMessageMediaDraft,
};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::ListQuery;
use crate::store::Patch;

/// `POST /feedback` — Record user feedback.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    tag = "Operations",
    summary = "Record feedback",
    request_body = FeedbackDraft,
    responses(
        (status = 201, description = "Feedback recorded", body = Feedback),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(draft): Json<FeedbackDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let feedback = state.store::<Feedback>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// `GET /feedback` — List feedback.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/feedback",
    tag = "Operations",
    summary = "List feedback",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated feedback list", body = ListResponse<Feedback>),
    )
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<Feedback>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /feedback/query` — Filtered feedback query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/feedback/query",
    tag = "Operations",
    summary = "Query feedback with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated feedback list", body = ListResponse<Feedback>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_feedback(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<Feedback>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `DELETE /feedback/:id` — Delete feedback.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the feedback does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/feedback/{id}",
    tag = "Operations",
    summary = "Delete feedback",
    params(("id" = uuid::Uuid, Path, description = "Feedback UUID")),
    responses(
        (status = 204, description = "Feedback deleted"),
        (status = 404, description = "Feedback not found", body = ErrorResponse),
    )
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state.store::<Feedback>().remove(RecordId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /schedules` — Create a schedule.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    tag = "Operations",
    summary = "Create a schedule",
    request_body = ScheduleDraft,
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(draft): Json<ScheduleDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let schedule = state.store::<Schedule>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// `GET /schedules` — List schedules.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    tag = "Operations",
    summary = "List schedules",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated schedule list", body = ListResponse<Schedule>),
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<Schedule>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `PATCH /schedules/:id` — Amend a schedule (cron, enabled flag).
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/schedules/{id}",
    tag = "Operations",
    summary = "Amend a schedule",
    params(("id" = uuid::Uuid, Path, description = "Schedule UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated schedule", body = Schedule),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse),
    )
)]
pub async fn patch_schedule(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let schedule = state
        .store::<Schedule>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(schedule))
}

/// `DELETE /schedules/:id` — Delete a schedule.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the schedule does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}",
    tag = "Operations",
    summary = "Delete a schedule",
    params(("id" = uuid::Uuid, Path, description = "Schedule UUID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found", body = ErrorResponse),
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state.store::<Schedule>().remove(RecordId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /coin-transaction-types` — Register a coin transaction type.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/coin-transaction-types",
    tag = "Operations",
    summary = "Create a coin transaction type",
    request_body = CurbyCoinTransactionTypeDraft,
    responses(
        (status = 201, description = "Transaction type created", body = CurbyCoinTransactionType),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_coin_transaction_type(
    State(state): State<AppState>,
    Json(draft): Json<CurbyCoinTransactionTypeDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let kind = state.store::<CurbyCoinTransactionType>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(kind)))
}

/// `GET /coin-transaction-types` — List coin transaction types.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/coin-transaction-types",
    tag = "Operations",
    summary = "List coin transaction types",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list", body = ListResponse<CurbyCoinTransactionType>),
    )
)]
pub async fn list_coin_transaction_types(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<CurbyCoinTransactionType>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `PATCH /coin-transaction-types/:id` — Amend a coin transaction type.
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/coin-transaction-types/{id}",
    tag = "Operations",
    summary = "Amend a coin transaction type",
    params(("id" = uuid::Uuid, Path, description = "Transaction-type UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated transaction type", body = CurbyCoinTransactionType),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Transaction type not found", body = ErrorResponse),
    )
)]
pub async fn patch_coin_transaction_type(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let kind = state
        .store::<CurbyCoinTransactionType>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(kind))
}

/// `GET /coin-transaction-types/:id` — Get one coin transaction type.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the transaction type does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/coin-transaction-types/{id}",
    tag = "Operations",
    summary = "Get a coin transaction type",
    params(("id" = uuid::Uuid, Path, description = "Transaction-type UUID")),
    responses(
        (status = 200, description = "Transaction type details", body = CurbyCoinTransactionType),
        (status = 404, description = "Transaction type not found", body = ErrorResponse),
    )
)]
pub async fn get_coin_transaction_type(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let kind = state
        .store::<CurbyCoinTransactionType>()
        .get(RecordId::from_uuid(id))
        .await?;
    Ok(Json(kind))
}

/// `DELETE /coin-transaction-types/:id` — Retire a coin transaction type.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the transaction type does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/coin-transaction-types/{id}",
    tag = "Operations",
    summary = "Delete a coin transaction type",
    params(("id" = uuid::Uuid, Path, description = "Transaction-type UUID")),
    responses(
        (status = 204, description = "Transaction type deleted"),
        (status = 404, description = "Transaction type not found", body = ErrorResponse),
    )
)]
pub async fn delete_coin_transaction_type(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<CurbyCoinTransactionType>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /support-media` — Attach media to a support message.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/support-media",
    tag = "Operations",
    summary = "Create a support media attachment",
    request_body = SupportRequestMessageMediaDraft,
    responses(
        (status = 201, description = "Attachment created", body = SupportRequestMessageMedia),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_support_media(
    State(state): State<AppState>,
    Json(draft): Json<SupportRequestMessageMediaDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let media = state
        .store::<SupportRequestMessageMedia>()
        .create(&draft)
        .await?;
    Ok((StatusCode::CREATED, Json(media)))
}

/// `POST /support-media/query` — Filtered support-media query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/support-media/query",
    tag = "Operations",
    summary = "Query support media with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated attachment list", body = ListResponse<SupportRequestMessageMedia>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_support_media(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<SupportRequestMessageMedia>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /support-media/:id` — Get one attachment.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the attachment does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/support-media/{id}",
    tag = "Operations",
    summary = "Get a support media attachment",
    params(("id" = uuid::Uuid, Path, description = "Attachment UUID")),
    responses(
        (status = 200, description = "Attachment details", body = SupportRequestMessageMedia),
        (status = 404, description = "Attachment not found", body = ErrorResponse),
    )
)]
pub async fn get_support_media(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let media = state
        .store::<SupportRequestMessageMedia>()
        .get(RecordId::from_uuid(id))
        .await?;
    Ok(Json(media))
}

/// `DELETE /support-media/:id` — Delete a support media attachment.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the attachment does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/support-media/{id}",
    tag = "Operations",
    summary = "Delete a support media attachment",
    params(("id" = uuid::Uuid, Path, description = "Attachment UUID")),
    responses(
        (status = 204, description = "Attachment deleted"),
        (status = 404, description = "Attachment not found", body = ErrorResponse),
    )
)]
pub async fn delete_support_media(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<SupportRequestMessageMedia>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Operational resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(create_feedback).get(list_feedback))
        .route("/feedback/query", post(query_feedback))
        .route("/feedback/{id}", delete(delete_feedback))
        .route("/schedules", post(create_schedule).get(list_schedules))
        .route(
            "/schedules/{id}",
            axum::routing::patch(patch_schedule).delete(delete_schedule),
        )
        .route(
            "/coin-transaction-types",
            post(create_coin_transaction_type).get(list_coin_transaction_types),
        )
        .route(
            "/coin-transaction-types/{id}",
            get(get_coin_transaction_type)
                .patch(patch_coin_transaction_type)
                .delete(delete_coin_transaction_type),
        )
        .route("/support-media", post(create_support_media))
        .route("/support-media/query", post(query_support_media))
        .route(
            "/support-media/{id}",
            get(get_support_media).delete(delete_support_media),
        )
}
