//! Broadcast handlers: templates, broadcasts, fan-out, delivery tracking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{DeliveryFailureRequest, FanOutResponse, ListParams, ListResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{
    Broadcast, BroadcastDelivery, BroadcastDraft, NotificationTemplate, NotificationTemplateDraft,
};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::{Filter, FilterOp, FilterValue, ListQuery};
use crate::store::Patch;

/// `POST /broadcasts` — Create a broadcast.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] for a dangling template reference, or
/// [`CurbyError`] on a malformed draft.
#[utoipa::path(
    post,
    path = "/api/v1/broadcasts",
    tag = "Broadcasts",
    summary = "Create a broadcast",
    description = "Creates a broadcast. A referenced template must exist; fan-out is a separate step.",
    request_body = BroadcastDraft,
    responses(
        (status = 201, description = "Broadcast created", body = Broadcast),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
        (status = 404, description = "Referenced template not found", body = ErrorResponse),
    )
)]
pub async fn create_broadcast(
    State(state): State<AppState>,
    Json(draft): Json<BroadcastDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let broadcast = state.broadcasts.create_broadcast(&draft).await?;
    Ok((StatusCode::CREATED, Json(broadcast)))
}

/// `GET /broadcasts` — List broadcasts.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/broadcasts",
    tag = "Broadcasts",
    summary = "List broadcasts",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated broadcast list", body = ListResponse<Broadcast>),
    )
)]
pub async fn list_broadcasts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<Broadcast>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /broadcasts/query` — Filtered broadcast query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/broadcasts/query",
    tag = "Broadcasts",
    summary = "Query broadcasts with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated broadcast list", body = ListResponse<Broadcast>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_broadcasts(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<Broadcast>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /broadcasts/:id` — Get one broadcast.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the broadcast does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/broadcasts/{id}",
    tag = "Broadcasts",
    summary = "Get a broadcast",
    params(("id" = uuid::Uuid, Path, description = "Broadcast UUID")),
    responses(
        (status = 200, description = "Broadcast details", body = Broadcast),
        (status = 404, description = "Broadcast not found", body = ErrorResponse),
    )
)]
pub async fn get_broadcast(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let broadcast = state.store::<Broadcast>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(broadcast))
}

/// `POST /broadcasts/:id/send` — Fan a broadcast out.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the broadcast does not exist, or
/// [`CurbyError::InvalidRequest`] if it was already sent.
#[utoipa::path(
    post,
    path = "/api/v1/broadcasts/{id}/send",
    tag = "Broadcasts",
    summary = "Fan a broadcast out to push-capable devices",
    params(("id" = uuid::Uuid, Path, description = "Broadcast UUID")),
    responses(
        (status = 200, description = "Fan-out result", body = FanOutResponse),
        (status = 400, description = "Broadcast already sent", body = ErrorResponse),
        (status = 404, description = "Broadcast not found", body = ErrorResponse),
    )
)]
pub async fn send_broadcast(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let broadcast_id = RecordId::from_uuid(id);
    let deliveries_created = state.broadcasts.fan_out(broadcast_id).await?;
    Ok(Json(FanOutResponse {
        broadcast_id,
        deliveries_created,
    }))
}

/// `GET /broadcasts/:id/deliveries` — Deliveries of one broadcast.
///
/// # Errors
///
/// Returns [`CurbyError`] on backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/broadcasts/{id}/deliveries",
    tag = "Broadcasts",
    summary = "List deliveries for a broadcast",
    params(
        ("id" = uuid::Uuid, Path, description = "Broadcast UUID"),
        ListParams,
    ),
    responses(
        (status = 200, description = "Paginated delivery list", body = ListResponse<BroadcastDelivery>),
    )
)]
pub async fn list_deliveries(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let mut query = params.into_query();
    query.filters.push(Filter::new(
        "broadcast_id",
        FilterOp::Eq,
        FilterValue::Str(RecordId::from_uuid(id).to_string()),
    ));
    let page = state.store::<BroadcastDelivery>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /deliveries/:id/sent` — Record a provider-accepted delivery.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the delivery does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/deliveries/{id}/sent",
    tag = "Broadcasts",
    summary = "Mark a delivery as sent",
    params(("id" = uuid::Uuid, Path, description = "Delivery UUID")),
    responses(
        (status = 200, description = "Updated delivery", body = BroadcastDelivery),
        (status = 404, description = "Delivery not found", body = ErrorResponse),
    )
)]
pub async fn mark_delivery_sent(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let delivery = state.broadcasts.mark_sent(RecordId::from_uuid(id)).await?;
    Ok(Json(delivery))
}

/// `POST /deliveries/:id/failed` — Record a provider-rejected delivery.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the delivery does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/deliveries/{id}/failed",
    tag = "Broadcasts",
    summary = "Mark a delivery as failed",
    params(("id" = uuid::Uuid, Path, description = "Delivery UUID")),
    request_body = DeliveryFailureRequest,
    responses(
        (status = 200, description = "Updated delivery", body = BroadcastDelivery),
        (status = 404, description = "Delivery not found", body = ErrorResponse),
    )
)]
pub async fn mark_delivery_failed(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(report): Json<DeliveryFailureRequest>,
) -> Result<impl IntoResponse, CurbyError> {
    let delivery = state
        .broadcasts
        .mark_failed(RecordId::from_uuid(id), &report.error)
        .await?;
    Ok(Json(delivery))
}

/// `POST /notification-templates` — Create a template.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/notification-templates",
    tag = "Broadcasts",
    summary = "Create a notification template",
    request_body = NotificationTemplateDraft,
    responses(
        (status = 201, description = "Template created", body = NotificationTemplate),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(draft): Json<NotificationTemplateDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let template = state.store::<NotificationTemplate>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// `GET /notification-templates` — List templates.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/notification-templates",
    tag = "Broadcasts",
    summary = "List notification templates",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated template list", body = ListResponse<NotificationTemplate>),
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<NotificationTemplate>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /notification-templates/:id` — Get one template.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the template does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/notification-templates/{id}",
    tag = "Broadcasts",
    summary = "Get a notification template",
    params(("id" = uuid::Uuid, Path, description = "Template UUID")),
    responses(
        (status = 200, description = "Template details", body = NotificationTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse),
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let template = state
        .store::<NotificationTemplate>()
        .get(RecordId::from_uuid(id))
        .await?;
    Ok(Json(template))
}

/// `PATCH /notification-templates/:id` — Amend a template.
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/notification-templates/{id}",
    tag = "Broadcasts",
    summary = "Amend a notification template",
    params(("id" = uuid::Uuid, Path, description = "Template UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated template", body = NotificationTemplate),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
    )
)]
pub async fn patch_template(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let template = state
        .store::<NotificationTemplate>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(template))
}

/// `DELETE /notification-templates/:id` — Delete a template.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the template does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/notification-templates/{id}",
    tag = "Broadcasts",
    summary = "Delete a notification template",
    params(("id" = uuid::Uuid, Path, description = "Template UUID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Template not found", body = ErrorResponse),
    )
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<NotificationTemplate>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Broadcast routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/broadcasts", post(create_broadcast).get(list_broadcasts))
        .route("/broadcasts/query", post(query_broadcasts))
        .route("/broadcasts/{id}", get(get_broadcast))
        .route("/broadcasts/{id}/send", post(send_broadcast))
        .route("/broadcasts/{id}/deliveries", get(list_deliveries))
        .route("/deliveries/{id}/sent", post(mark_delivery_sent))
        .route("/deliveries/{id}/failed", post(mark_delivery_failed))
        .route(
            "/notification-templates",
            post(create_template).get(list_templates),
        )
        .route(
            "/notification-templates/{id}",
            get(get_template)
                .patch(patch_template)
                .delete(delete_template),
        )
}
