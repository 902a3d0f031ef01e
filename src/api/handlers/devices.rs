//! Device handlers: registered devices, the event log, and event types.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ListParams, ListResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{Device, DeviceDraft, Event, EventDraft, EventType, EventTypeDraft};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::ListQuery;
use crate::store::Patch;

/// `POST /devices` — Register a device.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/devices",
    tag = "Devices",
    summary = "Register a device",
    request_body = DeviceDraft,
    responses(
        (status = 201, description = "Device registered", body = Device),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_device(
    State(state): State<AppState>,
    Json(draft): Json<DeviceDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let device = state.store::<Device>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// `GET /devices` — List devices.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    tag = "Devices",
    summary = "List devices",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated device list", body = ListResponse<Device>),
    )
)]
pub async fn list_devices(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<Device>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /devices/query` — Filtered device query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/devices/query",
    tag = "Devices",
    summary = "Query devices with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated device list", body = ListResponse<Device>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_devices(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<Device>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /devices/:id` — Get one device.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the device does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    summary = "Get a device",
    params(("id" = uuid::Uuid, Path, description = "Device UUID")),
    responses(
        (status = 200, description = "Device details", body = Device),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let device = state.store::<Device>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(device))
}

/// `PATCH /devices/:id` — Amend a device (push token, last seen, owner).
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    summary = "Amend a device",
    params(("id" = uuid::Uuid, Path, description = "Device UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated device", body = Device),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn patch_device(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let device = state
        .store::<Device>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(device))
}

/// `DELETE /devices/:id` — Deregister a device.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the device does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    summary = "Deregister a device",
    params(("id" = uuid::Uuid, Path, description = "Device UUID")),
    responses(
        (status = 204, description = "Device deregistered"),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state.store::<Device>().remove(RecordId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /events` — Append to the event log.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Devices",
    summary = "Record an event",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Event recorded", body = Event),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let event = state.store::<Event>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `POST /events/query` — Filtered event-log query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/events/query",
    tag = "Devices",
    summary = "Query the event log with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated event list", body = ListResponse<Event>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_events(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<Event>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /events/:id` — Get one event.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Devices",
    summary = "Get an event",
    params(("id" = uuid::Uuid, Path, description = "Event UUID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let event = state.store::<Event>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(event))
}

/// `POST /event-types` — Register an event type.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/event-types",
    tag = "Devices",
    summary = "Create an event type",
    request_body = EventTypeDraft,
    responses(
        (status = 201, description = "Event type created", body = EventType),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_event_type(
    State(state): State<AppState>,
    Json(draft): Json<EventTypeDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let event_type = state.store::<EventType>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(event_type)))
}

/// `GET /event-types` — List event types.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/event-types",
    tag = "Devices",
    summary = "List event types",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated event-type list", body = ListResponse<EventType>),
    )
)]
pub async fn list_event_types(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<EventType>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `PATCH /event-types/:id` — Amend an event type's name or description.
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/event-types/{id}",
    tag = "Devices",
    summary = "Amend an event type",
    params(("id" = uuid::Uuid, Path, description = "Event-type UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated event type", body = EventType),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Event type not found", body = ErrorResponse),
    )
)]
pub async fn patch_event_type(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let event_type = state
        .store::<EventType>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(event_type))
}

/// `DELETE /event-types/:id` — Delete an event type.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the event type does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/event-types/{id}",
    tag = "Devices",
    summary = "Delete an event type",
    params(("id" = uuid::Uuid, Path, description = "Event-type UUID")),
    responses(
        (status = 204, description = "Event type deleted"),
        (status = 404, description = "Event type not found", body = ErrorResponse),
    )
)]
pub async fn delete_event_type(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<EventType>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Device and event-log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devices", post(create_device).get(list_devices))
        .route("/devices/query", post(query_devices))
        .route(
            "/devices/{id}",
            get(get_device).patch(patch_device).delete(delete_device),
        )
        .route("/events", post(create_event))
        .route("/events/query", post(query_events))
        .route("/events/{id}", get(get_event))
        .route("/event-types", post(create_event_type).get(list_event_types))
        .route(
            "/event-types/{id}",
            axum::routing::patch(patch_event_type).delete(delete_event_type),
        )
}
