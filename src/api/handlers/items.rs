//! Item catalog handlers: listings, takedown/restore, saved items.
//!
//! Items are never hard-deleted over the API; removal is the soft-delete
//! status transition exposed as `POST /items/:id/takedown`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{ListParams, ListResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{Item, ItemDraft, SavedItem, SavedItemDraft};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::ListQuery;
use crate::store::Patch;

/// `POST /items` — Create a listing.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "Items",
    summary = "Create an item",
    request_body = ItemDraft,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let item = state.store::<Item>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /items` — List items.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "Items",
    summary = "List items",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated item list", body = ListResponse<Item>),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<Item>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /items/query` — Filtered item query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/items/query",
    tag = "Items",
    summary = "Query items with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated item list", body = ListResponse<Item>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_items(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<Item>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /items/:id` — Get one item.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the item does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "Items",
    summary = "Get an item",
    params(("id" = uuid::Uuid, Path, description = "Item UUID")),
    responses(
        (status = 200, description = "Item details", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let item = state.store::<Item>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(item))
}

/// `PATCH /items/:id` — Amend an item.
///
/// # Errors
///
/// Returns [`CurbyError`] on an invalid patch or unresolved id.
#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    tag = "Items",
    summary = "Amend an item",
    params(("id" = uuid::Uuid, Path, description = "Item UUID")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated item", body = Item),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn patch_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, CurbyError> {
    let patch = Patch::from_value(body)?;
    let item = state
        .store::<Item>()
        .update(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(item))
}

/// `POST /items/:id/takedown` — Take an item down.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the item does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/takedown",
    tag = "Items",
    summary = "Take an item down",
    description = "Soft delete: transitions the item's status to `removed`. The row is retained.",
    params(("id" = uuid::Uuid, Path, description = "Item UUID")),
    responses(
        (status = 200, description = "Removed item", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn take_down_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let item = state.moderation.take_down_item(RecordId::from_uuid(id)).await?;
    Ok(Json(item))
}

/// `POST /items/:id/restore` — Restore a removed item.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the item does not exist, or
/// [`CurbyError::InvalidRequest`] if it is not currently removed.
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/restore",
    tag = "Items",
    summary = "Restore a removed item",
    params(("id" = uuid::Uuid, Path, description = "Item UUID")),
    responses(
        (status = 200, description = "Restored item", body = Item),
        (status = 400, description = "Item is not removed", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn restore_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let item = state.moderation.restore_item(RecordId::from_uuid(id)).await?;
    Ok(Json(item))
}

/// `POST /saved-items` — Save an item for a user.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/saved-items",
    tag = "Items",
    summary = "Save an item",
    request_body = SavedItemDraft,
    responses(
        (status = 201, description = "Saved item created", body = SavedItem),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_saved_item(
    State(state): State<AppState>,
    Json(draft): Json<SavedItemDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let saved = state.store::<SavedItem>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /saved-items` — List saved items.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/saved-items",
    tag = "Items",
    summary = "List saved items",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated saved-item list", body = ListResponse<SavedItem>),
    )
)]
pub async fn list_saved_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<SavedItem>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /saved-items/query` — Filtered saved-item query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/saved-items/query",
    tag = "Items",
    summary = "Query saved items with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated saved-item list", body = ListResponse<SavedItem>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_saved_items(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<SavedItem>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `DELETE /saved-items/:id` — Unsave an item.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the saved item does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/saved-items/{id}",
    tag = "Items",
    summary = "Delete a saved item",
    params(("id" = uuid::Uuid, Path, description = "Saved-item UUID")),
    responses(
        (status = 204, description = "Saved item deleted"),
        (status = 404, description = "Saved item not found", body = ErrorResponse),
    )
)]
pub async fn delete_saved_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    state
        .store::<SavedItem>()
        .remove(RecordId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Item catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item).get(list_items))
        .route("/items/query", post(query_items))
        .route("/items/{id}", get(get_item).patch(patch_item))
        .route("/items/{id}/takedown", post(take_down_item))
        .route("/items/{id}/restore", post(restore_item))
        .route("/saved-items", post(create_saved_item).get(list_saved_items))
        .route("/saved-items/query", post(query_saved_items))
        .route("/saved-items/{id}", delete(delete_saved_item))
}
