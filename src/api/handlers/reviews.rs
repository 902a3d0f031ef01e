//! Review queue handlers: item reviews and user reviews, plus decisions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{DecisionRequest, ListParams, ListResponse};
use crate::app_state::AppState;
use crate::domain::RecordId;
use crate::entities::{ItemReview, ItemReviewDraft, UserReview, UserReviewDraft};
use crate::error::{CurbyError, ErrorResponse};
use crate::query::ListQuery;

/// `POST /item-reviews` — Enqueue an item for review.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/item-reviews",
    tag = "Reviews",
    summary = "Create an item review",
    request_body = ItemReviewDraft,
    responses(
        (status = 201, description = "Review created", body = ItemReview),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_item_review(
    State(state): State<AppState>,
    Json(draft): Json<ItemReviewDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state.store::<ItemReview>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /item-reviews` — List item reviews.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/item-reviews",
    tag = "Reviews",
    summary = "List item reviews",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated review list", body = ListResponse<ItemReview>),
    )
)]
pub async fn list_item_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<ItemReview>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /item-reviews/query` — Filtered item-review query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/item-reviews/query",
    tag = "Reviews",
    summary = "Query item reviews with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated review list", body = ListResponse<ItemReview>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_item_reviews(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<ItemReview>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /item-reviews/:id` — Get one item review.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the review does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/item-reviews/{id}",
    tag = "Reviews",
    summary = "Get an item review",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    responses(
        (status = 200, description = "Review details", body = ItemReview),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn get_item_review(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state.store::<ItemReview>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(review))
}

/// `POST /item-reviews/:id/decision` — Approve or reject an item review.
///
/// A rejection also takes the reviewed item down.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the review (or, on rejection, the
/// item) does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/item-reviews/{id}/decision",
    tag = "Reviews",
    summary = "Decide an item review",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decided review", body = ItemReview),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn decide_item_review(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(decision): Json<DecisionRequest>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state
        .moderation
        .decide_item_review(RecordId::from_uuid(id), decision.approve, decision.notes)
        .await?;
    Ok(Json(review))
}

/// `POST /user-reviews` — Enqueue a user for review.
///
/// # Errors
///
/// Returns [`CurbyError`] on a malformed draft or backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/user-reviews",
    tag = "Reviews",
    summary = "Create a user review",
    request_body = UserReviewDraft,
    responses(
        (status = 201, description = "Review created", body = UserReview),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_user_review(
    State(state): State<AppState>,
    Json(draft): Json<UserReviewDraft>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state.store::<UserReview>().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /user-reviews` — List user reviews.
///
/// # Errors
///
/// Returns [`CurbyError`] on invalid sort/search or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/user-reviews",
    tag = "Reviews",
    summary = "List user reviews",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated review list", body = ListResponse<UserReview>),
    )
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CurbyError> {
    let query = params.into_query();
    let page = state.store::<UserReview>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `POST /user-reviews/query` — Filtered user-review query.
///
/// # Errors
///
/// Returns [`CurbyError`] when a filter is rejected by the metadata, or on
/// backend failure.
#[utoipa::path(
    post,
    path = "/api/v1/user-reviews/query",
    tag = "Reviews",
    summary = "Query user reviews with typed filters",
    request_body = ListQuery,
    responses(
        (status = 200, description = "Paginated review list", body = ListResponse<UserReview>),
        (status = 400, description = "Invalid filter, sort, or search", body = ErrorResponse),
    )
)]
pub async fn query_user_reviews(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<impl IntoResponse, CurbyError> {
    let page = state.store::<UserReview>().list(&query).await?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

/// `GET /user-reviews/:id` — Get one user review.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the review does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/user-reviews/{id}",
    tag = "Reviews",
    summary = "Get a user review",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    responses(
        (status = 200, description = "Review details", body = UserReview),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn get_user_review(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state.store::<UserReview>().get(RecordId::from_uuid(id)).await?;
    Ok(Json(review))
}

/// `POST /user-reviews/:id/decision` — Approve or reject a user review.
///
/// # Errors
///
/// Returns [`CurbyError::NotFound`] if the review does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/user-reviews/{id}/decision",
    tag = "Reviews",
    summary = "Decide a user review",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decided review", body = UserReview),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn decide_user_review(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(decision): Json<DecisionRequest>,
) -> Result<impl IntoResponse, CurbyError> {
    let review = state
        .moderation
        .decide_user_review(RecordId::from_uuid(id), decision.approve, decision.notes)
        .await?;
    Ok(Json(review))
}

/// Review queue routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/item-reviews", post(create_item_review).get(list_item_reviews))
        .route("/item-reviews/query", post(query_item_reviews))
        .route("/item-reviews/{id}", get(get_item_review))
        .route("/item-reviews/{id}/decision", post(decide_item_review))
        .route("/user-reviews", post(create_user_review).get(list_user_reviews))
        .route("/user-reviews/query", post(query_user_reviews))
        .route("/user-reviews/{id}", get(get_user_review))
        .route("/user-reviews/{id}/decision", post(decide_user_review))
}
