//! Aggregated OpenAPI document and Swagger UI mount.
//!
//! Compiled only with the `swagger-ui` feature. The document collects
//! every annotated handler; schemas referenced from the paths are picked
//! up automatically.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{
    broadcasts, devices, items, moderation, operations, reviews, system,
};
use crate::app_state::AppState;

/// OpenAPI document covering the whole admin surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "curby-gateway",
        description = "Admin REST gateway for the Curby local marketplace"
    ),
    paths(
        moderation::create_ban,
        moderation::list_bans,
        moderation::query_bans,
        moderation::get_ban,
        moderation::patch_ban,
        moderation::delete_ban,
        moderation::create_suspension,
        moderation::list_suspensions,
        moderation::query_suspensions,
        moderation::get_suspension,
        moderation::patch_suspension,
        moderation::delete_suspension,
        moderation::create_warning,
        moderation::list_warnings,
        moderation::patch_warning,
        moderation::delete_warning,
        moderation::user_standing,
        reviews::create_item_review,
        reviews::list_item_reviews,
        reviews::query_item_reviews,
        reviews::get_item_review,
        reviews::decide_item_review,
        reviews::create_user_review,
        reviews::list_user_reviews,
        reviews::query_user_reviews,
        reviews::get_user_review,
        reviews::decide_user_review,
        items::create_item,
        items::list_items,
        items::query_items,
        items::get_item,
        items::patch_item,
        items::take_down_item,
        items::restore_item,
        items::create_saved_item,
        items::list_saved_items,
        items::query_saved_items,
        items::delete_saved_item,
        broadcasts::create_broadcast,
        broadcasts::list_broadcasts,
        broadcasts::query_broadcasts,
        broadcasts::get_broadcast,
        broadcasts::send_broadcast,
        broadcasts::list_deliveries,
        broadcasts::mark_delivery_sent,
        broadcasts::mark_delivery_failed,
        broadcasts::create_template,
        broadcasts::list_templates,
        broadcasts::get_template,
        broadcasts::patch_template,
        broadcasts::delete_template,
        devices::create_device,
        devices::list_devices,
        devices::query_devices,
        devices::get_device,
        devices::patch_device,
        devices::delete_device,
        devices::create_event,
        devices::query_events,
        devices::get_event,
        devices::create_event_type,
        devices::list_event_types,
        devices::patch_event_type,
        devices::delete_event_type,
        operations::create_feedback,
        operations::list_feedback,
        operations::query_feedback,
        operations::delete_feedback,
        operations::create_schedule,
        operations::list_schedules,
        operations::patch_schedule,
        operations::delete_schedule,
        operations::create_coin_transaction_type,
        operations::list_coin_transaction_types,
        operations::get_coin_transaction_type,
        operations::patch_coin_transaction_type,
        operations::delete_coin_transaction_type,
        operations::create_support_media,
        operations::query_support_media,
        operations::get_support_media,
        operations::delete_support_media,
        system::health_handler,
    ),
    tags(
        (name = "Moderation", description = "Bans, suspensions, warnings, user standing"),
        (name = "Reviews", description = "Item and user review workflows"),
        (name = "Items", description = "Listings, takedown/restore, saved items"),
        (name = "Broadcasts", description = "Broadcasts, fan-out, deliveries, templates"),
        (name = "Devices", description = "Devices, event log, event types"),
        (name = "Operations", description = "Feedback, schedules, coin transaction types, support media"),
        (name = "System", description = "Health and diagnostics"),
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Swagger UI router serving the document at `/api-docs/openapi.json`.
/// Mounted at the root, outside the admin gate, like the health endpoint.
pub fn routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn document_collects_all_resources() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/bans",
            "/api/v1/items/{id}/takedown",
            "/api/v1/broadcasts/{id}/send",
            "/api/v1/users/{user_id}/standing",
            "/health",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path}"
            );
        }
    }
}
