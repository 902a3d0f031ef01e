//! Moderation workflow DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decision body for review endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// `true` approves the review, `false` rejects it.
    pub approve: bool,
    /// Reviewer notes recorded with the decision.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Aggregated moderation standing of one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingResponse {
    /// The user the standing was computed for.
    pub user_id: String,
    /// Whether an active (permanent or unexpired) ban exists.
    pub banned: bool,
    /// Whether the current time falls inside a suspension window.
    pub suspended: bool,
    /// Warnings the user has not acknowledged yet.
    pub unacknowledged_warnings: i64,
}
