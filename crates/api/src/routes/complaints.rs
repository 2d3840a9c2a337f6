//! Route definitions for complaint submission, listing, and transitions.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::complaints;
use crate::state::AppState;

/// Complaint routes mounted at `/complaints`.
///
/// ```text
/// POST  /               -> create
/// GET   /               -> list (annotated, filterable)
/// GET   /mine           -> list_mine
/// GET   /nearby         -> nearby
/// PATCH /{id}/status    -> transition
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(complaints::create).get(complaints::list))
        .route("/mine", get(complaints::list_mine))
        .route("/nearby", get(complaints::nearby))
        .route("/{id}/status", patch(complaints::transition))
}
