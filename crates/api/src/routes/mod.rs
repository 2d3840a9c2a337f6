pub mod analytics;
pub mod complaints;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /complaints            citizen submissions, annotated listings, transitions
/// /analytics             public transparency stats and authority views
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/complaints", complaints::router())
        .nest("/analytics", analytics::router())
}
