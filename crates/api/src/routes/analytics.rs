//! Route definitions for the public transparency stats and authority views.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Analytics routes mounted at `/analytics`.
///
/// ```text
/// GET  /counters                  -> counters
/// GET  /monthly                   -> monthly_series
/// GET  /leaderboard/public        -> public_leaderboard
/// GET  /leaderboard/performance   -> performance_leaderboard
/// GET  /escalations               -> escalations
/// GET  /quick-stats               -> quick_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/counters", get(analytics::counters))
        .route("/monthly", get(analytics::monthly_series))
        .route("/leaderboard/public", get(analytics::public_leaderboard))
        .route(
            "/leaderboard/performance",
            get(analytics::performance_leaderboard),
        )
        .route("/escalations", get(analytics::escalations))
        .route("/quick-stats", get(analytics::quick_stats))
}
