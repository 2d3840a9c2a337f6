//! Handlers for the public transparency stats and authority report views.
//!
//! Every endpoint here is a read-only pure computation over one snapshot;
//! nothing mutates the store. Severity/urgency are recomputed per request
//! and never read back from storage.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use jansetu_core::analytics;
use jansetu_core::escalation;

use crate::error::AppResult;
use crate::handlers::fetch_snapshot;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /analytics/counters -- headline reported/in-progress/resolved totals.
pub async fn counters(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<analytics::Counters>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: analytics::counters(&snapshot),
    }))
}

/// GET /analytics/monthly -- reported vs resolved per calendar month,
/// chronological.
pub async fn monthly_series(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<analytics::MonthlyBucket>>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: analytics::monthly_series(&snapshot),
    }))
}

/// GET /analytics/leaderboard/public -- transparency view, ranked by
/// resolution rate.
pub async fn public_leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<analytics::PublicLeaderboardEntry>>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: analytics::public_leaderboard(&snapshot),
    }))
}

/// GET /analytics/leaderboard/performance -- authority view, fastest
/// department first. Deliberately a separate result from the public
/// board: the two rank different populations by different keys.
pub async fn performance_leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<analytics::PerformanceLeaderboardEntry>>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: analytics::performance_leaderboard(&snapshot),
    }))
}

/// GET /analytics/escalations -- unresolved complaints open past the SLA.
pub async fn escalations(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<escalation::Escalation>>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: escalation::overdue(&snapshot, Utc::now(), state.config.escalation_sla_hours),
    }))
}

/// GET /analytics/quick-stats -- authority dashboard header counts.
pub async fn quick_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<analytics::QuickStats>>> {
    let snapshot = fetch_snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: analytics::quick_stats(&snapshot, Utc::now()),
    }))
}
