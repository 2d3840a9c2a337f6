//! Handlers for complaint submission, annotated listings, the proximity
//! query, and status transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use jansetu_core::classifier::{self, Triage, TriageFilter};
use jansetu_core::complaint::TransitionAction;
use jansetu_core::error::CoreError;
use jansetu_core::geo;
use jansetu_core::types::DbId;
use jansetu_db::models::complaint::{Complaint, CreateComplaint};
use jansetu_db::repositories::ComplaintRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Radius applied to the nearby query when the caller omits one.
const DEFAULT_NEARBY_RADIUS_KM: f64 = 2.0;

/* --------------------------------------------------------------------------
Response and request types
-------------------------------------------------------------------------- */

/// A complaint row together with its freshly computed triage annotation.
///
/// Severity/urgency are derived fields: they are recomputed on every read
/// and never treated as stored ground truth.
#[derive(Debug, Serialize)]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: Complaint,
    #[serde(flatten)]
    pub triage: Triage,
}

/// Query parameters for `GET /complaints/mine`.
///
/// The caller's identity is supplied per request, not held as process
/// state — session management is an external collaborator.
#[derive(Debug, Deserialize)]
pub struct MineQuery {
    pub citizen_id: DbId,
}

/// Query parameters for `GET /complaints/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in kilometers. Defaults to 2 km.
    pub radius: Option<f64>,
}

/// Request body for `PATCH /complaints/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub action: TransitionAction,
    /// Handling department; required for `assign`, ignored for `resolve`.
    pub department: Option<String>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Annotate rows with triage verdicts computed at `now = Utc::now()`.
fn annotate(rows: Vec<Complaint>) -> AppResult<Vec<ComplaintView>> {
    let records = rows
        .iter()
        .map(|row| row.to_record())
        .collect::<Result<Vec<_>, _>>()?;
    let triage = classifier::classify_all(&records, Utc::now());
    Ok(rows
        .into_iter()
        .zip(triage)
        .map(|(complaint, triage)| ComplaintView { complaint, triage })
        .collect())
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /complaints -- create a new complaint in `pending` status.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateComplaint>,
) -> AppResult<(StatusCode, Json<DataResponse<Complaint>>)> {
    match (input.lat, input.lng) {
        (Some(lat), Some(lng)) => geo::validate_point(lat, lng)?,
        (None, None) => {}
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Location requires both lat and lng".to_string(),
            )))
        }
    }

    let created = ComplaintRepo::create(&state.pool, &input).await?;
    tracing::info!(complaint_id = created.id, category = %created.category, "Complaint created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /complaints -- the annotated snapshot, optionally narrowed by
/// category/status/severity/urgency facets.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TriageFilter>,
) -> AppResult<Json<DataResponse<Vec<ComplaintView>>>> {
    let rows = ComplaintRepo::list(&state.pool).await?;
    let views = annotate(rows)?;
    let views = views
        .into_iter()
        .filter(|v| {
            // matches() takes the engine record, not the raw row.
            v.complaint
                .to_record()
                .map(|r| filter.matches(&r, &v.triage))
                .unwrap_or(false)
        })
        .collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /complaints/mine -- one citizen's complaints, annotated.
pub async fn list_mine(
    State(state): State<AppState>,
    Query(query): Query<MineQuery>,
) -> AppResult<Json<DataResponse<Vec<ComplaintView>>>> {
    let rows = ComplaintRepo::find_by_citizen(&state.pool, query.citizen_id).await?;
    Ok(Json(DataResponse {
        data: annotate(rows)?,
    }))
}

/// GET /complaints/nearby -- complaints within a radius of a point,
/// boundary inclusive (great-circle distance, delegated to the store).
pub async fn nearby(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<DataResponse<Vec<ComplaintView>>>> {
    geo::validate_point(query.lat, query.lng)?;
    let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if radius < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Radius must not be negative".to_string(),
        )));
    }

    let rows = ComplaintRepo::find_nearby(&state.pool, query.lat, query.lng, radius).await?;
    Ok(Json(DataResponse {
        data: annotate(rows)?,
    }))
}

/// PATCH /complaints/{id}/status -- apply an authority-triggered
/// transition.
///
/// Outcomes are distinct, not collapsed: 404 for an unknown id, 422 when
/// the state machine forbids the edge, 409 when a concurrent actor won
/// the conditional write.
pub async fn transition(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<TransitionRequest>,
) -> AppResult<Json<DataResponse<Complaint>>> {
    if request.action == TransitionAction::Assign && request.department.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "assign requires a department".to_string(),
        )));
    }

    let row = ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Complaint",
            id,
        })?;

    let current = row.status.parse()?;
    request.action.apply(current)?;

    let expected = request.action.expected_from();
    let target = request.action.target();

    // Only `assign` sets the department; a department sent with
    // `resolve` must not clobber the one on record.
    let department = match request.action {
        TransitionAction::Assign => request.department.as_deref(),
        TransitionAction::Resolve => None,
    };

    let updated = ComplaintRepo::update_status(
        &state.pool,
        id,
        expected.as_str(),
        target.as_str(),
        department,
    )
    .await?;

    match updated {
        Some(complaint) => {
            tracing::info!(
                complaint_id = id,
                action = %request.action,
                status = %complaint.status,
                "Complaint transitioned"
            );
            Ok(Json(DataResponse { data: complaint }))
        }
        // The row existed a moment ago but the conditional write matched
        // nothing: another actor changed the status in between.
        None => Err(AppError::Core(CoreError::Conflict(format!(
            "Complaint {id} was modified concurrently; status is no longer '{expected}'"
        )))),
    }
}
