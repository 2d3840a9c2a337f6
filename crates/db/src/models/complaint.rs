//! Complaint entity model and DTOs.

use jansetu_core::complaint::{Category, ComplaintRecord};
use jansetu_core::error::CoreError;
use jansetu_core::geo::GeoPoint;
use jansetu_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `complaints` table.
///
/// `category` and `status` are kept as their TEXT wire spellings here;
/// [`Complaint::to_record`] converts a row into the strongly typed
/// engine-facing snapshot record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    pub citizen_id: DbId,
    pub category: String,
    pub description: String,
    pub status: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub address: Option<String>,
    pub assigned_department: Option<String>,
    pub photo_url: Option<String>,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Complaint {
    /// Convert this row into the engine-facing snapshot record.
    ///
    /// Fails with `Validation` if the row carries a category or status
    /// spelling outside the agreed enumerations — the engine never
    /// silently substitutes business values.
    pub fn to_record(&self) -> Result<ComplaintRecord, CoreError> {
        let location = match (self.location_lat, self.location_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        Ok(ComplaintRecord {
            id: self.id,
            citizen_id: self.citizen_id,
            category: self.category.parse()?,
            description: self.description.clone(),
            status: self.status.parse()?,
            location,
            department: self.assigned_department.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

/// DTO for submitting a new complaint via `POST /api/v1/complaints`.
///
/// Status is not accepted from the caller: every complaint starts
/// `pending`. Media URLs are opaque references produced by the external
/// upload flow.
#[derive(Debug, Deserialize)]
pub struct CreateComplaint {
    pub citizen_id: DbId,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub audio_url: Option<String>,
}
