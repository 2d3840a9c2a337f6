//! Repository for the `complaints` table.
//!
//! Rows are never deleted (audit trail requirement). The only mutation
//! after creation is [`ComplaintRepo::update_status`], a conditional
//! single-row UPDATE that compares the current status before writing so
//! concurrent authority actions cannot drive a complaint through an
//! invalid transition sequence.

use jansetu_core::types::DbId;
use sqlx::PgPool;

use crate::models::complaint::{Complaint, CreateComplaint};

/// Column list for `complaints` queries.
const COLUMNS: &str = "\
    id, citizen_id, category, description, status, \
    location_lat, location_lng, address, assigned_department, \
    photo_url, audio_url, created_at, updated_at";

/// Mean Earth radius in kilometers; must match the reference haversine
/// semantics in `jansetu_core::geo`.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Provides persistence operations for citizen complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a new complaint. Status always starts as `pending`.
    pub async fn create(pool: &PgPool, input: &CreateComplaint) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints \
                 (citizen_id, category, description, location_lat, location_lng, \
                  address, photo_url, audio_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(input.citizen_id)
            .bind(input.category.as_str())
            .bind(&input.description)
            .bind(input.lat)
            .bind(input.lng)
            .bind(&input.address)
            .bind(&input.photo_url)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    /// Full unfiltered snapshot in insertion order.
    ///
    /// All analytic views are computed from this snapshot in memory;
    /// filtering happens in the engine, not in SQL.
    pub async fn list(pool: &PgPool) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints ORDER BY id");
        sqlx::query_as::<_, Complaint>(&query).fetch_all(pool).await
    }

    /// Find a complaint by id. Returns `None` if it does not exist.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All complaints submitted by one citizen, newest first.
    pub async fn find_by_citizen(
        pool: &PgPool,
        citizen_id: DbId,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE citizen_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(citizen_id)
            .fetch_all(pool)
            .await
    }

    /// Complaints within `radius_km` of a point, boundary inclusive.
    ///
    /// Great-circle (haversine) distance on a spherical Earth; rows
    /// without a location never match. A radius of 0 returns only
    /// exact-coincident points.
    pub async fn find_nearby(
        pool: &PgPool,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        // least(1.0, sqrt(..)) guards asin against floating-point noise.
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE location_lat IS NOT NULL AND location_lng IS NOT NULL \
               AND 2.0 * {EARTH_RADIUS_KM} * asin(least(1.0, sqrt( \
                     pow(sin(radians(location_lat - $1) / 2.0), 2) \
                     + cos(radians($1)) * cos(radians(location_lat)) \
                       * pow(sin(radians(location_lng - $2) / 2.0), 2)))) <= $3 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(lat)
            .bind(lng)
            .bind(radius_km)
            .fetch_all(pool)
            .await
    }

    /// Conditionally advance a complaint's status.
    ///
    /// The UPDATE only applies while the row still holds
    /// `expected_status`; `updated_at` is refreshed as the authoritative
    /// time of last status change. Returns `None` when no row matched —
    /// the caller distinguishes a missing id (`NotFound`) from a lost
    /// optimistic-concurrency race (`Conflict`) with a follow-up read.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        new_status: &str,
        department: Option<&str>,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET status = $3, \
                 assigned_department = COALESCE($4, assigned_department), \
                 updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(expected_status)
            .bind(new_status)
            .bind(department)
            .fetch_optional(pool)
            .await
    }
}
