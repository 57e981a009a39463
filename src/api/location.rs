use crate::auth::auth::AuthUser;
use crate::model::{distance::DailyDistance, location::LocationFix};
use crate::utils::geo;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct LocationUpdate {
    #[schema(example = 28.6139)]
    pub latitude: f64,

    #[schema(example = 77.2090)]
    pub longitude: f64,

    #[schema(example = 12.5, nullable = true)]
    pub accuracy: Option<f64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DateRangeQuery {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start: NaiveDate,

    #[schema(example = "2026-01-15", value_type = String, format = "date")]
    pub end: NaiveDate,
}

/// Record a location fix and refresh today's distance total.
///
/// The whole day is re-accumulated from its stored fixes on every
/// update; the daily row is an overwrite, not an increment.
#[utoipa::path(
    post,
    path = "/api/v1/location",
    request_body = LocationUpdate,
    responses(
        (status = 201, description = "Fix recorded", body = Object, example = json!({
            "message": "Location recorded",
            "distance_km": 14.44
        })),
        (status = 400, description = "Malformed coordinates"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
pub async fn record_location(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<LocationUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    // A malformed fix must never reach storage; it would silently
    // corrupt the payroll derived from it.
    if let Err(e) = geo::validate_coordinates(payload.latitude, payload.longitude) {
        tracing::warn!(employee_id, error = %e, "Rejected location fix");
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": e.to_string()
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO locations (employee_id, recorded_at, latitude, longitude, accuracy)
        VALUES (?, NOW(), ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.accuracy)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to store location fix");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Re-fetch the full day in append order and recompute from scratch.
    let fixes = sqlx::query_as::<_, LocationFix>(
        r#"
        SELECT id, employee_id, recorded_at, latitude, longitude, accuracy
        FROM locations
        WHERE employee_id = ?
        AND DATE(recorded_at) = CURDATE()
        ORDER BY recorded_at ASC, id ASC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch today's fixes");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut distance_km = 0.0;

    if fixes.len() >= 2 {
        distance_km = geo::accumulate_km(&fixes);

        sqlx::query(
            r#"
            INSERT INTO distances (employee_id, travel_date, distance_km, created_at, updated_at)
            VALUES (?, CURDATE(), ?, NOW(), NOW())
            ON DUPLICATE KEY UPDATE distance_km = VALUES(distance_km), updated_at = NOW()
            "#,
        )
        .bind(employee_id)
        .bind(distance_km)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to upsert daily distance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    Ok(HttpResponse::Created().json(json!({
        "message": "Location recorded",
        "distance_km": distance_km
    })))
}

/// Fixes for one employee over a date range
#[utoipa::path(
    get,
    path = "/api/v1/location/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Location fixes in range", body = [LocationFix]),
        (status = 400, description = "Inverted date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
pub async fn list_fixes(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    if query.start > query.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start must not be after end"
        })));
    }

    let employee_id = path.into_inner();

    let fixes = sqlx::query_as::<_, LocationFix>(
        r#"
        SELECT id, employee_id, recorded_at, latitude, longitude, accuracy
        FROM locations
        WHERE employee_id = ?
        AND DATE(recorded_at) BETWEEN ? AND ?
        ORDER BY recorded_at ASC, id ASC
        "#,
    )
    .bind(employee_id)
    .bind(query.start)
    .bind(query.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch location fixes");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(fixes))
}

async fn distances_in_range(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyDistance>, sqlx::Error> {
    sqlx::query_as::<_, DailyDistance>(
        r#"
        SELECT id, employee_id, travel_date, distance_km, created_at, updated_at
        FROM distances
        WHERE employee_id = ?
        AND travel_date BETWEEN ? AND ?
        ORDER BY travel_date ASC
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Own daily distances over a date range
#[utoipa::path(
    get,
    path = "/api/v1/distance/me",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Daily distances in range", body = [DailyDistance]),
        (status = 400, description = "Inverted date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
pub async fn my_distances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    if query.start > query.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start must not be after end"
        })));
    }

    let distances = distances_in_range(pool.get_ref(), employee_id, query.start, query.end)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch distances");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(distances))
}

/// Daily distances for any employee over a date range
#[utoipa::path(
    get,
    path = "/api/v1/distance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Daily distances in range", body = [DailyDistance]),
        (status = 400, description = "Inverted date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
pub async fn employee_distances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    if query.start > query.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start must not be after end"
        })));
    }

    let employee_id = path.into_inner();

    let distances = distances_in_range(pool.get_ref(), employee_id, query.start, query.end)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch distances");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(distances))
}
