use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{Attendance, AttendanceStatus};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// A check-in after workday start plus the grace period counts as late.
fn classify_check_in(check_in: NaiveTime, workday_start: NaiveTime, grace_min: i64) -> AttendanceStatus {
    if check_in <= workday_start + Duration::minutes(grace_min) {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "field visit, sector 12", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAttendance {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub work_date: NaiveDate,

    #[schema(example = "absent")]
    pub status: AttendanceStatus,

    #[schema(example = "2026-01-05T09:00:00", value_type = String, format = "date-time", nullable = true)]
    pub check_in_time: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T17:00:00", value_type = String, format = "date-time", nullable = true)]
    pub check_out_time: Option<NaiveDateTime>,

    #[schema(example = "sick, called in", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendancePageQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "present"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let now = chrono::Local::now().naive_local();
    let status = classify_check_in(now.time(), config.workday_start, config.late_grace_min);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, work_date, check_in_time, status, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(now.date())
    .bind(now)
    .bind(status.as_ref())
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Checked in successfully",
            "status": status.as_ref()
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = NOW()
        WHERE employee_id = ?
        AND work_date = CURDATE()
        AND check_out_time IS NULL
        "#,
    )
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully"
    })))
}

/// Manual attendance record, e.g. marking an absence
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance record created"),
        (status = 400, description = "Duplicate record for that day"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAttendance>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    // An absence still gets a check_in_time so every row carries the
    // moment it was recorded; hours only count when check-out is set.
    let check_in = payload
        .check_in_time
        .unwrap_or_else(|| payload.work_date.and_hms_opt(0, 0, 0).unwrap());

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, work_date, check_in_time, check_out_time, status, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.work_date)
    .bind(check_in)
    .bind(payload.check_out_time)
    .bind(payload.status.as_ref())
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Attendance record created"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Attendance already recorded for that day"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id = payload.employee_id, "Manual attendance insert failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Own attendance history
#[utoipa::path(
    get,
    path = "/api/v1/attendance/me",
    params(AttendancePageQuery),
    responses(
        (status = 200, description = "Paginated attendance history", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendancePageQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Failed to count attendance");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    let data = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, work_date, check_in_time, check_out_time, status, notes
        FROM attendance
        WHERE employee_id = ?
        ORDER BY work_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(employee_id)
    .bind(per_page as i64)
    .bind(offset as i64)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Today's attendance across all employees
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's attendance records", body = [Attendance]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    let records = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, work_date, check_in_time, check_out_time, status, notes
        FROM attendance
        WHERE work_date = CURDATE()
        ORDER BY check_in_time ASC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch today's attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn check_in_before_start_is_present() {
        let status = classify_check_in(time(8, 45), time(9, 0), 15);
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[test]
    fn check_in_within_grace_is_present() {
        let status = classify_check_in(time(9, 15), time(9, 0), 15);
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[test]
    fn check_in_after_grace_is_late() {
        let status = classify_check_in(time(9, 16), time(9, 0), 15);
        assert_eq!(status, AttendanceStatus::Late);
    }
}
