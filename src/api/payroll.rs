use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::{
    attendance::Attendance, distance::DailyDistance, employee::Employee, payroll::Payroll,
    payroll::PayrollStatus,
};
use crate::utils::payroll::{PayrollError, calculate_payroll};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollPeriodQuery {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start: NaiveDate,

    #[schema(example = "2026-01-15", value_type = String, format = "date")]
    pub end: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    #[schema(example = "calculated")]
    pub status: Option<PayrollStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<Payroll>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Run the calculator for one employee over a period and persist the
/// result with status `calculated`.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        PayrollPeriodQuery
    ),
    responses(
        (status = 201, description = "Payroll calculated", body = Payroll),
        (status = 400, description = "Inverted period"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Employee has no usable base pay rate")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<PayrollPeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    if query.start > query.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start must not be after end"
        })));
    }

    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Employee not found"
            })));
        }
    };

    let attendance = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, work_date, check_in_time, check_out_time, status, notes
        FROM attendance
        WHERE employee_id = ?
        AND work_date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(query.start)
    .bind(query.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch attendance for payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let distances = sqlx::query_as::<_, DailyDistance>(
        r#"
        SELECT id, employee_id, travel_date, distance_km, created_at, updated_at
        FROM distances
        WHERE employee_id = ?
        AND travel_date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(query.start)
    .bind(query.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch distances for payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let draft = match calculate_payroll(&employee, &attendance, &distances, query.start, query.end)
    {
        Ok(draft) => draft,
        Err(e @ PayrollError::InvalidConfiguration { .. }) => {
            tracing::warn!(employee_id, error = %e, "Payroll refused");
            return Ok(HttpResponse::UnprocessableEntity().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO payroll
        (employee_id, period_start, period_end, hours_worked, distance_traveled,
         base_pay, distance_pay, total_pay, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW())
        "#,
    )
    .bind(draft.employee_id)
    .bind(draft.period_start)
    .bind(draft.period_end)
    .bind(draft.hours_worked)
    .bind(draft.distance_traveled)
    .bind(draft.base_pay)
    .bind(draft.distance_pay)
    .bind(draft.total_pay)
    .bind(draft.status.as_ref())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to store payroll record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let record = sqlx::query_as::<_, Payroll>("SELECT * FROM payroll WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to read back payroll record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", Path, description = "Payroll ID")
    ),
    responses(
        (status = 200, body = Payroll),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    let payroll_id = path.into_inner();

    let payroll = sqlx::query_as::<_, Payroll>("SELECT * FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match payroll {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_management()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        bindings.push(FilterValue::U64(employee_id));
    }

    if let Some(status) = &query.status {
        where_sql.push_str(" AND status = ?");
        bindings.push(FilterValue::Str(status.as_ref()));
    }

    let count_sql = format!("SELECT COUNT(*) FROM payroll{}", where_sql);

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(*s),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payrolls");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT *
        FROM payroll
        {}
        ORDER BY period_end DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_query = sqlx::query_as::<_, Payroll>(&data_sql);
    for b in bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(v),
            FilterValue::Str(s) => data_query.bind(s),
        };
    }

    let data = data_query
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Own payroll history
#[utoipa::path(
    get,
    path = "/api/v1/payroll/me",
    responses(
        (status = 200, body = [Payroll]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn my_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let records = sqlx::query_as::<_, Payroll>(
        r#"
        SELECT *
        FROM payroll
        WHERE employee_id = ?
        ORDER BY period_end DESC, id DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch own payrolls");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

async fn transition_status(
    pool: &MySqlPool,
    payroll_id: u64,
    from: PayrollStatus,
    to: PayrollStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE payroll
        SET status = ?
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(to.as_ref())
    .bind(payroll_id)
    .bind(from.as_ref())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Approve a calculated payroll
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/approve",
    params(
        ("payroll_id", Path, description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll approved"),
        (status = 400, description = "Not found or not in calculated status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn approve_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let affected = transition_status(
        pool.get_ref(),
        payroll_id,
        PayrollStatus::Calculated,
        PayrollStatus::Approved,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payroll_id, "Approve payroll failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll not found or not in calculated status"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll approved"
    })))
}

/// Mark an approved payroll as paid
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/pay",
    params(
        ("payroll_id", Path, description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll marked paid"),
        (status = 400, description = "Not found or not in approved status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn pay_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let affected = transition_status(
        pool.get_ref(),
        payroll_id,
        PayrollStatus::Approved,
        PayrollStatus::Paid,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payroll_id, "Mark-paid failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll not found or not in approved status"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll marked paid"
    })))
}
