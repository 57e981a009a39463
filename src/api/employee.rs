use crate::{
    auth::auth::AuthUser,
    model::{employee::Employee, employee::JobRole, service::ServiceType},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "FLD-031", value_type = String)]
    pub employee_code: String,
    #[schema(example = "Ravi", value_type = String)]
    pub first_name: String,
    #[schema(example = "Sharma", value_type = String)]
    pub last_name: String,
    #[schema(example = "ravi.sharma@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "+911712345678", value_type = String, nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "technician")]
    pub job_role: JobRole,
    #[schema(example = "ac_repair", nullable = true)]
    pub specialization: Option<ServiceType>,
    #[schema(example = 120.0)]
    pub base_pay_rate: f64,
    #[schema(example = 5.0, nullable = true)]
    pub distance_pay_rate: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub job_role: Option<JobRole>,
    pub specialization: Option<ServiceType>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Partial update payload; absent fields stay untouched. Setting
/// distance_pay_rate to null removes distance-pay eligibility.
#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_role: Option<JobRole>,
    pub specialization: Option<ServiceType>,
    pub active: Option<bool>,
    pub base_pay_rate: Option<f64>,
    pub distance_pay_rate: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: Option<NaiveDate>,
}

// Helper enum for typed SQLx binding
#[derive(Debug)]
enum FilterValue<'a> {
    Str(&'a str),
    Text(String),
    Bool(bool),
}

// Columns a partial update may touch. Pay rates are here on purpose:
// clearing distance_pay_rate (null) is how an employee loses distance
// eligibility.
const EMPLOYEE_UPDATE_COLUMNS: &[&str] = &[
    "employee_code",
    "first_name",
    "last_name",
    "email",
    "phone",
    "job_role",
    "specialization",
    "active",
    "base_pay_rate",
    "distance_pay_rate",
    "hire_date",
];

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Duplicate employee code or email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, phone, job_role, specialization,
         active, base_pay_rate, distance_pay_rate, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.job_role.as_ref())
    .bind(payload.specialization.as_ref().map(|s| s.as_ref()))
    .bind(payload.base_pay_rate)
    .bind(payload.distance_pay_rate)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Employee code or email already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(job_role) = &query.job_role {
        conditions.push("job_role = ?");
        bindings.push(FilterValue::Str(job_role.as_ref()));
    }

    if let Some(specialization) = &query.specialization {
        conditions.push("specialization = ?");
        bindings.push(FilterValue::Str(specialization.as_ref()));
    }

    if let Some(active) = query.active {
        conditions.push("active = ?");
        bindings.push(FilterValue::Bool(active));
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Text(like.clone()));
        bindings.push(FilterValue::Text(like.clone()));
        bindings.push(FilterValue::Text(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::Str(v) => count_query.bind(*v),
            FilterValue::Text(v) => count_query.bind(v.clone()),
            FilterValue::Bool(v) => count_query.bind(*v),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in bindings {
        data_query = match b {
            FilterValue::Str(v) => data_query.bind(v),
            FilterValue::Text(v) => data_query.bind(v),
            FilterValue::Bool(v) => data_query.bind(v),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully"),
        (status = 400, description = "Unknown field in payload"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let update = build_update_sql("employees", EMPLOYEE_UPDATE_COLUMNS, &body, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to update employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
