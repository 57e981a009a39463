use crate::{
    auth::auth::AuthUser,
    model::service::{Service, ServicePopularity, ServiceType},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateService {
    #[schema(example = "Split AC installation")]
    pub name: String,

    #[schema(example = "Installation and gas top-up for split air conditioners")]
    pub description: String,

    #[schema(example = "ac_repair")]
    pub service_type: ServiceType,

    #[schema(example = "https://cdn.company.com/services/ac.png", nullable = true)]
    pub image_url: Option<String>,

    #[schema(example = "regular", nullable = true)]
    pub popularity: Option<ServicePopularity>,
}

/// Partial update payload; absent fields stay untouched.
#[derive(Deserialize, ToSchema)]
pub struct UpdateService {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<ServiceType>,
    pub image_url: Option<String>,
    pub technicians_count: Option<u32>,
    pub popularity: Option<ServicePopularity>,
}

const SERVICE_UPDATE_COLUMNS: &[&str] = &[
    "name",
    "description",
    "service_type",
    "image_url",
    "technicians_count",
    "popularity",
];

/// Services catalog
#[utoipa::path(
    get,
    path = "/api/v1/services",
    responses(
        (status = 200, description = "All services", body = [Service]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Service"
)]
pub async fn list_services(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let services = sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, description, service_type, image_url, technicians_count, popularity
        FROM services
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch services");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(services))
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{service_id}",
    params(
        ("service_id", Path, description = "Service ID")
    ),
    responses(
        (status = 200, body = Service),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Service"
)]
pub async fn get_service(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let service_id = path.into_inner();

    let service = sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, description, service_type, image_url, technicians_count, popularity
        FROM services
        WHERE id = ?
        "#,
    )
    .bind(service_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, service_id, "Failed to fetch service");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match service {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Service not found"
        }))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/services",
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Service"
)]
pub async fn create_service(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateService>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // technicians_count starts at zero; it follows staffing, not the
    // catalog entry
    let popularity = payload.popularity.unwrap_or(ServicePopularity::Regular);

    sqlx::query(
        r#"
        INSERT INTO services (name, description, service_type, image_url, technicians_count, popularity)
        VALUES (?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.service_type.as_ref())
    .bind(&payload.image_url)
    .bind(popularity.as_ref())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create service");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Service created successfully"
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{service_id}",
    params(
        ("service_id", Path, description = "Service ID")
    ),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated"),
        (status = 400, description = "Unknown field in payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Service"
)]
pub async fn update_service(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let service_id = path.into_inner();

    let update = build_update_sql("services", SERVICE_UPDATE_COLUMNS, &body, "id", service_id)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, service_id, "Failed to update service");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Service not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Service updated successfully"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{service_id}",
    params(
        ("service_id", Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Service"
)]
pub async fn delete_service(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let service_id = path.into_inner();

    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(service_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, service_id, "Failed to delete service");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Service not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
