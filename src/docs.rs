use crate::api::attendance::{
    AttendanceListResponse, AttendancePageQuery, CheckInRequest, CreateAttendance,
};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::location::{DateRangeQuery, LocationUpdate};
use crate::api::payroll::{PaginatedPayrollResponse, PayrollPeriodQuery, PayrollQuery};
use crate::api::service::{CreateService, UpdateService};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::distance::DailyDistance;
use crate::model::employee::{Employee, JobRole};
use crate::model::location::LocationFix;
use crate::model::payroll::{Payroll, PayrollStatus};
use crate::model::service::{Service, ServicePopularity, ServiceType};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Field Workforce API",
        version = "1.0.0",
        description = r#"
## Field Workforce Management System

This API powers a field-workforce management system for an organization
dispatching technicians and helpers on home-appliance repair visits.

### Key Features
- **Employee Management**
  - Create, update, list, and view field staff profiles with pay rates
- **Attendance**
  - Daily check-in/check-out with present/late classification
- **Location Tracking**
  - GPS fix ingestion with per-day Haversine distance accumulation
- **Payroll**
  - Hour- and distance-based payroll with a calculated/approved/paid workflow
- **Services Catalog**
  - The appliance services the organization offers

### Security
Most endpoints are protected using **JWT Bearer authentication**.
Sensitive operations require the **Admin** or **Management** role.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::create_attendance,
        crate::api::attendance::my_attendance,
        crate::api::attendance::today_attendance,

        crate::api::location::record_location,
        crate::api::location::list_fixes,
        crate::api::location::my_distances,
        crate::api::location::employee_distances,

        crate::api::payroll::generate_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::my_payrolls,
        crate::api::payroll::approve_payroll,
        crate::api::payroll::pay_payroll,

        crate::api::service::list_services,
        crate::api::service::get_service,
        crate::api::service::create_service,
        crate::api::service::update_service,
        crate::api::service::delete_service
    ),
    components(
        schemas(
            Employee,
            JobRole,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Attendance,
            AttendanceStatus,
            CheckInRequest,
            CreateAttendance,
            AttendancePageQuery,
            AttendanceListResponse,
            LocationFix,
            LocationUpdate,
            DateRangeQuery,
            DailyDistance,
            Payroll,
            PayrollStatus,
            PayrollPeriodQuery,
            PayrollQuery,
            PaginatedPayrollResponse,
            Service,
            ServiceType,
            ServicePopularity,
            CreateService,
            UpdateService
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Field staff management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Location", description = "Location tracking and distance APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
        (name = "Service", description = "Services catalog APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
