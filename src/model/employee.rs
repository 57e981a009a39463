use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobRole {
    Technician,
    Helper,
    CallingStaff,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "FLD-001",
        "first_name": "Ravi",
        "last_name": "Sharma",
        "email": "ravi.sharma@company.com",
        "phone": "+911712345678",
        "job_role": "technician",
        "specialization": "ac_repair",
        "active": true,
        "base_pay_rate": 120.0,
        "distance_pay_rate": 5.0,
        "hire_date": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "FLD-001")]
    pub employee_code: String,

    #[schema(example = "Ravi")]
    pub first_name: String,

    #[schema(example = "Sharma")]
    pub last_name: String,

    #[schema(example = "ravi.sharma@company.com")]
    pub email: String,

    #[schema(example = "+911712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "technician")]
    pub job_role: String,

    #[schema(example = "ac_repair", nullable = true)]
    pub specialization: Option<String>,

    #[schema(example = true)]
    pub active: bool,

    /// Currency units per worked hour. Nullable in storage so a
    /// misconfigured employee is representable; payroll refuses to run
    /// without it.
    #[schema(example = 120.0, nullable = true)]
    pub base_pay_rate: Option<f64>,

    /// Currency units per traveled kilometer. Absent for office-based
    /// roles, which never accrue distance pay.
    #[schema(example = 5.0, nullable = true)]
    pub distance_pay_rate: Option<f64>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
}
