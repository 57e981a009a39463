use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PayrollStatus {
    Calculated,
    Approved,
    Paid,
}

/// Immutable once written, except for the status workflow
/// calculated -> approved -> paid.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-01-15", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = 86.5)]
    pub hours_worked: f64,

    #[schema(example = 132.75)]
    pub distance_traveled: f64,

    #[schema(example = 10380.0)]
    pub base_pay: f64,

    #[schema(example = 663.75)]
    pub distance_pay: f64,

    #[schema(example = 11043.75)]
    pub total_pay: f64,

    #[schema(example = "calculated")]
    pub status: String,

    #[schema(example = "2026-01-16T00:05:00", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}
