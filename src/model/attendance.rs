use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

/// One row per employee per calendar day. Created on check-in, mutated
/// once on check-out, never deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub work_date: NaiveDate,

    #[schema(example = "2026-01-05T09:02:11", value_type = String, format = "date-time")]
    pub check_in_time: NaiveDateTime,

    #[schema(example = "2026-01-05T17:30:00", value_type = String, format = "date-time", nullable = true)]
    pub check_out_time: Option<NaiveDateTime>,

    #[schema(example = "present")]
    pub status: String,

    #[schema(example = "field visit, sector 12", nullable = true)]
    pub notes: Option<String>,
}
