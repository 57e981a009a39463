use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cumulative straight-line travel for one employee on one day, derived
/// from that day's location fixes. One logical row per
/// (employee, travel_date); re-accumulation overwrites distance_km.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DailyDistance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub travel_date: NaiveDate,

    #[schema(example = 14.44)]
    pub distance_km: f64,

    #[schema(example = "2026-01-05T09:15:00", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T18:40:00", value_type = String, format = "date-time", nullable = true)]
    pub updated_at: Option<NaiveDateTime>,
}
