use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single GPS reading for an employee. Append-only; never mutated
/// after insert.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LocationFix {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05T09:15:00", value_type = String, format = "date-time")]
    pub recorded_at: NaiveDateTime,

    #[schema(example = 28.6139)]
    pub latitude: f64,

    #[schema(example = 77.2090)]
    pub longitude: f64,

    /// GPS accuracy radius in meters, when the device reports one.
    #[schema(example = 12.5, nullable = true)]
    pub accuracy: Option<f64>,
}
