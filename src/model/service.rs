use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Appliance categories the organization services. Doubles as the
/// technician specialization vocabulary.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceType {
    AcRepair,
    Refrigerator,
    WashingMachine,
    Microwave,
    Dishwasher,
    Other,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServicePopularity {
    MostRequested,
    Popular,
    Regular,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Service {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Split AC installation")]
    pub name: String,

    #[schema(example = "Installation and gas top-up for split air conditioners")]
    pub description: String,

    #[schema(example = "ac_repair")]
    pub service_type: String,

    #[schema(example = "https://cdn.company.com/services/ac.png", nullable = true)]
    pub image_url: Option<String>,

    #[schema(example = 8)]
    pub technicians_count: u32,

    #[schema(example = "most_requested")]
    pub popularity: String,
}
