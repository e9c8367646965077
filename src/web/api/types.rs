use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::fleet::EntitySummary;
use crate::geo::GeodeticPosition;

#[derive(Debug, Default, Deserialize)]
pub struct TimeQuery {
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub time: Option<DateTime<Utc>>,
}

/// Geodetic position in degrees and meters.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PositionDeg {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub height_m: f64,
}

impl From<GeodeticPosition> for PositionDeg {
    fn from(p: GeodeticPosition) -> Self {
        Self {
            longitude_deg: p.longitude_deg(),
            latitude_deg: p.latitude_deg(),
            height_m: p.height,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionResponse {
    pub id: String,
    pub time: DateTime<Utc>,
    pub available: bool,
    pub position: Option<PositionDeg>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InRangeResponse {
    pub id: String,
    pub time: DateTime<Utc>,
    pub threshold_km: f64,
    pub in_range: Vec<EntitySummary>,
}

fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
}
