use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::fleet::error::FleetError;
use crate::geo::{Ellipsoid, GeodeticPosition};
use crate::range::PositionSource;

/// One reported ship position, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ShipPoint {
    pub time: DateTime<Utc>,
    pub lon: f64,
    pub lat: f64,
}

impl ShipPoint {
    fn position(&self) -> GeodeticPosition {
        GeodeticPosition::from_degrees(self.lon, self.lat, 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShipRecord {
    pub id: String,
    pub name: String,
    pub mmsi: String,
    #[serde(default)]
    pub call_sign: Option<String>,
    #[serde(default)]
    pub vessel_type: Option<u32>,
    #[serde(default)]
    pub points: Vec<ShipPoint>,
}

#[derive(Debug, Deserialize)]
struct ShipsFile {
    ships: Vec<ShipRecord>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShipInfo {
    pub id: String,
    pub name: String,
    pub mmsi: String,
    pub call_sign: Option<String>,
    pub vessel_type: Option<u32>,
}

/// A ship and its time-sorted track.
#[derive(Debug, Clone)]
pub struct Ship {
    info: ShipInfo,
    track: Vec<ShipPoint>,
}

impl Ship {
    /// Ships without a name, an id, or at least two points are dropped.
    pub fn from_record(record: ShipRecord) -> Option<Self> {
        let id = normalize_id(&record.id);
        if id.is_empty() || record.name.trim().is_empty() || record.points.len() < 2 {
            return None;
        }

        let mut track = record.points;
        track.sort_by_key(|p| p.time);

        Some(Self {
            info: ShipInfo {
                id,
                name: record.name,
                mmsi: record.mmsi,
                call_sign: record.call_sign,
                vessel_type: record.vessel_type,
            },
            track,
        })
    }

    pub fn info(&self) -> &ShipInfo {
        &self.info
    }

    pub fn track(&self) -> &[ShipPoint] {
        &self.track
    }

    /// First and last reported times; both inclusive.
    pub fn span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.track[0].time, self.track[self.track.len() - 1].time)
    }

    fn interpolate(&self, time: DateTime<Utc>) -> Option<GeodeticPosition> {
        let (start, end) = self.span();
        if time < start || time > end {
            return None;
        }

        let idx = self.track.partition_point(|p| p.time <= time);
        if idx == self.track.len() {
            return Some(self.track[idx - 1].position());
        }
        let (a, b) = (&self.track[idx - 1], &self.track[idx]);

        let span_ms = (b.time - a.time).num_milliseconds() as f64;
        let fraction = if span_ms > 0.0 {
            (time - a.time).num_milliseconds() as f64 / span_ms
        } else {
            0.0
        };

        let from = a.position().to_ecef_m(&Ellipsoid::WGS84);
        let to = b.position().to_ecef_m(&Ellipsoid::WGS84);
        let ecef = [
            from[0] + (to[0] - from[0]) * fraction,
            from[1] + (to[1] - from[1]) * fraction,
            from[2] + (to[2] - from[2]) * fraction,
        ];
        Some(GeodeticPosition::from_ecef_m(ecef, &Ellipsoid::WGS84).at_sea_level())
    }
}

impl PositionSource for Ship {
    type Error = Infallible;

    fn id(&self) -> &str {
        &self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn is_available(&self, time: DateTime<Utc>) -> bool {
        let (start, end) = self.span();
        start <= time && time <= end
    }

    fn position_at(&self, time: DateTime<Utc>) -> Result<Option<GeodeticPosition>, Infallible> {
        Ok(self.interpolate(time))
    }
}

fn normalize_id(id: &str) -> String {
    let id = id.trim();
    id.strip_prefix("IMO").unwrap_or(id).trim().to_string()
}

pub fn load_ships(path: &Path) -> Result<Vec<Ship>, FleetError> {
    let content = fs::read_to_string(path)?;
    parse_ships(&content)
}

/// Parse a ships file, merging repeated ids into one track.
pub fn parse_ships(yaml: &str) -> Result<Vec<Ship>, FleetError> {
    let file: ShipsFile = serde_yaml::from_str(yaml)?;

    let mut merged: BTreeMap<String, ShipRecord> = BTreeMap::new();
    for record in file.ships {
        let id = normalize_id(&record.id);
        match merged.get_mut(&id) {
            Some(existing) => existing.points.extend(record.points),
            None => {
                merged.insert(id, record);
            }
        }
    }

    let total = merged.len();
    let ships: Vec<Ship> = merged.into_values().filter_map(Ship::from_record).collect();
    if ships.len() < total {
        log::info!(
            "Ignored {} ships without a name, id or enough track points",
            total - ships.len()
        );
    }
    Ok(ships)
}
