use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::{Ellipsoid, GeodeticPosition};
use crate::range::error::RangeError;
use crate::range::geodesic::surface_distance_m;

/// Roughly a quarter of the equator.
pub const DEFAULT_THRESHOLD_KM: f64 = 10018.0;
/// Largest usable threshold. Pairs farther apart than this can be near enough
/// to antipodal that the geodesic does not converge.
pub const MAX_THRESHOLD_KM: f64 = 19_900.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RangeStatus {
    InRange,
    OutOfRange,
    Unavailable,
}

/// Surface-distance range test between two geodetic positions.
#[derive(Debug, Clone, Copy)]
pub struct RangeClassifier {
    threshold_km: f64,
    ellipsoid: Ellipsoid,
}

impl Default for RangeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_KM)
    }
}

impl RangeClassifier {
    pub fn new(threshold_km: f64) -> Self {
        Self {
            threshold_km,
            ellipsoid: Ellipsoid::WGS84,
        }
    }

    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Geodesic distance between both positions flattened to sea level.
    pub fn geodesic_distance_meters(
        &self,
        a: &GeodeticPosition,
        b: &GeodeticPosition,
    ) -> Result<f64, RangeError> {
        surface_distance_m(&self.ellipsoid, &a.at_sea_level(), &b.at_sea_level())
    }

    pub fn is_within(&self, distance_m: f64) -> bool {
        distance_m / 1000.0 < self.threshold_km
    }

    /// Any numerical failure counts as out of range.
    pub fn is_in_range(&self, a: &GeodeticPosition, b: &GeodeticPosition) -> bool {
        self.classify(a, b) == RangeStatus::InRange
    }

    pub fn classify(&self, a: &GeodeticPosition, b: &GeodeticPosition) -> RangeStatus {
        self.measure(a, b).0
    }

    /// Status together with the distance it was derived from.
    pub fn measure(&self, a: &GeodeticPosition, b: &GeodeticPosition) -> (RangeStatus, Option<f64>) {
        match self.geodesic_distance_meters(a, b) {
            Ok(d) if self.is_within(d) => (RangeStatus::InRange, Some(d)),
            Ok(d) => (RangeStatus::OutOfRange, Some(d)),
            Err(e) => {
                log::debug!("Range check failed: {}", e);
                (RangeStatus::Unavailable, None)
            }
        }
    }
}
