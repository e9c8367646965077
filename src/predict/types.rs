use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use crate::predict::error::PredictError;

const MINUTES_PER_DAY: f64 = 1440.0;
const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;

/// Information about a single satellite from TLE
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u64,
    pub tle_source: String,
}

/// One parsed TLE set, ready for propagation.
#[derive(Debug)]
pub struct OrbitalRecord {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
    pub epoch: DateTime<Utc>,
    pub epoch_jd: f64,
    pub mean_motion_rad_min: f64,
    pub inclination_rad: f64,
}

impl OrbitalRecord {
    pub fn from_tle(
        name: Option<String>,
        line1: &str,
        line2: &str,
        tle_source: &str,
    ) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        Self::from_elements(elements, tle_source)
    }

    pub fn from_elements(elements: Elements, tle_source: &str) -> Result<Self, PredictError> {
        let constants = Constants::from_elements(&elements)?;
        let epoch = elements.datetime.and_utc();
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            info: SatelliteInfo {
                name,
                norad_id: elements.norad_id,
                tle_source: tle_source.to_string(),
            },
            epoch,
            epoch_jd: julian_date(epoch),
            mean_motion_rad_min: elements.mean_motion * 2.0 * PI / MINUTES_PER_DAY,
            inclination_rad: elements.inclination.to_radians(),
            elements,
            constants,
        })
    }

    /// Whole minutes in one revolution, plus one to close the loop.
    pub fn period_minutes(&self) -> i64 {
        period_minutes(self.mean_motion_rad_min)
    }

    pub fn summary(&self) -> OrbitSummary {
        let inclination_deg = self.elements.inclination;
        OrbitSummary {
            orbit_type: OrbitType::from_inclination_deg(inclination_deg),
            inclination_deg,
            period_minutes: self.period_minutes(),
            epoch: self.epoch,
            epoch_jd: self.epoch_jd,
        }
    }
}

pub fn period_minutes(mean_motion_rad_min: f64) -> i64 {
    if !mean_motion_rad_min.is_finite() || mean_motion_rad_min <= 0.0 {
        return i64::MAX;
    }
    ((2.0 * PI) / mean_motion_rad_min).round() as i64 + 1
}

pub fn julian_date(time: DateTime<Utc>) -> f64 {
    let seconds = time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JULIAN_DATE + seconds / 86_400.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum OrbitType {
    #[strum(serialize = "Prograde equatorial")]
    ProgradeEquatorial,
    Prograde,
    #[strum(serialize = "Polar Orbit")]
    Polar,
    Retrograde,
    #[strum(serialize = "Retrograde equatorial")]
    RetrogradeEquatorial,
    Unknown,
}

impl OrbitType {
    pub fn from_inclination_deg(inclination_deg: f64) -> Self {
        if inclination_deg == 0.0 {
            OrbitType::ProgradeEquatorial
        } else if inclination_deg > 0.0 && inclination_deg < 90.0 {
            OrbitType::Prograde
        } else if inclination_deg == 90.0 {
            OrbitType::Polar
        } else if inclination_deg > 90.0 && inclination_deg < 180.0 {
            OrbitType::Retrograde
        } else if inclination_deg == 180.0 {
            OrbitType::RetrogradeEquatorial
        } else {
            OrbitType::Unknown
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrbitSummary {
    pub orbit_type: OrbitType,
    pub inclination_deg: f64,
    pub period_minutes: i64,
    pub epoch: DateTime<Utc>,
    pub epoch_jd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::TimeZone;

    #[test]
    fn parses_iss_record() {
        let record = fixtures::iss_record(0);
        assert_eq!(record.info.norad_id, 25544);
        assert_eq!(record.info.name, "ISS (ZARYA)");
        assert!((record.inclination_rad - 51.6416_f64.to_radians()).abs() < 1e-12);
        let expected_n = 15.72125391 * 2.0 * PI / 1440.0;
        assert!((record.mean_motion_rad_min - expected_n).abs() < 1e-9);
        // 2008 day 264.51782528
        assert!((record.epoch_jd - 2_454_730.017_825_28).abs() < 1e-6);
    }

    #[test]
    fn unnamed_record_falls_back_to_norad_id() {
        let record =
            OrbitalRecord::from_tle(None, fixtures::ISS_LINE1[0], fixtures::ISS_LINE2, "inline")
                .unwrap();
        assert_eq!(record.info.name, "NORAD 25544");
        assert_eq!(record.info.tle_source, "inline");
    }

    #[test]
    fn rejects_corrupted_tle() {
        let broken = fixtures::ISS_LINE1[0].replace("25544U", "25X44U");
        assert!(OrbitalRecord::from_tle(None, &broken, fixtures::ISS_LINE2, "inline").is_err());
    }

    #[test]
    fn period_minutes_rounds_and_adds_one() {
        let record = fixtures::iss_record(0);
        assert_eq!(record.period_minutes(), 93);
        assert_eq!(period_minutes(2.0 * PI / 90.4), 91);
        assert_eq!(period_minutes(0.0), i64::MAX);
        assert_eq!(period_minutes(f64::NAN), i64::MAX);
    }

    #[test]
    fn julian_date_of_j2000() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_date(j2000) - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn orbit_type_from_inclination() {
        assert_eq!(OrbitType::from_inclination_deg(0.0), OrbitType::ProgradeEquatorial);
        assert_eq!(OrbitType::from_inclination_deg(51.6), OrbitType::Prograde);
        assert_eq!(OrbitType::from_inclination_deg(90.0), OrbitType::Polar);
        assert_eq!(OrbitType::from_inclination_deg(98.7), OrbitType::Retrograde);
        assert_eq!(OrbitType::from_inclination_deg(180.0), OrbitType::RetrogradeEquatorial);
        assert_eq!(OrbitType::from_inclination_deg(-1.0), OrbitType::Unknown);
        assert_eq!(OrbitType::Polar.to_string(), "Polar Orbit");
    }

    #[test]
    fn summary_reports_iss_as_prograde() {
        let record = fixtures::iss_record(0);
        let summary = record.summary();
        assert_eq!(summary.orbit_type, OrbitType::Prograde);
        assert_eq!(summary.period_minutes, 93);
        assert!((summary.inclination_deg - 51.6416).abs() < 1e-9);
        assert_eq!(summary.epoch_jd, record.epoch_jd);
    }
}
