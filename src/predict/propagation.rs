use chrono::{DateTime, Utc};

use crate::geo::{Ellipsoid, GeodeticPosition};
use crate::predict::error::PredictError;
use crate::predict::types::OrbitalRecord;

const METERS_PER_KM: f64 = 1000.0;
/// Lowest height accepted as a real position; anything below has decayed.
pub const MIN_HEIGHT_M: f64 = -1000.0;

/// Geodetic position of the satellite described by `record` at `timestamp`.
///
/// SGP4 yields a TEME position in kilometers; it is rotated into the earth-fixed
/// frame by the Greenwich sidereal angle and converted to WGS-84 geodetic
/// coordinates with height in meters.
pub fn propagate_position(
    record: &OrbitalRecord,
    timestamp: DateTime<Utc>,
) -> Result<GeodeticPosition, PredictError> {
    let naive = timestamp.naive_utc();
    let minutes = record
        .elements
        .datetime_to_minutes_since_epoch(&naive)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = record.constants.propagate(minutes)?;

    let sidereal = gmst(timestamp);
    let ecef_km = teme_to_ecef_position(prediction.position, sidereal);
    let ecef_m = [
        ecef_km[0] * METERS_PER_KM,
        ecef_km[1] * METERS_PER_KM,
        ecef_km[2] * METERS_PER_KM,
    ];

    let position = GeodeticPosition::from_ecef_m(ecef_m, &Ellipsoid::WGS84);
    if !position.is_finite() {
        return Err(PredictError::Propagation(format!(
            "non-finite position for {} at {}",
            record.info.name, timestamp
        )));
    }
    if position.height < MIN_HEIGHT_M {
        return Err(PredictError::Propagation(format!(
            "{} is {:.0} m below the ellipsoid at {}",
            record.info.name, -position.height, timestamp
        )));
    }
    Ok(position)
}

/// Greenwich mean sidereal time in radians.
pub fn gmst(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::Duration;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn iss_position_is_within_sane_bounds() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch();

        for minute in (0..24 * 60).step_by(7) {
            let pos = propagate_position(&record, start + Duration::minutes(minute)).unwrap();
            assert!(pos.is_finite());
            assert!(pos.longitude >= -PI && pos.longitude <= PI);
            assert!(pos.latitude >= -FRAC_PI_2 && pos.latitude <= FRAC_PI_2);
            assert!(pos.height > -1000.0);
        }
    }

    #[test]
    fn iss_height_is_low_earth_orbit_in_meters() {
        let record = fixtures::iss_record(0);
        let pos = propagate_position(&record, fixtures::just_after_first_epoch()).unwrap();
        assert!(pos.height > 300_000.0 && pos.height < 450_000.0, "{}", pos.height);
        // Ground track never exceeds the inclination.
        assert!(pos.latitude.abs() <= 51.7_f64.to_radians());
    }

    #[test]
    fn geostationary_record_stays_near_the_equator() {
        let record = fixtures::geo_record();
        let pos = propagate_position(&record, fixtures::just_after_first_epoch()).unwrap();
        assert!(pos.latitude.abs() < 1.0_f64.to_radians());
        assert!(pos.height > 35_000_000.0 && pos.height < 36_500_000.0, "{}", pos.height);
    }

    #[test]
    fn decayed_orbit_is_an_error() {
        let record = fixtures::iss_record(0);
        let century_later = fixtures::just_after_first_epoch() + Duration::days(36_500);
        assert!(matches!(
            propagate_position(&record, century_later),
            Err(PredictError::Propagation(_))
        ));
    }

    #[test]
    fn teme_rotation_by_zero_is_identity() {
        assert_eq!(teme_to_ecef_position([1.0, 2.0, 3.0], 0.0), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn teme_rotation_quarter_turn() {
        let ecef = teme_to_ecef_position([1.0, 0.0, 5.0], FRAC_PI_2);
        assert!(ecef[0].abs() < 1e-12);
        assert!((ecef[1] + 1.0).abs() < 1e-12);
        assert_eq!(ecef[2], 5.0);
    }

    #[test]
    fn gmst_is_an_angle() {
        let angle = gmst(fixtures::just_after_first_epoch());
        assert!(angle.is_finite());
    }
}
