//! TLE and ship fixtures shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::predict::OrbitalRecord;

pub const ISS_NAME: &str = "ISS (ZARYA)";

/// Line 1 of three consecutive daily ISS element sets (epochs 2008-264, -265, -266).
pub const ISS_LINE1: [&str; 3] = [
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
    "1 25544U 98067A   08265.51782528 -.00002182  00000-0 -11606-4 0  2928",
    "1 25544U 98067A   08266.51782528 -.00002182  00000-0 -11606-4 0  2929",
];
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

pub const GEO_LINE1: &str =
    "1 28884U 05041A   08264.51782528  .00000000  00000-0  00000-0 0  2924";
pub const GEO_LINE2: &str =
    "2 28884   0.0500 247.4627 0006703 130.5360 325.0288  1.00270000563533";

pub fn iss_record(day: usize) -> OrbitalRecord {
    OrbitalRecord::from_tle(
        Some(ISS_NAME.to_string()),
        ISS_LINE1[day],
        ISS_LINE2,
        "fixtures",
    )
    .unwrap()
}

pub fn geo_record() -> OrbitalRecord {
    OrbitalRecord::from_tle(Some("GEO TEST".to_string()), GEO_LINE1, GEO_LINE2, "fixtures")
        .unwrap()
}

/// Three-line TLE text holding every ISS fixture epoch.
pub fn iss_tle_text() -> String {
    ISS_LINE1
        .iter()
        .map(|line1| format!("{}\n{}\n{}\n", ISS_NAME, line1, ISS_LINE2))
        .collect()
}

/// Shortly after the first ISS epoch (2008-09-20 12:25:38.9 UTC).
pub fn just_after_first_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 41).unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub const SHIPS_YAML: &str = r#"
ships:
  - id: IMO9811000
    name: EVER GIVEN
    mmsi: "353136000"
    call_sign: H3RC
    vessel_type: 70
    points:
      - time: 2008-09-20T12:00:00Z
        lon: 0.0
        lat: 0.0
      - time: 2008-09-20T14:00:00Z
        lon: 2.0
        lat: 0.0
  - id: "9301419"
    name: MAERSK TEST
    mmsi: "219018000"
    points:
      - time: 2008-09-21T00:00:00Z
        lon: 179.0
        lat: 0.0
      - time: 2008-09-20T18:00:00Z
        lon: 178.0
        lat: 0.0
  - id: "1000001"
    name: ""
    mmsi: "1"
    points:
      - time: 2008-09-20T12:00:00Z
        lon: 10.0
        lat: 10.0
      - time: 2008-09-20T13:00:00Z
        lon: 10.0
        lat: 10.0
  - id: "1000002"
    name: LONE POINT
    mmsi: "2"
    points:
      - time: 2008-09-20T12:00:00Z
        lon: 10.0
        lat: 10.0
"#;
