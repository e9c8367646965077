use chrono::{DateTime, Duration, Utc};

use crate::geo::GeodeticPosition;
use crate::predict::error::PredictError;
use crate::predict::propagation::propagate_position;
use crate::predict::types::OrbitalRecord;

/// Orbits slower than this many minutes per revolution are not traced.
pub const MAX_TRACE_MINUTES: i64 = 1000;
const TRACE_STEP: Duration = Duration::minutes(1);

/// Last computed orbit trace of one satellite, the record it was built from
/// and the window it stays valid for.
#[derive(Debug, Clone, Default)]
pub struct TraceCache {
    trace: Vec<GeodeticPosition>,
    source: Option<(u64, DateTime<Utc>)>,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
}

impl TraceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        match (self.valid_from, self.valid_until) {
            (Some(from), Some(until)) => from <= time && time < until,
            _ => false,
        }
    }

    /// Whether the cached trace was built from `record` and covers `time`.
    pub fn is_valid_for(&self, record: &OrbitalRecord, time: DateTime<Utc>) -> bool {
        self.source == Some(record_key(record)) && self.is_valid_at(time)
    }

    pub fn trace(&self) -> &[GeodeticPosition] {
        &self.trace
    }

    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }

    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

fn record_key(record: &OrbitalRecord) -> (u64, DateTime<Utc>) {
    (record.info.norad_id, record.epoch)
}

/// One revolution of ground positions sampled each minute from `reference_time`.
///
/// Served from `cache` while the cached trace came from `record` and
/// `reference_time` lies inside its window; otherwise recomputed and stored. Near-stationary orbits produce an empty trace.
pub fn compute_orbit_trace<'c>(
    record: &OrbitalRecord,
    cache: &'c mut TraceCache,
    reference_time: DateTime<Utc>,
) -> Result<&'c [GeodeticPosition], PredictError> {
    if cache.is_valid_for(record, reference_time) {
        return Ok(&cache.trace);
    }

    let period = record.period_minutes();
    if period > MAX_TRACE_MINUTES {
        log::debug!(
            "Skipping orbit trace for {}: {} minutes per revolution",
            record.info.name,
            period
        );
        return Ok(&[]);
    }

    let mut trace = Vec::with_capacity(period as usize + 1);
    let mut cursor = reference_time;
    for _ in 0..=period {
        trace.push(propagate_position(record, cursor)?);
        cursor += TRACE_STEP;
    }

    cache.trace = trace;
    cache.source = Some(record_key(record));
    cache.valid_from = Some(reference_time);
    cache.valid_until = Some(reference_time + Duration::minutes(period));
    Ok(&cache.trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::f64::consts::PI;

    #[test]
    fn trace_length_is_period_plus_two() {
        let record = fixtures::iss_record(0);
        let mut cache = TraceCache::new();
        let trace = compute_orbit_trace(&record, &mut cache, fixtures::just_after_first_epoch())
            .unwrap();

        let expected = (2.0 * PI / record.mean_motion_rad_min).round() as usize + 2;
        assert_eq!(trace.len(), expected);
        assert_eq!(trace.len(), 94);
    }

    #[test]
    fn trace_starts_at_reference_position() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch();
        let mut cache = TraceCache::new();
        let first = compute_orbit_trace(&record, &mut cache, start).unwrap()[0];
        assert_eq!(first, propagate_position(&record, start).unwrap());
    }

    #[test]
    fn request_inside_window_returns_cached_trace() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch();
        let mut cache = TraceCache::new();

        let first_ptr = compute_orbit_trace(&record, &mut cache, start)
            .unwrap()
            .as_ptr();
        let first_copy = cache.trace().to_vec();

        let later = start + Duration::minutes(30);
        let second = compute_orbit_trace(&record, &mut cache, later).unwrap();
        assert_eq!(second.as_ptr(), first_ptr);
        assert_eq!(second, first_copy.as_slice());
        assert_eq!(cache.valid_until(), Some(start + Duration::minutes(93)));
    }

    #[test]
    fn request_at_window_end_recomputes() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch();
        let mut cache = TraceCache::new();
        compute_orbit_trace(&record, &mut cache, start).unwrap();

        let bound = cache.valid_until().unwrap();
        let trace = compute_orbit_trace(&record, &mut cache, bound).unwrap().to_vec();
        assert_eq!(cache.valid_from(), Some(bound));
        assert_eq!(trace[0], propagate_position(&record, bound).unwrap());
    }

    #[test]
    fn request_before_window_recomputes() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch() + Duration::hours(1);
        let mut cache = TraceCache::new();
        compute_orbit_trace(&record, &mut cache, start).unwrap();

        let earlier = start - Duration::minutes(10);
        compute_orbit_trace(&record, &mut cache, earlier).unwrap();
        assert_eq!(cache.valid_from(), Some(earlier));
    }

    #[test]
    fn trace_from_another_record_is_not_reused() {
        let (old, new) = (fixtures::iss_record(0), fixtures::iss_record(1));
        let start = new.epoch - Duration::minutes(10);
        let mut cache = TraceCache::new();
        compute_orbit_trace(&old, &mut cache, start).unwrap();

        let later = new.epoch + Duration::minutes(5);
        assert!(cache.is_valid_at(later));
        assert!(!cache.is_valid_for(&new, later));

        let trace = compute_orbit_trace(&new, &mut cache, later).unwrap().to_vec();
        assert_eq!(trace[0], propagate_position(&new, later).unwrap());
        assert_eq!(cache.valid_from(), Some(later));
    }

    #[test]
    fn slow_orbit_yields_empty_trace() {
        let record = fixtures::geo_record();
        assert!(record.period_minutes() > MAX_TRACE_MINUTES);

        let mut cache = TraceCache::new();
        let trace =
            compute_orbit_trace(&record, &mut cache, fixtures::just_after_first_epoch()).unwrap();
        assert!(trace.is_empty());
        assert!(cache.valid_until().is_none());
    }

    #[test]
    fn invalidate_clears_window() {
        let record = fixtures::iss_record(0);
        let start = fixtures::just_after_first_epoch();
        let mut cache = TraceCache::new();
        compute_orbit_trace(&record, &mut cache, start).unwrap();
        assert!(cache.is_valid_at(start));

        cache.invalidate();
        assert!(!cache.is_valid_at(start));
        assert!(cache.trace().is_empty());
    }
}
