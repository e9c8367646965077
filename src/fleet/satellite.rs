use chrono::{DateTime, Utc};

use crate::geo::GeodeticPosition;
use crate::predict::{
    compute_orbit_trace, propagate_position, OrbitSummary, OrbitalRecord, PredictError,
    TleHistory, TraceCache,
};
use crate::range::PositionSource;

/// A satellite with its element-set history and orbit trace cache.
#[derive(Debug)]
pub struct Satellite {
    id: String,
    name: String,
    norad_id: u64,
    history: TleHistory,
    trace_cache: TraceCache,
}

impl Satellite {
    pub fn new(norad_id: u64, history: TleHistory) -> Self {
        let name = history
            .records()
            .last()
            .map(|r| r.info.name.clone())
            .unwrap_or_else(|| format!("NORAD {}", norad_id));
        Self {
            id: norad_id.to_string(),
            name,
            norad_id,
            history,
            trace_cache: TraceCache::new(),
        }
    }

    pub fn norad_id(&self) -> u64 {
        self.norad_id
    }

    pub fn history(&self) -> &TleHistory {
        &self.history
    }

    pub fn record_at(&self, time: DateTime<Utc>) -> Option<&OrbitalRecord> {
        self.history.record_at(time)
    }

    pub fn summary_at(&self, time: DateTime<Utc>) -> Option<OrbitSummary> {
        self.record_at(time).map(OrbitalRecord::summary)
    }

    /// Orbit trace from the record active at `time`; empty when none is active.
    pub fn orbit_trace(&mut self, time: DateTime<Utc>) -> Result<&[GeodeticPosition], PredictError> {
        match self.history.record_at(time) {
            Some(record) => compute_orbit_trace(record, &mut self.trace_cache, time),
            None => Ok(&[]),
        }
    }

    pub fn trace_cache(&self) -> &TraceCache {
        &self.trace_cache
    }

    pub fn drop_trace(&mut self) {
        self.trace_cache.invalidate();
    }
}

impl PositionSource for Satellite {
    type Error = PredictError;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self, time: DateTime<Utc>) -> bool {
        self.history.is_available(time)
    }

    fn position_at(&self, time: DateTime<Utc>) -> Result<Option<GeodeticPosition>, PredictError> {
        self.record_at(time)
            .map(|record| propagate_position(record, time))
            .transpose()
    }
}
