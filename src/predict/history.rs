use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::types::OrbitalRecord;

/// Half-open `[start, end)` span during which `record` is the active element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidityInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub record: usize,
}

impl ValidityInterval {
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time < self.end
    }
}

/// Time-ordered element sets of one satellite and the intervals selecting them.
#[derive(Debug)]
pub struct TleHistory {
    records: Vec<OrbitalRecord>,
    intervals: Vec<ValidityInterval>,
}

impl TleHistory {
    /// Each record is active from its epoch until the next distinct epoch.
    /// The newest record is only active when `final_validity` is given.
    pub fn new(mut records: Vec<OrbitalRecord>, final_validity: Option<Duration>) -> Self {
        records.sort_by_key(|r| r.epoch);

        let mut intervals = Vec::with_capacity(records.len());
        for (i, pair) in records.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if current.epoch < next.epoch {
                intervals.push(ValidityInterval {
                    start: current.epoch,
                    end: next.epoch,
                    record: i,
                });
            }
        }

        if let (Some(validity), Some(last)) = (final_validity, records.last()) {
            if validity > Duration::zero() {
                intervals.push(ValidityInterval {
                    start: last.epoch,
                    end: last.epoch + validity,
                    record: records.len() - 1,
                });
            }
        }

        Self { records, intervals }
    }

    pub fn records(&self) -> &[OrbitalRecord] {
        &self.records
    }

    pub fn intervals(&self) -> &[ValidityInterval] {
        &self.intervals
    }

    pub fn interval_at(&self, time: DateTime<Utc>) -> Option<&ValidityInterval> {
        let idx = self.intervals.partition_point(|iv| iv.end <= time);
        self.intervals.get(idx).filter(|iv| iv.contains(time))
    }

    /// The element set active at `time`, if any.
    pub fn record_at(&self, time: DateTime<Utc>) -> Option<&OrbitalRecord> {
        self.interval_at(time).map(|iv| &self.records[iv.record])
    }

    pub fn is_available(&self, time: DateTime<Utc>) -> bool {
        self.interval_at(time).is_some()
    }

    /// Earliest start and latest end over all intervals.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.intervals.first()?;
        let last = self.intervals.last()?;
        Some((first.start, last.end))
    }
}
