use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::geo::GeodeticPosition;
use crate::range::classifier::{RangeClassifier, RangeStatus};

/// An entity whose position can be looked up over time.
pub trait PositionSource {
    type Error: Display;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn is_available(&self, time: DateTime<Utc>) -> bool;

    /// `Ok(None)` when the entity has no position at `time`.
    fn position_at(&self, time: DateTime<Utc>) -> Result<Option<GeodeticPosition>, Self::Error>;
}

/// Range verdict for one candidate against a reference position.
#[derive(Debug)]
pub struct CandidateStatus<'a, C> {
    pub candidate: &'a C,
    pub status: RangeStatus,
    pub distance_m: Option<f64>,
}

fn lookup<S: PositionSource>(source: &S, time: DateTime<Utc>) -> Option<GeodeticPosition> {
    if !source.is_available(time) {
        return None;
    }
    match source.position_at(time) {
        Ok(position) => position,
        Err(e) => {
            log::debug!("No position for {} at {}: {}", source.id(), time, e);
            None
        }
    }
}

/// Candidates available at `time` that are in range of every reference.
///
/// A reference without a position leaves nothing to compare against, so the
/// result is empty. Candidates whose lookup fails are dropped.
pub fn collect_in_range<'a, R, C>(
    classifier: &RangeClassifier,
    references: &[R],
    candidates: &'a [C],
    time: DateTime<Utc>,
) -> Vec<&'a C>
where
    R: PositionSource,
    C: PositionSource,
{
    let mut reference_positions = Vec::with_capacity(references.len());
    for reference in references {
        match lookup(reference, time) {
            Some(position) => reference_positions.push(position),
            None => {
                log::debug!("Reference {} has no position at {}", reference.id(), time);
                return Vec::new();
            }
        }
    }

    candidates
        .iter()
        .filter(|candidate| {
            lookup(*candidate, time).is_some_and(|position| {
                reference_positions
                    .iter()
                    .all(|reference| classifier.is_in_range(reference, &position))
            })
        })
        .collect()
}

/// Status of every candidate available at `time` relative to `reference`.
pub fn classify_candidates<'a, C: PositionSource>(
    classifier: &RangeClassifier,
    reference: &GeodeticPosition,
    candidates: &'a [C],
    time: DateTime<Utc>,
) -> Vec<CandidateStatus<'a, C>> {
    candidates
        .iter()
        .filter(|candidate| candidate.is_available(time))
        .map(|candidate| match lookup(candidate, time) {
            Some(position) => {
                let (status, distance_m) = classifier.measure(reference, &position);
                CandidateStatus {
                    candidate,
                    status,
                    distance_m,
                }
            }
            None => CandidateStatus {
                candidate,
                status: RangeStatus::Unavailable,
                distance_m: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    struct Fixed {
        id: &'static str,
        position: Result<Option<GeodeticPosition>, &'static str>,
        available: bool,
    }

    impl Fixed {
        fn at(id: &'static str, lon_deg: f64, lat_deg: f64) -> Self {
            Self {
                id,
                position: Ok(Some(GeodeticPosition::from_degrees(lon_deg, lat_deg, 0.0))),
                available: true,
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                id,
                position: Err("propagation blew up"),
                available: true,
            }
        }
    }

    impl PositionSource for Fixed {
        type Error = &'static str;

        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn is_available(&self, _time: DateTime<Utc>) -> bool {
            self.available
        }

        fn position_at(
            &self,
            _time: DateTime<Utc>,
        ) -> Result<Option<GeodeticPosition>, Self::Error> {
            self.position
        }
    }

    fn now() -> DateTime<Utc> {
        fixtures::utc(2024, 1, 1, 0, 0, 0)
    }

    fn ids<C: PositionSource>(found: &[&C]) -> Vec<String> {
        found.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn failing_candidate_is_excluded_and_others_still_classified() {
        let classifier = RangeClassifier::default();
        let reference = [Fixed::at("ship", 0.0, 0.0)];
        let candidates = [
            Fixed::at("near", 10.0, 10.0),
            Fixed::failing("broken"),
            Fixed::at("far", 120.0, 0.0),
            Fixed::at("close", -5.0, 0.0),
        ];
        let found = collect_in_range(&classifier, &reference, &candidates, now());
        assert_eq!(ids(&found), vec!["near", "close"]);
    }

    #[test]
    fn unavailable_candidates_are_skipped() {
        let classifier = RangeClassifier::default();
        let reference = [Fixed::at("ship", 0.0, 0.0)];
        let mut hidden = Fixed::at("hidden", 1.0, 1.0);
        hidden.available = false;
        let no_position = Fixed {
            id: "no-position",
            position: Ok(None),
            available: true,
        };
        let candidates = [hidden, no_position, Fixed::at("visible", 2.0, 2.0)];
        let found = collect_in_range(&classifier, &reference, &candidates, now());
        assert_eq!(ids(&found), vec!["visible"]);
    }

    #[test]
    fn candidate_must_be_in_range_of_every_reference() {
        let classifier = RangeClassifier::new(2000.0);
        let references = [Fixed::at("a", 0.0, 0.0), Fixed::at("b", 20.0, 0.0)];
        let candidates = [
            Fixed::at("between", 10.0, 0.0),
            Fixed::at("only-a", -10.0, 0.0),
        ];
        let found = collect_in_range(&classifier, &references, &candidates, now());
        assert_eq!(ids(&found), vec!["between"]);
    }

    #[test]
    fn reference_without_position_yields_nothing() {
        let classifier = RangeClassifier::default();
        let references = [Fixed::failing("ship")];
        let candidates = [Fixed::at("near", 1.0, 1.0)];
        let found = collect_in_range(&classifier, &references, &candidates, now());
        assert!(found.is_empty());
    }

    #[test]
    fn classify_reports_every_available_candidate() {
        let classifier = RangeClassifier::default();
        let reference = GeodeticPosition::from_degrees(0.0, 0.0, 400_000.0);
        let mut hidden = Fixed::at("hidden", 1.0, 1.0);
        hidden.available = false;
        let candidates = [
            Fixed::at("near", 10.0, 10.0),
            Fixed::failing("broken"),
            Fixed::at("far", 120.0, 0.0),
            hidden,
            Fixed::at("antipode", 180.0, 0.0),
        ];

        let statuses = classify_candidates(&classifier, &reference, &candidates, now());
        let summary: Vec<_> = statuses
            .iter()
            .map(|s| (s.candidate.id, s.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("near", RangeStatus::InRange),
                ("broken", RangeStatus::Unavailable),
                ("far", RangeStatus::OutOfRange),
                ("antipode", RangeStatus::Unavailable),
            ]
        );
        assert!(statuses[0].distance_m.unwrap() > 0.0);
        assert!(statuses[1].distance_m.is_none());
    }
}
