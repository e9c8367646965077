use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::fleet::entity::{EntityKind, EntityRef};
use crate::fleet::error::FleetError;
use crate::fleet::satellite::Satellite;
use crate::fleet::ship::{load_ships, Ship};
use crate::geo::GeodeticPosition;
use crate::predict::{OrbitSummary, TleLoader};
use crate::range::{
    classify_candidates, collect_in_range, CandidateStatus, PositionSource, RangeClassifier,
    RangeStatus,
};

pub const DEFAULT_MIN_UPDATE_INTERVAL: Duration = Duration::seconds(1);

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntitySummary {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
}

impl EntitySummary {
    pub fn of<S: PositionSource>(kind: EntityKind, source: &S) -> Self {
        Self {
            kind,
            id: source.id().to_string(),
            name: source.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityStatus {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub status: RangeStatus,
    pub distance_km: Option<f64>,
}

impl EntityStatus {
    fn from_candidate<S: PositionSource>(kind: EntityKind, candidate: CandidateStatus<'_, S>) -> Self {
        Self {
            kind,
            id: candidate.candidate.id().to_string(),
            name: candidate.candidate.name().to_string(),
            status: candidate.status,
            distance_km: candidate.distance_m.map(|d| d / 1000.0),
        }
    }
}

/// Everything the viewer needs to refresh after evaluating the selected entity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SelectionReport {
    pub selected: EntityRef,
    pub name: String,
    pub time: DateTime<Utc>,
    pub position: GeodeticPosition,
    pub statuses: Vec<EntityStatus>,
    pub in_range: Vec<EntitySummary>,
    pub orbit: Option<OrbitSummary>,
    pub trace: Vec<GeodeticPosition>,
}

/// Satellites, ships and the current selection, advanced by an external clock.
#[derive(Debug)]
pub struct Simulation {
    satellites: Vec<Satellite>,
    ships: Vec<Ship>,
    classifier: RangeClassifier,
    min_update_interval: Duration,
    selection: Option<EntityRef>,
    last_update: Option<DateTime<Utc>>,
}

impl Simulation {
    pub fn new(
        satellites: Vec<Satellite>,
        ships: Vec<Ship>,
        classifier: RangeClassifier,
        min_update_interval: Duration,
    ) -> Self {
        Self {
            satellites,
            ships,
            classifier,
            min_update_interval,
            selection: None,
            last_update: None,
        }
    }

    pub fn load(config: &Config) -> Result<Self, FleetError> {
        let mut loader = TleLoader::new(config.satellites.tle_folder.clone());
        loader.load_all()?;

        let satellites: Vec<Satellite> = loader
            .into_histories(config.satellites.final_record_validity)
            .into_iter()
            .map(|(norad_id, history)| {
                if history.intervals().is_empty() {
                    log::warn!(
                        "Satellite {} has no validity interval and will never be available",
                        norad_id
                    );
                }
                Satellite::new(norad_id, history)
            })
            .collect();

        let ships = match &config.ships {
            Some(ships) => load_ships(&ships.file)?,
            None => Vec::new(),
        };

        log::info!(
            "Loaded {} satellites and {} ships",
            satellites.len(),
            ships.len()
        );

        Ok(Self::new(
            satellites,
            ships,
            RangeClassifier::new(config.range.threshold_km),
            config.update.min_interval,
        ))
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn classifier(&self) -> &RangeClassifier {
        &self.classifier
    }

    pub fn satellite(&self, id: &str) -> Option<&Satellite> {
        self.satellites.iter().find(|s| s.id() == id)
    }

    pub fn satellite_mut(&mut self, id: &str) -> Option<&mut Satellite> {
        self.satellites.iter_mut().find(|s| s.id() == id)
    }

    pub fn ship(&self, id: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        match entity.kind {
            EntityKind::Satellite => self.satellite(&entity.id).is_some(),
            EntityKind::Ship => self.ship(&entity.id).is_some(),
        }
    }

    /// Earliest and latest instant any entity is available.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let satellite_spans = self.satellites.iter().filter_map(|s| s.history().span());
        let ship_spans = self.ships.iter().map(Ship::span);
        satellite_spans
            .chain(ship_spans)
            .reduce(|(a_start, a_end), (b_start, b_end)| (a_start.min(b_start), a_end.max(b_end)))
    }

    /// Start of the ship data when present, otherwise of the whole data set.
    pub fn default_time(&self) -> Option<DateTime<Utc>> {
        self.ships
            .iter()
            .map(|s| s.span().0)
            .min()
            .or_else(|| self.time_span().map(|(start, _)| start))
    }

    pub fn selection(&self) -> Option<&EntityRef> {
        self.selection.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Select an entity; the next `tick` evaluates it immediately.
    /// Returns false for unknown entities, leaving the selection untouched.
    pub fn select(&mut self, entity: EntityRef) -> bool {
        if !self.contains(&entity) {
            return false;
        }
        self.release_previous_trace(Some(&entity));
        self.selection = Some(entity);
        self.last_update = None;
        true
    }

    pub fn clear_selection(&mut self) {
        self.release_previous_trace(None);
        self.selection = None;
        self.last_update = None;
    }

    fn release_previous_trace(&mut self, next: Option<&EntityRef>) {
        let previous_id = match &self.selection {
            Some(previous) if previous.kind == EntityKind::Satellite && next != Some(previous) => {
                previous.id.clone()
            }
            _ => return,
        };
        if let Some(satellite) = self.satellite_mut(&previous_id) {
            satellite.drop_trace();
        }
    }

    /// Rate-limited `evaluate`: runs when nothing was evaluated yet or the
    /// clock moved more than the minimum interval since the last evaluation.
    pub fn tick(&mut self, time: DateTime<Utc>) -> Option<SelectionReport> {
        self.selection.as_ref()?;
        if let Some(last) = self.last_update {
            if (time - last).abs() <= self.min_update_interval {
                return None;
            }
        }
        self.evaluate(time)
    }

    /// Range report for the selected entity, or `None` when nothing is
    /// selected or the selection has no position at `time`.
    pub fn evaluate(&mut self, time: DateTime<Utc>) -> Option<SelectionReport> {
        let selected = self.selection.clone()?;
        let report = match selected.kind {
            EntityKind::Ship => self.evaluate_ship(selected, time)?,
            EntityKind::Satellite => self.evaluate_satellite(selected, time)?,
        };
        self.last_update = Some(time);
        Some(report)
    }

    fn evaluate_ship(&self, selected: EntityRef, time: DateTime<Utc>) -> Option<SelectionReport> {
        let ship = self.ship(&selected.id)?;
        let position = locate(ship, time)?;

        let statuses = classify_candidates(&self.classifier, &position, &self.satellites, time)
            .into_iter()
            .map(|c| EntityStatus::from_candidate(selected.kind.counterpart(), c))
            .collect();
        let in_range = self
            .satellites_in_range_of(ship, time)
            .into_iter()
            .map(|s| EntitySummary::of(EntityKind::Satellite, s))
            .collect();

        Some(SelectionReport {
            name: ship.name().to_string(),
            selected,
            time,
            position,
            statuses,
            in_range,
            orbit: None,
            trace: Vec::new(),
        })
    }

    fn evaluate_satellite(
        &mut self,
        selected: EntityRef,
        time: DateTime<Utc>,
    ) -> Option<SelectionReport> {
        let idx = self.satellites.iter().position(|s| s.id() == selected.id)?;
        let satellite = &self.satellites[idx];
        let position = locate(satellite, time)?;

        let statuses = classify_candidates(&self.classifier, &position, &self.ships, time)
            .into_iter()
            .map(|c| EntityStatus::from_candidate(selected.kind.counterpart(), c))
            .collect();
        let in_range = self
            .ships_in_range_of(satellite, time)
            .into_iter()
            .map(|s| EntitySummary::of(EntityKind::Ship, s))
            .collect();
        let orbit = satellite.summary_at(time);
        let name = satellite.name().to_string();

        let trace = match self.satellites[idx].orbit_trace(time) {
            Ok(trace) => trace.to_vec(),
            Err(e) => {
                log::warn!("Orbit trace for {} failed at {}: {}", name, time, e);
                Vec::new()
            }
        };

        Some(SelectionReport {
            selected,
            name,
            time,
            position,
            statuses,
            in_range,
            orbit,
            trace,
        })
    }

    fn satellites_in_range_of(&self, ship: &Ship, time: DateTime<Utc>) -> Vec<&Satellite> {
        collect_in_range(
            &self.classifier,
            std::slice::from_ref(ship),
            &self.satellites,
            time,
        )
    }

    fn ships_in_range_of(&self, satellite: &Satellite, time: DateTime<Utc>) -> Vec<&Ship> {
        collect_in_range(
            &self.classifier,
            std::slice::from_ref(satellite),
            &self.ships,
            time,
        )
    }

    /// `None` when the ship is unknown.
    pub fn satellites_in_range_of_ship(
        &self,
        ship_id: &str,
        time: DateTime<Utc>,
    ) -> Option<Vec<&Satellite>> {
        let ship = self.ship(ship_id)?;
        Some(self.satellites_in_range_of(ship, time))
    }

    /// `None` when the satellite is unknown.
    pub fn ships_in_range_of_satellite(
        &self,
        satellite_id: &str,
        time: DateTime<Utc>,
    ) -> Option<Vec<&Ship>> {
        let satellite = self.satellite(satellite_id)?;
        Some(self.ships_in_range_of(satellite, time))
    }
}

fn locate<S: PositionSource>(source: &S, time: DateTime<Utc>) -> Option<GeodeticPosition> {
    if !source.is_available(time) {
        return None;
    }
    match source.position_at(time) {
        Ok(position) => position,
        Err(e) => {
            log::warn!("Position of {} unavailable at {}: {}", source.id(), time, e);
            None
        }
    }
}
