use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::fleet::{EntityKind, EntitySummary};
use crate::predict::OrbitSummary;
use crate::range::PositionSource;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::api::types::{InRangeResponse, PositionDeg, PositionResponse, TimeQuery};
use crate::web::state::{resolve_time, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteResponse {
    pub id: String,
    pub name: String,
    pub norad_id: u64,
    pub record_count: usize,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TraceResponse {
    pub id: String,
    pub time: DateTime<Utc>,
    pub orbit: Option<OrbitSummary>,
    pub points: Vec<PositionDeg>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    responses(
        (status = 200, description = "Loaded satellites", body = Vec<SatelliteResponse>)
    ),
    tag = "satellites"
)]
pub async fn list(State(state): State<AppState>) -> Json<Vec<SatelliteResponse>> {
    let sim = state.simulation.lock().await;
    let satellites = sim
        .satellites()
        .iter()
        .map(|s| {
            let span = s.history().span();
            SatelliteResponse {
                id: s.id().to_string(),
                name: s.name().to_string(),
                norad_id: s.norad_id(),
                record_count: s.history().records().len(),
                available_from: span.map(|(start, _)| start),
                available_until: span.map(|(_, end)| end),
            }
        })
        .collect();
    Json(satellites)
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/position",
    params(
        ("id" = String, Path, description = "Satellite id (NORAD catalog number)"),
        ("time" = Option<String>, Query, description = "Time (RFC3339), defaults to the start of the data")
    ),
    responses(
        (status = 200, description = "Satellite position", body = PositionResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse),
        (status = 422, description = "Propagation failed", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TimeQuery>,
) -> ApiResult<Json<PositionResponse>> {
    let sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    let satellite = sim
        .satellite(&id)
        .ok_or(ApiError::NotFound("satellite_not_found"))?;

    let position = satellite.position_at(time)?;
    Ok(Json(PositionResponse {
        id,
        time,
        available: position.is_some(),
        position: position.map(PositionDeg::from),
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/trace",
    params(
        ("id" = String, Path, description = "Satellite id (NORAD catalog number)"),
        ("time" = Option<String>, Query, description = "Trace start (RFC3339)")
    ),
    responses(
        (status = 200, description = "One revolution sampled each minute", body = TraceResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse),
        (status = 422, description = "Propagation failed", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn trace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TimeQuery>,
) -> ApiResult<Json<TraceResponse>> {
    let mut sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    let satellite = sim
        .satellite_mut(&id)
        .ok_or(ApiError::NotFound("satellite_not_found"))?;

    let points: Vec<PositionDeg> = satellite
        .orbit_trace(time)?
        .iter()
        .copied()
        .map(PositionDeg::from)
        .collect();
    Ok(Json(TraceResponse {
        orbit: satellite.summary_at(time),
        id,
        time,
        points,
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/in-range",
    params(
        ("id" = String, Path, description = "Satellite id (NORAD catalog number)"),
        ("time" = Option<String>, Query, description = "Time (RFC3339)")
    ),
    responses(
        (status = 200, description = "Ships in range of the satellite", body = InRangeResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn in_range(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TimeQuery>,
) -> ApiResult<Json<InRangeResponse>> {
    let sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    let ships = sim
        .ships_in_range_of_satellite(&id, time)
        .ok_or(ApiError::NotFound("satellite_not_found"))?;

    Ok(Json(InRangeResponse {
        in_range: ships
            .into_iter()
            .map(|s| EntitySummary::of(EntityKind::Ship, s))
            .collect(),
        threshold_km: sim.classifier().threshold_km(),
        id,
        time,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::fleet::{parse_ships, Satellite, Simulation};
    use crate::predict::TleHistory;
    use crate::range::RangeClassifier;
    use chrono::Duration;

    fn state() -> AppState {
        let history = TleHistory::new(vec![fixtures::iss_record(0), fixtures::iss_record(1)], None);
        AppState::new(Simulation::new(
            vec![Satellite::new(25544, history)],
            parse_ships(fixtures::SHIPS_YAML).unwrap(),
            RangeClassifier::new(10018.0),
            Duration::seconds(1),
        ))
    }

    fn at(time: DateTime<Utc>) -> Query<TimeQuery> {
        Query(TimeQuery { time: Some(time) })
    }

    #[tokio::test]
    async fn lists_loaded_satellites() {
        let Json(list) = list(State(state())).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "25544");
        assert_eq!(list[0].record_count, 2);
        assert!(list[0].available_from.is_some());
    }

    #[tokio::test]
    async fn position_outside_history_is_unavailable() {
        let time = fixtures::just_after_first_epoch() - Duration::days(3);
        let Json(response) = position(State(state()), Path("25544".into()), at(time))
            .await
            .unwrap();
        assert!(!response.available);
        assert!(response.position.is_none());
    }

    #[tokio::test]
    async fn trace_covers_one_revolution() {
        let Json(response) = trace(
            State(state()),
            Path("25544".into()),
            at(fixtures::just_after_first_epoch()),
        )
        .await
        .unwrap();
        assert_eq!(response.points.len(), 94);
        assert!(response.orbit.is_some());
    }

    #[tokio::test]
    async fn unknown_satellite_is_not_found() {
        let result = in_range(
            State(state()),
            Path("1".into()),
            at(fixtures::just_after_first_epoch()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound("satellite_not_found"))));
    }
}
