use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::fleet::{EntityKind, EntitySummary, ShipInfo};
use crate::range::PositionSource;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::api::types::{InRangeResponse, PositionDeg, PositionResponse, TimeQuery};
use crate::web::state::{resolve_time, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipResponse {
    #[serde(flatten)]
    pub info: ShipInfo,
    pub track_points: usize,
    pub available_from: DateTime<Utc>,
    pub available_until: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/ships",
    responses(
        (status = 200, description = "Loaded ships", body = Vec<ShipResponse>)
    ),
    tag = "ships"
)]
pub async fn list(State(state): State<AppState>) -> Json<Vec<ShipResponse>> {
    let sim = state.simulation.lock().await;
    let ships = sim
        .ships()
        .iter()
        .map(|ship| {
            let (from, until) = ship.span();
            ShipResponse {
                info: ship.info().clone(),
                track_points: ship.track().len(),
                available_from: from,
                available_until: until,
            }
        })
        .collect();
    Json(ships)
}

#[utoipa::path(
    get,
    path = "/api/ships/{id}/position",
    params(
        ("id" = String, Path, description = "Ship id (IMO number)"),
        ("time" = Option<String>, Query, description = "Time (RFC3339), defaults to the start of the data")
    ),
    responses(
        (status = 200, description = "Interpolated ship position", body = PositionResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
pub async fn position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TimeQuery>,
) -> ApiResult<Json<PositionResponse>> {
    let sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    let ship = sim.ship(&id).ok_or(ApiError::NotFound("ship_not_found"))?;

    let position = match ship.position_at(time) {
        Ok(position) => position,
        Err(never) => match never {},
    };
    Ok(Json(PositionResponse {
        id,
        time,
        available: position.is_some(),
        position: position.map(PositionDeg::from),
    }))
}

#[utoipa::path(
    get,
    path = "/api/ships/{id}/in-range",
    params(
        ("id" = String, Path, description = "Ship id (IMO number)"),
        ("time" = Option<String>, Query, description = "Time (RFC3339)")
    ),
    responses(
        (status = 200, description = "Satellites in range of the ship", body = InRangeResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
pub async fn in_range(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TimeQuery>,
) -> ApiResult<Json<InRangeResponse>> {
    let sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    let satellites = sim
        .satellites_in_range_of_ship(&id, time)
        .ok_or(ApiError::NotFound("ship_not_found"))?;

    Ok(Json(InRangeResponse {
        in_range: satellites
            .into_iter()
            .map(|s| EntitySummary::of(EntityKind::Satellite, s))
            .collect(),
        threshold_km: sim.classifier().threshold_km(),
        id,
        time,
    }))
}
