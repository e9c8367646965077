use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::fleet::{EntityRef, SelectionReport};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::api::types::TimeQuery;
use crate::web::state::{resolve_time, AppState};

#[utoipa::path(
    put,
    path = "/api/selection",
    request_body = EntityRef,
    responses(
        (status = 200, description = "Entity selected", body = EntityRef),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Unknown entity", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn set(
    State(state): State<AppState>,
    Json(request): Json<EntityRef>,
) -> ApiResult<Json<EntityRef>> {
    if request.id.trim().is_empty() {
        return Err(ApiError::Validation("id must not be empty".into()));
    }

    let mut sim = state.simulation.lock().await;
    if !sim.select(request.clone()) {
        return Err(ApiError::NotFound("entity_not_found"));
    }
    log::info!("Selected {} {}", request.kind, request.id);
    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/api/selection",
    responses(
        (status = 200, description = "Current selection", body = Option<EntityRef>)
    ),
    tag = "selection"
)]
pub async fn get(State(state): State<AppState>) -> Json<Option<EntityRef>> {
    let sim = state.simulation.lock().await;
    Json(sim.selection().cloned())
}

#[utoipa::path(
    delete,
    path = "/api/selection",
    responses(
        (status = 204, description = "Selection cleared")
    ),
    tag = "selection"
)]
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.simulation.lock().await.clear_selection();
    StatusCode::NO_CONTENT
}

/// Advances the clock to `time`. Returns null when nothing is selected, the
/// selection has no position, or the previous update is too recent.
#[utoipa::path(
    get,
    path = "/api/selection/report",
    params(
        ("time" = Option<String>, Query, description = "Clock time (RFC3339)")
    ),
    responses(
        (status = 200, description = "Range report for the selection", body = Option<SelectionReport>)
    ),
    tag = "selection"
)]
pub async fn report(
    State(state): State<AppState>,
    Query(query): Query<TimeQuery>,
) -> Json<Option<SelectionReport>> {
    let mut sim = state.simulation.lock().await;
    let time = resolve_time(query.time, &sim);
    Json(sim.tick(time))
}
