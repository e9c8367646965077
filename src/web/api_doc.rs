use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::satellites::{SatelliteResponse, TraceResponse};
use super::api::ships::ShipResponse;
use super::api::types::{InRangeResponse, PositionDeg, PositionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::satellites::list,
        super::api::satellites::position,
        super::api::satellites::trace,
        super::api::satellites::in_range,
        super::api::ships::list,
        super::api::ships::position,
        super::api::ships::in_range,
        super::api::selection::set,
        super::api::selection::get,
        super::api::selection::clear,
        super::api::selection::report,
    ),
    components(
        schemas(
            SatelliteResponse,
            TraceResponse,
            ShipResponse,
            PositionDeg,
            PositionResponse,
            InRangeResponse,
            ErrorResponse,
            crate::fleet::EntityKind,
            crate::fleet::EntityRef,
            crate::fleet::EntitySummary,
            crate::fleet::EntityStatus,
            crate::fleet::SelectionReport,
            crate::fleet::ShipInfo,
            crate::geo::GeodeticPosition,
            crate::predict::OrbitSummary,
            crate::predict::OrbitType,
            crate::range::RangeStatus,
        )
    ),
    info(
        title = "Sat-O-Range API",
        description = "Satellite positions, ship tracks and range classification",
        version = "0.1.0"
    ),
    tags(
        (name = "satellites", description = "Satellite positions and orbit traces"),
        (name = "ships", description = "Ship tracks"),
        (name = "selection", description = "Selected entity and clock-driven range reports")
    )
)]
pub struct ApiDoc;
