use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::fleet::Simulation;

use super::api::satellites as satellite_handlers;
use super::api::selection as selection_handlers;
use super::api::ships as ship_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Satellites
        .route("/api/satellites", get(satellite_handlers::list))
        .route(
            "/api/satellites/{id}/position",
            get(satellite_handlers::position),
        )
        .route("/api/satellites/{id}/trace", get(satellite_handlers::trace))
        .route(
            "/api/satellites/{id}/in-range",
            get(satellite_handlers::in_range),
        )
        // Ships
        .route("/api/ships", get(ship_handlers::list))
        .route("/api/ships/{id}/position", get(ship_handlers::position))
        .route("/api/ships/{id}/in-range", get(ship_handlers::in_range))
        // Selection
        .route(
            "/api/selection",
            get(selection_handlers::get)
                .put(selection_handlers::set)
                .delete(selection_handlers::clear),
        )
        .route("/api/selection/report", get(selection_handlers::report))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let simulation = Simulation::load(&config).map_err(std::io::Error::other)?;
    let app = router(AppState::new(simulation));

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
