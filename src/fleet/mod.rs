mod entity;
mod error;
mod satellite;
mod ship;
mod simulation;

pub use entity::{EntityKind, EntityRef};
pub use error::FleetError;
pub use satellite::Satellite;
pub use ship::{load_ships, parse_ships, Ship, ShipInfo, ShipPoint};
pub use simulation::{
    EntityStatus, EntitySummary, SelectionReport, Simulation, DEFAULT_MIN_UPDATE_INTERVAL,
};
