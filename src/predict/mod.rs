mod error;
mod history;
mod orbit_trace;
mod propagation;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use history::{TleHistory, ValidityInterval};
pub use orbit_trace::{compute_orbit_trace, TraceCache, MAX_TRACE_MINUTES};
pub use propagation::{gmst, propagate_position, MIN_HEIGHT_M};
pub use tle_loader::{parse_tle_text, TleLoader};
pub use types::{julian_date, period_minutes, OrbitSummary, OrbitType, OrbitalRecord, SatelliteInfo};

pub use crate::geo::GeodeticPosition;
