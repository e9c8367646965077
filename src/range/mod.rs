mod batch;
mod classifier;
mod error;
mod geodesic;

pub use batch::{classify_candidates, collect_in_range, CandidateStatus, PositionSource};
pub use classifier::{RangeClassifier, RangeStatus, DEFAULT_THRESHOLD_KM, MAX_THRESHOLD_KM};
pub use error::RangeError;
pub use geodesic::surface_distance_m;
