use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("position is not finite")]
    InvalidPosition,
    #[error("geodesic did not converge (nearly antipodal points)")]
    Degenerate,
}
