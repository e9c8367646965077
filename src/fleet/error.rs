use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("Ship file read error: {0}")]
    ShipFile(#[from] std::io::Error),
    #[error("Ship file parse error: {0}")]
    ShipYaml(#[from] serde_yaml::Error),
}
