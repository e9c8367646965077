use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::fleet::Simulation;

#[derive(Clone)]
pub struct AppState {
    pub simulation: Arc<Mutex<Simulation>>,
}

impl AppState {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation: Arc::new(Mutex::new(simulation)),
        }
    }
}

/// Requested time, else the start of the loaded data, else now.
pub fn resolve_time(requested: Option<DateTime<Utc>>, simulation: &Simulation) -> DateTime<Utc> {
    requested
        .or_else(|| simulation.default_time())
        .unwrap_or_else(Utc::now)
}
