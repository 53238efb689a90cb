use std::collections::HashMap;
use std::sync::Arc;

use crate::models::ScoutingReport;
use crate::service::ScoutingService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoutingService>,
    /// Generated reports, kept in memory until deleted or restart.
    pub reports: Arc<tokio::sync::RwLock<HashMap<String, ScoutingReport>>>,
}

impl AppState {
    pub fn new(service: Arc<ScoutingService>) -> Self {
        Self {
            service,
            reports: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }
}
