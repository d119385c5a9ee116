use std::sync::Arc;

use crate::{config::AppConfig, services::store::TripStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn TripStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TripStore>) -> Self {
        Self { config, store }
    }
}
