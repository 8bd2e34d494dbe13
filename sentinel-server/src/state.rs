//! Shared application state

use sentinel_client::TrafficAnalyzer;
use std::sync::Arc;

use crate::repository::session_repository::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub analyzer: Arc<dyn TrafficAnalyzer>,
}

impl AppState {
    pub fn new(store: SessionStore, analyzer: Arc<dyn TrafficAnalyzer>) -> Self {
        Self { store, analyzer }
    }
}
