//! Application state shared across handlers

use std::sync::Arc;

use application::CollectionService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Scrape orchestrator
    pub collector: Arc<CollectionService>,
}

impl AppState {
    /// Create state around a collector
    pub fn new(collector: CollectionService) -> Self {
        Self {
            collector: Arc::new(collector),
        }
    }
}
