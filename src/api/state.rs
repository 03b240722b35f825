//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{RoutingService, SemanticCacheService, StatsAggregator};

/// Handles shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub routing: Arc<RoutingService>,
    pub cache: Arc<SemanticCacheService>,
    pub stats: Arc<StatsAggregator>,
}

impl AppState {
    pub fn new(routing: Arc<RoutingService>) -> Self {
        Self {
            cache: routing.cache().clone(),
            stats: routing.stats().clone(),
            routing,
        }
    }
}
