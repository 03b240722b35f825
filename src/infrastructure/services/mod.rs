//! Infrastructure services

mod routing_service;
mod semantic_cache_service;
mod stats;

pub use routing_service::RoutingService;
pub use semantic_cache_service::{CacheHit, SemanticCacheService};
pub use stats::StatsAggregator;
