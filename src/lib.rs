//! SmartRoute gateway
//!
//! An OpenAI-compatible gateway that routes chat completions across LLM backends:
//! - Semantic cache keyed by conversation embeddings
//! - Rule-table complexity classification
//! - Ordered fallback across local and remote backends with per-backend deadlines
//! - Routing statistics for the dashboard

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{DomainError, RoutingPolicy, RuleTableClassifier};
use infrastructure::embedding::create_embedding_provider;
use infrastructure::llm::ProviderFactory;
use infrastructure::semantic_cache::InMemoryVectorIndex;
use infrastructure::services::{RoutingService, SemanticCacheService, StatsAggregator};

/// Wire every service from a validated configuration
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    config.validate()?;

    let embedder = create_embedding_provider(&config.cache.embedding);
    let index = Arc::new(InMemoryVectorIndex::new(config.cache.max_entries));
    let cache = Arc::new(SemanticCacheService::new(
        index,
        embedder,
        config.cache.clone(),
    ));

    let registry = ProviderFactory::from_config(&config.providers, &config.simulation);
    let policy = RoutingPolicy::from_config(&config.routing);

    for backend in policy.referenced_backends() {
        if !registry.contains(backend) {
            info!(backend = %backend, "Routing policy names a backend that is not configured");
        }
    }

    let routing = RoutingService::new(
        cache,
        Arc::new(RuleTableClassifier::from_config(&config.classifier)),
        registry,
        policy,
        ProviderFactory::cost_table(&config.providers, &config.routing),
        Arc::new(StatsAggregator::new()),
    );

    Ok(AppState::new(Arc::new(routing)))
}
