//! Fallback routing
//!
//! Each request moves through cache check, classification and an ordered
//! series of backend attempts. It ends either served (from the cache or a
//! backend) or exhausted. Stats are updated exactly once, at the terminal state.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use super::semantic_cache_service::SemanticCacheService;
use super::stats::StatsAggregator;
use crate::domain::classifier::{Classifier, ComplexityLabel};
use crate::domain::llm::{
    BackendKind, ChatOptions, Conversation, LlmProvider, LlmResponse, ProviderError,
};
use crate::domain::routing::{Attempt, CostTable, RoutingDecision, RoutingPolicy};
use crate::domain::DomainError;
use crate::infrastructure::llm::ProviderRegistry;
use crate::infrastructure::observability::{record_provider_attempt, record_routing_outcome};

/// Routes a conversation to the semantic cache or the first backend that answers
pub struct RoutingService {
    cache: Arc<SemanticCacheService>,
    classifier: Arc<dyn Classifier>,
    registry: ProviderRegistry,
    policy: RoutingPolicy,
    costs: CostTable,
    stats: Arc<StatsAggregator>,
}

impl std::fmt::Debug for RoutingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingService")
            .field("cache", &self.cache)
            .field("registry", &self.registry.names())
            .field("policy", &self.policy)
            .finish()
    }
}

impl RoutingService {
    pub fn new(
        cache: Arc<SemanticCacheService>,
        classifier: Arc<dyn Classifier>,
        registry: ProviderRegistry,
        policy: RoutingPolicy,
        costs: CostTable,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            cache,
            classifier,
            registry,
            policy,
            costs,
            stats,
        }
    }

    pub fn cache(&self) -> &Arc<SemanticCacheService> {
        &self.cache
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Answer a conversation from the cache or the first backend that succeeds
    pub async fn route(
        &self,
        conversation: &Conversation,
        options: &ChatOptions,
    ) -> Result<LlmResponse, DomainError> {
        if let Some(response) = self.check_cache(conversation).await {
            return Ok(response);
        }

        let classification = self.classifier.classify(conversation);
        let label = classification.label;
        let candidates = self
            .policy
            .candidates(label, |id| self.registry.contains(id));

        info!(
            label = %label,
            rule = classification.matched_rule.as_deref().unwrap_or("none"),
            candidates = ?candidates,
            "Routing request"
        );

        let mut attempts = Vec::with_capacity(candidates.len());

        for backend in candidates {
            let Some(provider) = self.registry.get(backend) else {
                continue;
            };

            let started = Instant::now();
            let result = self.attempt(provider.as_ref(), conversation, options).await;
            let elapsed = started.elapsed();

            record_provider_attempt(backend, result.is_ok(), elapsed);

            match result {
                Ok(response) => {
                    attempts.push(Attempt::success(backend, elapsed));
                    return Ok(self
                        .finish_served(conversation, label, provider.as_ref(), response, attempts)
                        .await);
                }
                Err(e) => {
                    warn!(
                        backend = %backend,
                        kind = %e.kind,
                        elapsed_ms = elapsed.as_millis() as u64,
                        error = %e.detail,
                        "Backend attempt failed, trying next"
                    );
                    attempts.push(Attempt::failed(backend, e.kind, elapsed));
                }
            }
        }

        let summaries: Vec<String> = attempts.iter().map(Attempt::summary).collect();

        error!(label = %label, attempts = ?summaries, "All backends failed");

        self.stats
            .update(&RoutingDecision::exhausted(label, attempts));
        record_routing_outcome("exhausted");

        Err(DomainError::exhausted(label.as_str(), summaries))
    }

    /// Cached answer, if any; a failing cache counts as a miss
    async fn check_cache(&self, conversation: &Conversation) -> Option<LlmResponse> {
        match self.cache.lookup(conversation, self.cache.threshold()).await {
            Ok(Some(hit)) => {
                info!(similarity = hit.similarity, "Semantic cache hit");

                let mut response = hit.response;
                response.model = format!("{} (Cached)", response.model);
                response.cached = true;

                self.stats.update(&RoutingDecision::cache_hit(
                    hit.similarity,
                    self.costs.cache_hit_savings(),
                ));
                record_routing_outcome("cache_hit");

                Some(response)
            }
            Ok(None) => {
                info!("Semantic cache miss");
                None
            }
            Err(e) => {
                warn!(error = %e, "Semantic cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// One backend call bounded by the backend's own deadline
    async fn attempt(
        &self,
        provider: &dyn LlmProvider,
        conversation: &Conversation,
        options: &ChatOptions,
    ) -> Result<LlmResponse, ProviderError> {
        let timeout = provider.timeout();

        match tokio::time::timeout(timeout, provider.chat(conversation, options)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(
                provider.name(),
                format!("no response within {:?}", timeout),
            )),
        }
    }

    async fn finish_served(
        &self,
        conversation: &Conversation,
        label: ComplexityLabel,
        provider: &dyn LlmProvider,
        mut response: LlmResponse,
        attempts: Vec<Attempt>,
    ) -> LlmResponse {
        let backend = provider.name();
        let local = provider.kind() == BackendKind::Local;

        if label == ComplexityLabel::Complex && !local {
            response.model = format!(
                "{} (Fallback for {})",
                response.model,
                self.costs.reference_model()
            );
        }

        if let Err(e) = self.cache.store(conversation, &response).await {
            warn!(error = %e, "Failed to store response in semantic cache");
        }

        info!(backend = %backend, label = %label, "Request served");

        self.stats.update(&RoutingDecision::served(
            label,
            backend,
            local,
            attempts,
            self.costs.savings_for(backend),
        ));
        record_routing_outcome("served");

        response
    }
}
