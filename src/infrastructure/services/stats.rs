//! Process-wide routing statistics

use std::sync::{PoisonError, RwLock};

use crate::domain::routing::{RoutingDecision, RoutingOutcome};
use crate::domain::stats::{LatestRequest, StatsSnapshot};

/// Owns the routing counters; every decision is applied under one write lock
#[derive(Debug, Default)]
pub struct StatsAggregator {
    state: RwLock<StatsSnapshot>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every counter delta implied by one decision
    pub fn update(&self, decision: &RoutingDecision) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state.total_requests += 1;

        if decision.is_cache_hit() {
            state.cache_hits += 1;
        } else {
            state.cache_misses += 1;
        }

        state.total_savings += decision.savings;

        match &decision.outcome {
            RoutingOutcome::CacheHit { .. } => {}
            RoutingOutcome::Served { backend, .. } => {
                *state.provider_usage.entry(backend.clone()).or_insert(0) += 1;
            }
            RoutingOutcome::Exhausted { .. } => {
                state.failed_requests += 1;
            }
        }

        if let (Some(request_type), Some(provider)) =
            (decision.request_type(), decision.provider_label())
        {
            state.latest_request = LatestRequest {
                request_type: request_type.to_string(),
                provider,
                timestamp: decision.timestamp.timestamp(),
            };
        }
    }

    /// Consistent copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restore every counter to its initial value
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        *state = StatsSnapshot::default();
    }
}
