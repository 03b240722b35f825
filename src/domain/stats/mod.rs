//! Aggregate routing statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const WAITING: &str = "Waiting...";

/// Snapshot of the most recent successful decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRequest {
    pub request_type: String,
    pub provider: String,
    /// Unix seconds; 0 before the first request
    pub timestamp: i64,
}

impl Default for LatestRequest {
    fn default() -> Self {
        Self {
            request_type: WAITING.to_string(),
            provider: WAITING.to_string(),
            timestamp: 0,
        }
    }
}

/// Process-wide counters; `cache_hits + cache_misses == total_requests`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failed_requests: u64,
    pub total_savings: f64,
    pub provider_usage: BTreeMap<String, u64>,
    pub latest_request: LatestRequest,
}

impl StatsSnapshot {
    /// Hit percentage rounded to one decimal
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;

        if lookups == 0 {
            return 0.0;
        }

        let rate = self.cache_hits as f64 / lookups as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }

    pub fn usage_of(&self, backend: &str) -> u64 {
        self.provider_usage.get(backend).copied().unwrap_or(0)
    }
}
