//! Dashboard statistics payload

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::stats::StatsSnapshot;

/// Most recent successful request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestRequestResponse {
    #[serde(rename = "type")]
    pub request_type: String,
    pub provider: String,
    pub timestamp: i64,
}

/// Response for GET /api/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failed_requests: u64,
    pub savings: f64,
    pub hit_rate: f64,
    pub provider_usage: BTreeMap<String, u64>,
    /// `provider_<id>` counters, one per known backend
    #[serde(flatten)]
    pub provider_columns: BTreeMap<String, u64>,
    pub latest_request: LatestRequestResponse,
}

impl StatsResponse {
    /// Build the payload; every id in `backends` gets a column even when unused
    pub fn from_snapshot<'a>(
        snapshot: &StatsSnapshot,
        backends: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut provider_usage = snapshot.provider_usage.clone();
        for backend in backends {
            provider_usage.entry(backend.to_string()).or_insert(0);
        }

        let provider_columns = provider_usage
            .iter()
            .map(|(backend, count)| (format!("provider_{}", backend), *count))
            .collect();

        Self {
            requests: snapshot.total_requests,
            cache_hits: snapshot.cache_hits,
            cache_misses: snapshot.cache_misses,
            failed_requests: snapshot.failed_requests,
            savings: round_to(snapshot.total_savings, 4),
            hit_rate: snapshot.hit_rate(),
            provider_usage,
            provider_columns,
            latest_request: LatestRequestResponse {
                request_type: snapshot.latest_request.request_type.clone(),
                provider: snapshot.latest_request.provider.clone(),
                timestamp: snapshot.latest_request.timestamp,
            },
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Response for POST /api/cache/clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheClearResponse {
    pub status: String,
    pub message: String,
}

impl CacheClearResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: "Cache purged and stats reset".to_string(),
        }
    }
}
