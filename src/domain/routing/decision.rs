//! Record of the path a single request took

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::classifier::ComplexityLabel;
use crate::domain::llm::ProviderErrorKind;

/// Result of a single backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failed(ProviderErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub backend: String,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

impl Attempt {
    pub fn success(backend: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            backend: backend.into(),
            outcome: AttemptOutcome::Success,
            elapsed,
        }
    }

    pub fn failed(backend: impl Into<String>, kind: ProviderErrorKind, elapsed: Duration) -> Self {
        Self {
            backend: backend.into(),
            outcome: AttemptOutcome::Failed(kind),
            elapsed,
        }
    }

    /// "backend: reason" for failures, "backend: ok" otherwise
    pub fn summary(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Success => format!("{}: ok", self.backend),
            AttemptOutcome::Failed(kind) => format!("{}: {}", self.backend, kind),
        }
    }
}

/// Terminal state of the routing state machine
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingOutcome {
    CacheHit {
        similarity: f32,
    },
    Served {
        label: ComplexityLabel,
        backend: String,
        /// The answering backend is local
        local: bool,
        attempts: Vec<Attempt>,
    },
    Exhausted {
        label: ComplexityLabel,
        attempts: Vec<Attempt>,
    },
}

/// Ephemeral description of one routing decision; feeds stats only
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub outcome: RoutingOutcome,
    pub savings: f64,
    pub timestamp: DateTime<Utc>,
}

impl RoutingDecision {
    pub fn cache_hit(similarity: f32, savings: f64) -> Self {
        Self::new(RoutingOutcome::CacheHit { similarity }, savings)
    }

    pub fn served(
        label: ComplexityLabel,
        backend: impl Into<String>,
        local: bool,
        attempts: Vec<Attempt>,
        savings: f64,
    ) -> Self {
        Self::new(
            RoutingOutcome::Served {
                label,
                backend: backend.into(),
                local,
                attempts,
            },
            savings,
        )
    }

    pub fn exhausted(label: ComplexityLabel, attempts: Vec<Attempt>) -> Self {
        Self::new(RoutingOutcome::Exhausted { label, attempts }, 0.0)
    }

    fn new(outcome: RoutingOutcome, savings: f64) -> Self {
        Self {
            outcome,
            savings,
            timestamp: Utc::now(),
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self.outcome, RoutingOutcome::CacheHit { .. })
    }

    /// Dashboard label for the request
    pub fn request_type(&self) -> Option<&'static str> {
        match &self.outcome {
            RoutingOutcome::CacheHit { .. } => Some("Cache Hit"),
            RoutingOutcome::Served {
                label: ComplexityLabel::Simple,
                ..
            } => Some("Simple Query"),
            RoutingOutcome::Served {
                label: ComplexityLabel::Complex,
                local: true,
                ..
            } => Some("Complex Query"),
            RoutingOutcome::Served {
                label: ComplexityLabel::Complex,
                local: false,
                ..
            } => Some("Complex Query (Fallback)"),
            RoutingOutcome::Exhausted { .. } => None,
        }
    }

    /// Upper-cased backend id, or "CACHE" for hits
    pub fn provider_label(&self) -> Option<String> {
        match &self.outcome {
            RoutingOutcome::CacheHit { .. } => Some("CACHE".to_string()),
            RoutingOutcome::Served { backend, .. } => Some(backend.to_uppercase()),
            RoutingOutcome::Exhausted { .. } => None,
        }
    }
}
