use std::fmt;

use thiserror::Error;

/// Uniform failure categories across all backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The per-call deadline elapsed
    Timeout,
    /// Connection, DNS or other transport failure
    Transport,
    /// Backend answered with a non-2xx status
    HttpStatus(u16),
    /// Backend answered 2xx but the body could not be normalized
    InvalidResponse,
    /// Backend is missing credentials or endpoint
    NotConfigured,
    /// Failure injected by simulation mode
    Simulated,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::InvalidResponse => write!(f, "invalid response"),
            Self::NotConfigured => write!(f, "not configured"),
            Self::Simulated => write!(f, "simulated failure"),
        }
    }
}

/// Failure of a single backend call
#[derive(Debug, Clone, Error)]
#[error("Provider error: {backend} ({kind}) - {detail}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub backend: String,
    pub detail: String,
}

impl ProviderError {
    pub fn new(
        kind: ProviderErrorKind,
        backend: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            backend: backend.into(),
            detail: detail.into(),
        }
    }

    pub fn timeout(backend: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, backend, detail)
    }

    pub fn invalid_response(backend: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, backend, detail)
    }

    pub fn not_configured(backend: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotConfigured, backend, detail)
    }

    /// Short "backend: reason" summary used in exhaustion reports
    pub fn summary(&self) -> String {
        format!("{}: {}", self.backend, self.kind)
    }
}
