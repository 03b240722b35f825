use thiserror::Error;

use super::llm::ProviderError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No available providers for {label} request (tried: {})", format_attempts(attempts))]
    AllProvidersExhausted { label: String, attempts: Vec<String> },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_attempts(attempts: &[String]) -> String {
    if attempts.is_empty() {
        return "none configured".to_string();
    }

    attempts.join("; ")
}

impl DomainError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn exhausted(label: impl Into<String>, attempts: Vec<String>) -> Self {
        Self::AllProvidersExhausted {
            label: label.into(),
            attempts,
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable, machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Provider(_) => "provider_error",
            Self::AllProvidersExhausted { .. } => "all_providers_exhausted",
            Self::Cache { .. } => "cache_unavailable",
            Self::Embedding { .. } => "embedding_error",
            Self::Configuration { .. } => "configuration_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}
