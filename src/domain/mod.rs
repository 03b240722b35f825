//! Domain layer - Core routing and caching logic

pub mod classifier;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod routing;
pub mod semantic_cache;
pub mod stats;

pub use classifier::{
    Classification, ClassificationRule, Classifier, ClassifierConfig, ComplexityLabel,
    KeywordGroup, RuleTableClassifier,
};
pub use embedding::{EmbeddingProvider, cosine_similarity, l2_normalize};
pub use error::DomainError;
pub use llm::{
    BackendKind, ChatOptions, Conversation, FinishReason, LlmProvider, LlmResponse, Message,
    MessageRole, ProviderError, ProviderErrorKind, Usage,
};
pub use routing::{
    Attempt, AttemptOutcome, CostTable, RoutingConfig, RoutingDecision, RoutingOutcome,
    RoutingPolicy,
};
pub use semantic_cache::{
    CacheEntry, EmbeddingBackend, EmbeddingConfig, SearchHit, SemanticCacheConfig, VectorIndex,
};
pub use stats::{LatestRequest, StatsSnapshot};
