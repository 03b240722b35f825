use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{ClassifierConfig, DomainError, RoutingConfig, SemanticCacheConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub cache: SemanticCacheConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Canned responses instead of real backend calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub enabled: bool,
}

/// Settings for one backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Estimated cost per 1k tokens
    pub cost_per_1k: f64,
    pub simulated_latency_ms: u64,
    pub simulate_failure: bool,
}

impl ProviderConfig {
    fn new(base_url: &str, model: &str, timeout_secs: u64, cost_per_1k: f64, latency_ms: u64) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: None,
            timeout_secs,
            cost_per_1k,
            simulated_latency_ms: latency_ms,
            simulate_failure: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Non-empty API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// The known backends, keyed by their routing id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub local: ProviderConfig,
    pub groq: ProviderConfig,
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
}

impl ProvidersConfig {
    pub const LOCAL: &'static str = "local";
    pub const GROQ: &'static str = "groq";
    pub const GEMINI: &'static str = "gemini";
    pub const OPENAI: &'static str = "openai";

    /// Backends with their ids, in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ProviderConfig)> {
        [
            (Self::LOCAL, &self.local),
            (Self::GROQ, &self.groq),
            (Self::GEMINI, &self.gemini),
            (Self::OPENAI, &self.openai),
        ]
        .into_iter()
    }

    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.iter()
            .find(|(known, _)| *known == id)
            .map(|(_, config)| config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            local: ProviderConfig::new("http://localhost:1234/v1", "mythomax-l2-13b", 120, 0.0, 500),
            groq: ProviderConfig::new(
                "https://api.groq.com/openai/v1",
                "llama-3.1-8b-instant",
                30,
                0.0005,
                500,
            ),
            gemini: ProviderConfig::new(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.0-flash-001",
                30,
                0.00035,
                1000,
            ),
            openai: ProviderConfig::new("https://api.openai.com/v1", "gpt-4o", 60, 0.03, 1500),
        }
    }
}

impl AppConfig {
    /// Load defaults, config files, `APP__*` variables, then plain legacy variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = serde_json::to_string(&Self::default())
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let config = config::Config::builder()
            .add_source(config::File::from_str(&defaults, config::FileFormat::Json))
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("routing.complex")
                    .with_list_parse_key("routing.simple")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_legacy_env(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Apply the plain variable names used by earlier deployments
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("GROQ_API_KEY") {
            self.providers.groq.api_key = Some(key);
        }

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.providers.openai.api_key = Some(key);
        }

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.providers.gemini.api_key = Some(key);
        }

        if let Some(url) = non_empty("LM_STUDIO_URL") {
            self.providers.local.base_url = url;
        }

        if let Some(flag) = non_empty("USE_MOCK_LLM") {
            self.simulation.enabled = matches!(flag.to_lowercase().as_str(), "true" | "1" | "yes");
        }
    }

    /// Reject settings the gateway cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        let threshold = self.cache.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DomainError::configuration(format!(
                "cache.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        if self.cache.embedding.dimensions == 0 {
            return Err(DomainError::configuration(
                "cache.embedding.dimensions must be greater than 0",
            ));
        }

        for group in &self.classifier.keyword_groups {
            if group.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
                return Err(DomainError::configuration(format!(
                    "classifier.keyword_groups.{} contains an empty keyword",
                    group.name
                )));
            }
        }

        for (id, provider) in self.providers.iter() {
            if provider.timeout_secs == 0 {
                return Err(DomainError::configuration(format!(
                    "providers.{}.timeout_secs must be greater than 0",
                    id
                )));
            }
        }

        for id in self.routing.complex.iter().chain(self.routing.simple.iter()) {
            if self.providers.get(id).is_none() {
                return Err(DomainError::configuration(format!(
                    "routing references unknown backend '{}'",
                    id
                )));
            }
        }

        Ok(())
    }
}
