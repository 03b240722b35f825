use std::sync::Arc;

use tracing::{debug, info};

use super::gemini::GeminiProvider;
use super::http_client::HttpClient;
use super::openai_compatible::OpenAiCompatibleProvider;
use super::simulated::SimulatedProvider;
use crate::config::{ProviderConfig, ProvidersConfig, SimulationConfig};
use crate::domain::{BackendKind, CostTable, LlmProvider, RoutingConfig};

/// Registered backends in registration order
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend; a second provider with the same name replaces the first
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        if let Some(existing) = self
            .providers
            .iter_mut()
            .find(|p| p.name() == provider.name())
        {
            *existing = provider;
        } else {
            self.providers.push(provider);
        }
    }

    pub fn with(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.iter().any(|p| p.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Builds the provider registry and cost table from configuration
#[derive(Debug)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Register every configured backend
    pub fn from_config(providers: &ProvidersConfig, simulation: &SimulationConfig) -> ProviderRegistry {
        let client = HttpClient::new();
        let mut registry = ProviderRegistry::new();

        for (id, config) in providers.iter() {
            if !config.enabled {
                debug!(backend = id, "Backend disabled");
                continue;
            }

            let provider = if simulation.enabled {
                Some(Self::create_simulated(id, config))
            } else {
                Self::create_live(id, config, client.clone())
            };

            match provider {
                Some(provider) => registry.register(provider),
                None => info!(backend = id, "Backend not configured, skipping"),
            }
        }

        info!(
            backends = ?registry.names(),
            simulation = simulation.enabled,
            "Provider registry built"
        );

        registry
    }

    pub fn cost_table(providers: &ProvidersConfig, routing: &RoutingConfig) -> CostTable {
        providers.iter().fold(
            CostTable::new(routing.reference_cost_per_1k, &routing.reference_model),
            |table, (id, config)| table.with_cost(id, config.cost_per_1k),
        )
    }

    fn kind_of(id: &str) -> BackendKind {
        if id == ProvidersConfig::LOCAL {
            BackendKind::Local
        } else {
            BackendKind::Remote
        }
    }

    fn create_simulated(id: &str, config: &ProviderConfig) -> Arc<dyn LlmProvider> {
        Arc::new(
            SimulatedProvider::new(id, Self::kind_of(id), &config.model, config.timeout())
                .with_latency(config.simulated_latency())
                .with_failure(config.simulate_failure),
        )
    }

    fn create_live(id: &str, config: &ProviderConfig, client: HttpClient) -> Option<Arc<dyn LlmProvider>> {
        match id {
            ProvidersConfig::LOCAL => {
                if config.base_url.trim().is_empty() {
                    return None;
                }

                Some(Arc::new(OpenAiCompatibleProvider::new(
                    client,
                    id,
                    BackendKind::Local,
                    &config.base_url,
                    &config.model,
                    config.timeout(),
                )))
            }
            ProvidersConfig::GEMINI => {
                let api_key = config.api_key()?;

                Some(Arc::new(GeminiProvider::new(
                    client,
                    id,
                    &config.base_url,
                    &config.model,
                    api_key,
                    config.timeout(),
                )))
            }
            _ => {
                let api_key = config.api_key()?;

                Some(Arc::new(
                    OpenAiCompatibleProvider::new(
                        client,
                        id,
                        BackendKind::Remote,
                        &config.base_url,
                        &config.model,
                        config.timeout(),
                    )
                    .with_api_key(api_key),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use std::time::Duration;

    #[test]
    fn test_live_mode_requires_credentials() {
        let providers = ProvidersConfig::default();
        let registry = ProviderFactory::from_config(&providers, &SimulationConfig::default());

        // Only the local server needs no key
        assert_eq!(registry.names(), vec!["local"]);
    }

    #[test]
    fn test_live_mode_with_keys() {
        let mut providers = ProvidersConfig::default();
        providers.groq.api_key = Some("gsk".to_string());
        providers.gemini.api_key = Some("g".to_string());
        providers.openai.api_key = Some("".to_string());

        let registry = ProviderFactory::from_config(&providers, &SimulationConfig::default());

        assert_eq!(registry.names(), vec!["local", "groq", "gemini"]);
        assert_eq!(registry.get("local").unwrap().kind(), BackendKind::Local);
        assert_eq!(registry.get("groq").unwrap().kind(), BackendKind::Remote);
        assert_eq!(
            registry.get("local").unwrap().timeout(),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_simulation_mode_registers_all_enabled() {
        let mut providers = ProvidersConfig::default();
        providers.openai.enabled = false;

        let registry =
            ProviderFactory::from_config(&providers, &SimulationConfig { enabled: true });

        assert_eq!(registry.names(), vec!["local", "groq", "gemini"]);
    }

    #[test]
    fn test_local_without_url_is_skipped() {
        let mut providers = ProvidersConfig::default();
        providers.local.base_url = String::new();

        let registry = ProviderFactory::from_config(&providers, &SimulationConfig::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ProviderRegistry::new()
            .with(Arc::new(MockLlmProvider::new("groq", BackendKind::Remote)))
            .with(Arc::new(MockLlmProvider::new("local", BackendKind::Local)))
            .with(Arc::new(
                MockLlmProvider::new("groq", BackendKind::Remote).with_timeout(Duration::from_secs(9)),
            ));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["groq", "local"]);
        assert_eq!(
            registry.get("groq").unwrap().timeout(),
            Duration::from_secs(9)
        );
    }

    #[test]
    fn test_cost_table_from_config() {
        let table = ProviderFactory::cost_table(&ProvidersConfig::default(), &RoutingConfig::default());

        assert_eq!(table.reference_model(), "gpt-4");
        assert_eq!(table.cost_of("groq"), 0.0005);
        assert_eq!(table.savings_for("openai"), 0.0);
        assert!((table.savings_for("local") - 0.03).abs() < 1e-12);
    }
}
