use serde::{Deserialize, Serialize};

/// Fallback order per complexity label plus the cost reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_complex")]
    pub complex: Vec<String>,

    #[serde(default = "default_simple")]
    pub simple: Vec<String>,

    /// Cost per 1k tokens of the reference backend savings are measured against
    #[serde(default = "default_reference_cost")]
    pub reference_cost_per_1k: f64,

    /// Name shown in fallback annotations
    #[serde(default = "default_reference_model")]
    pub reference_model: String,
}

fn default_complex() -> Vec<String> {
    ["local", "groq", "gemini", "openai"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_simple() -> Vec<String> {
    vec!["groq".to_string()]
}

fn default_reference_cost() -> f64 {
    0.03
}

fn default_reference_model() -> String {
    "gpt-4".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            complex: default_complex(),
            simple: default_simple(),
            reference_cost_per_1k: default_reference_cost(),
            reference_model: default_reference_model(),
        }
    }
}
