//! LLM provider implementations

mod factory;
mod gemini;
pub mod http_client;
mod openai_compatible;
mod simulated;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use gemini::{GeminiProvider, SAFETY_FALLBACK_TEXT};
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use openai_compatible::OpenAiCompatibleProvider;
pub use simulated::SimulatedProvider;
