//! Provider clients: one module per wire protocol, one shared capability.
//!
//! Every backend implements [`LlmClient`] — `predict(prompt) -> text`. A
//! client encapsulates exactly one protocol and is immutable after
//! construction; swapping providers never changes caller code, only which
//! instance the router hands out. Clients perform no retries of their own;
//! resilience is layered outside via [`retry::ResilientClient`].

pub mod gemini;
pub mod ollama;
pub mod openai_compat;
pub mod retry;

use async_trait::async_trait;

use crate::error::ProviderError;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai_compat::OpenAiCompatClient;
pub use retry::{ResilientClient, RetryPolicy};

/// Uniform capability over one LLM backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a text prompt, return the model's text output.
    async fn predict(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Stable identifier of the wire protocol ("openai-compat", "gemini",
    /// "ollama"). Wrappers forward the inner client's name.
    fn name(&self) -> &'static str;

    /// Model id this client targets.
    fn model(&self) -> &str;
}

impl std::fmt::Debug for dyn LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("name", &self.name())
            .field("model", &self.model())
            .finish()
    }
}
