//! Ollama client for locally served inference.
//!
//! Uses the non-streaming `/api/generate` endpoint. Local inference is
//! assumed fast and non-rate-limited, so the router never wraps this client
//! in the retry policy.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::providers::LlmClient;

/// Context window requested from the local server.
const NUM_CTX: u32 = 2048;

pub struct OllamaClient {
    http: reqwest::Client,
    host: String,
    model: String,
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>, host: impl Into<String>, temperature: f64) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn predict(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.host);
        debug!(model = %self.model, url = %url, "local generate request");

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {"temperature": self.temperature, "num_ctx": NUM_CTX},
        });

        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("llama3.2:3b", "http://localhost:11434/", 0.2);
        assert_eq!(client.host, "http://localhost:11434");
        assert_eq!(client.name(), "ollama");
        assert_eq!(client.model(), "llama3.2:3b");
    }
}
